pub mod interview_dto;
