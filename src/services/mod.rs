pub mod interview_service;
pub mod repository;
pub mod session_timer;
