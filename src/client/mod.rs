pub mod envelope;
pub mod interview_client;
pub mod token;

pub use envelope::Envelope;
pub use interview_client::InterviewClient;
pub use token::{FileTokenStore, NoToken, StaticToken, TokenProvider};
