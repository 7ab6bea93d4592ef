pub mod display;
pub mod interview;
pub mod status;
pub mod record;
