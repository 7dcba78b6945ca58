pub mod host;
pub mod scheduler;
