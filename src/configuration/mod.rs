pub mod config;
pub mod tables;
