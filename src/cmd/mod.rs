pub mod announce;
pub mod config;
