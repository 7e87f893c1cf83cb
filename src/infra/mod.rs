pub mod discord;
pub mod github;
pub mod telegram;
pub mod tinyurl;
pub mod twitter;
