use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{0} wasn't configured in the environment")]
    MissingCredential(&'static str),
    #[error("repository query failed for {repository}: {message}")]
    UpstreamQuery { repository: String, message: String },
    #[error("{channel} delivery failed: {description}")]
    Delivery {
        channel: &'static str,
        description: String,
    },
    #[error("url shortener error: {0}")]
    Shortener(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn upstream(repository: &str, message: impl Into<String>) -> Self {
        AppError::UpstreamQuery {
            repository: repository.to_string(),
            message: message.into(),
        }
    }

    pub fn delivery(channel: &'static str, description: impl Into<String>) -> Self {
        AppError::Delivery {
            channel,
            description: description.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
