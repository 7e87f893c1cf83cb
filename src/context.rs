use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{CommitHistoryService, MessagingChannel, UrlShortener};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub commit_history: Arc<dyn CommitHistoryService>,
    pub channels: Vec<Arc<dyn MessagingChannel>>,
    pub url_shortener: Option<Arc<dyn UrlShortener>>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        commit_history: Arc<dyn CommitHistoryService>,
        channels: Vec<Arc<dyn MessagingChannel>>,
        url_shortener: Option<Arc<dyn UrlShortener>>,
    ) -> Self {
        Self {
            config,
            commit_history,
            channels,
            url_shortener,
        }
    }
}
