use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait UrlShortener: Send + Sync {
    async fn shorten(&self, url: &str) -> AppResult<String>;
}
