use async_trait::async_trait;

use crate::domain::announcement::Announcement;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRole {
    /// Required for a successful run; rejected deliveries are retried once.
    Primary,
    Optional,
}

#[async_trait]
pub trait MessagingChannel: Send + Sync {
    fn name(&self) -> &'static str;

    fn role(&self) -> ChannelRole {
        ChannelRole::Optional
    }

    /// Channel-ready text for an announcement, escaping included.
    fn render(&self, announcement: &Announcement) -> String;

    /// Channel-ready text for a raw notice, escaping included.
    fn render_notice(&self, notice: &str) -> String {
        notice.to_string()
    }

    /// Sends already rendered text. A rejection by the remote service comes
    /// back as `AppError::Delivery` carrying the service's description.
    async fn send(&self, text: &str) -> AppResult<()>;
}
