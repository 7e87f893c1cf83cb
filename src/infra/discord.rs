use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::DiscordSettings;
use crate::domain::announcement::Announcement;
use crate::error::{AppError, AppResult};
use crate::services::MessagingChannel;

const CHANNEL: &str = "discord";
const CONTENT_LIMIT: usize = 2000;

pub struct DiscordWebhook {
    http: Client,
    settings: DiscordSettings,
}

impl DiscordWebhook {
    pub fn new(http: Client, settings: DiscordSettings) -> Self {
        Self { http, settings }
    }
}

#[async_trait]
impl MessagingChannel for DiscordWebhook {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    fn render(&self, announcement: &Announcement) -> String {
        truncate_lines(&announcement.to_markdown(), CONTENT_LIMIT)
    }

    async fn send(&self, text: &str) -> AppResult<()> {
        let response = self
            .http
            .post(&self.settings.webhook_url)
            .json(&WebhookMessage { content: text })
            .send()
            .await
            .map_err(|err| AppError::delivery(CHANNEL, format!("failed to call webhook: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::delivery(
                CHANNEL,
                format!("webhook responded with {status}: {body}"),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Keeps whole lines while the text fits in `limit` characters.
fn truncate_lines(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut kept = String::new();
    let mut used = 0;
    for line in text.split_inclusive('\n') {
        let length = line.chars().count();
        if used + length > limit {
            break;
        }
        kept.push_str(line);
        used += length;
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_lines("a\nb\n", 10), "a\nb\n");
    }

    #[test]
    fn long_text_keeps_whole_lines() {
        assert_eq!(truncate_lines("aaaa\nbbbb\ncccc\n", 11), "aaaa\nbbbb\n");
    }

    #[test]
    fn serializes_webhook_body() {
        let body = serde_json::to_string(&WebhookMessage { content: "hi" }).unwrap();
        assert_eq!(body, r#"{"content":"hi"}"#);
    }
}
