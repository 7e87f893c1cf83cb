use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::TelegramSettings;
use crate::domain::announcement::Announcement;
use crate::domain::markup::TELEGRAM_MARKDOWN_V2;
use crate::error::{AppError, AppResult};
use crate::services::{ChannelRole, MessagingChannel};

const API_BASE: &str = "https://api.telegram.org";
const CHANNEL: &str = "telegram";

pub struct TelegramClient {
    http: Client,
    settings: TelegramSettings,
}

impl TelegramClient {
    pub fn new(http: Client, settings: TelegramSettings) -> Self {
        Self { http, settings }
    }

    fn send_endpoint(&self) -> String {
        format!("{API_BASE}/bot{}/sendMessage", self.settings.bot_token)
    }
}

#[async_trait]
impl MessagingChannel for TelegramClient {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    fn role(&self) -> ChannelRole {
        ChannelRole::Primary
    }

    fn render(&self, announcement: &Announcement) -> String {
        TELEGRAM_MARKDOWN_V2.escape(&announcement.to_markdown())
    }

    fn render_notice(&self, notice: &str) -> String {
        TELEGRAM_MARKDOWN_V2.escape(notice)
    }

    async fn send(&self, text: &str) -> AppResult<()> {
        let request = SendMessageRequest {
            chat_id: &self.settings.chat_id,
            text,
            parse_mode: "MarkdownV2",
        };

        // The Bot API answers with an `ok` envelope on errors too, so the
        // status code alone is not inspected.
        let response = self
            .http
            .post(self.send_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|err| AppError::delivery(CHANNEL, format!("failed to call Telegram: {err}")))?;

        let status = response.status();
        let payload: SendMessageResponse = response.json().await.map_err(|err| {
            AppError::delivery(
                CHANNEL,
                format!("failed to parse Telegram response ({status}): {err}"),
            )
        })?;

        payload.into_result()
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    ok: bool,
    description: Option<String>,
}

impl SendMessageResponse {
    fn into_result(self) -> AppResult<()> {
        if self.ok {
            Ok(())
        } else {
            Err(AppError::delivery(
                CHANNEL,
                self.description
                    .unwrap_or_else(|| "no description returned".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::announcement::AnnouncementMode;

    fn client() -> TelegramClient {
        TelegramClient::new(
            Client::new(),
            TelegramSettings {
                bot_token: "123:abc".to_string(),
                chat_id: "-100".to_string(),
            },
        )
    }

    #[test]
    fn renders_escaped_markdown() {
        let announcement = Announcement::new(
            AnnouncementMode::NewContent,
            "24h",
            vec!["https://book.example.org/web/sql_injection".to_string()],
        );
        assert_eq!(
            client().render(&announcement),
            "📓 New content has been added to the following pages 📓\n\n\
             \\- \\[sqlinjection\\]\\(https://book\\.example\\.org/web/sqlinjection\\)\n"
        );
    }

    #[test]
    fn maps_rejection_to_delivery_error() {
        let payload: SendMessageResponse = serde_json::from_str(
            r#"{"ok": false, "error_code": 400, "description": "Bad Request: can't parse entities"}"#,
        )
        .unwrap();
        match payload.into_result() {
            Err(AppError::Delivery {
                channel,
                description,
            }) => {
                assert_eq!(channel, "telegram");
                assert_eq!(description, "Bad Request: can't parse entities");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn accepts_ok_envelope() {
        let payload: SendMessageResponse =
            serde_json::from_str(r#"{"ok": true, "result": {"message_id": 1}}"#).unwrap();
        assert!(payload.into_result().is_ok());
    }

    #[test]
    fn builds_send_endpoint() {
        assert_eq!(
            client().send_endpoint(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
