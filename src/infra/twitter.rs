use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, header::AUTHORIZATION};
use serde::Serialize;
use sha1::Sha1;

use crate::config::TwitterSettings;
use crate::domain::announcement::Announcement;
use crate::error::{AppError, AppResult};
use crate::services::MessagingChannel;

const CHANNEL: &str = "twitter";
const TWEETS_ENDPOINT: &str = "https://api.twitter.com/2/tweets";

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub struct TwitterClient {
    http: Client,
    settings: TwitterSettings,
}

impl TwitterClient {
    pub fn new(http: Client, settings: TwitterSettings) -> Self {
        Self { http, settings }
    }

    fn authorization(&self, method: &str, url: &str) -> AppResult<String> {
        let nonce = nonce()?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let mut params = vec![
            ("oauth_consumer_key", self.settings.consumer_key.clone()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.settings.access_token.clone()),
            ("oauth_version", "1.0".to_string()),
        ];

        let signature = sign(
            method,
            url,
            &params,
            &self.settings.consumer_secret,
            &self.settings.access_token_secret,
        )?;
        params.push(("oauth_signature", signature));

        let header = params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {header}"))
    }
}

#[async_trait]
impl MessagingChannel for TwitterClient {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    fn render(&self, announcement: &Announcement) -> String {
        announcement.to_tweet()
    }

    async fn send(&self, text: &str) -> AppResult<()> {
        let authorization = self.authorization("POST", TWEETS_ENDPOINT)?;
        let response = self
            .http
            .post(TWEETS_ENDPOINT)
            .header(AUTHORIZATION, authorization)
            .json(&TweetRequest { text })
            .send()
            .await
            .map_err(|err| AppError::delivery(CHANNEL, format!("failed to call Twitter: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::delivery(
                CHANNEL,
                format!("Twitter responded with {status}: {body}"),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct TweetRequest<'a> {
    text: &'a str,
}

/// OAuth 1.0a HMAC-SHA1 signature over the sorted, encoded parameters.
fn sign(
    method: &str,
    url: &str,
    params: &[(&str, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> AppResult<String> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    encoded.sort();
    let parameter_string = encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string)
    );
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|err| AppError::delivery(CHANNEL, format!("invalid signing key: {err}")))?;
    mac.update(base_string.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

fn nonce() -> AppResult<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes)
        .map_err(|err| AppError::delivery(CHANNEL, format!("failed to generate nonce: {err}")))?;
    Ok(bytes.iter().map(|byte| format!("{byte:02x}")).collect())
}
