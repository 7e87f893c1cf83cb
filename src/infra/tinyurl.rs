use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, AppResult};
use crate::services::UrlShortener;

const API_ENDPOINT: &str = "https://tinyurl.com/api-create.php";

pub struct TinyUrlClient {
    http: Client,
    endpoint: String,
}

impl TinyUrlClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            endpoint: API_ENDPOINT.to_string(),
        }
    }
}

#[async_trait]
impl UrlShortener for TinyUrlClient {
    async fn shorten(&self, url: &str) -> AppResult<String> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .map_err(|err| AppError::Shortener(format!("failed to call TinyURL: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::Shortener(format!("failed to read TinyURL response: {err}")))?;
        if !status.is_success() {
            return Err(AppError::Shortener(format!(
                "TinyURL responded with {status}: {body}"
            )));
        }

        parse_short_url(&body)
    }
}

fn parse_short_url(body: &str) -> AppResult<String> {
    let short = body.trim();
    if short.starts_with("http://") || short.starts_with("https://") {
        Ok(short.to_string())
    } else {
        Err(AppError::Shortener(format!(
            "unexpected TinyURL response: {short}"
        )))
    }
}
