use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::{AppConfig, ChannelSetting, ConfigOverrides, Credentials, Variant};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::infra::discord::DiscordWebhook;
use crate::infra::github::GitHubClient;
use crate::infra::telegram::TelegramClient;
use crate::infra::tinyurl::TinyUrlClient;
use crate::infra::twitter::TwitterClient;
use crate::services::{MessagingChannel, UrlShortener};
use crate::workflow::announce::{
    AnnounceOptions, AnnounceOutcome, DeliveryStatus, announce_changed_pages,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Args, Debug, Clone)]
pub struct AnnounceArgs {
    /// simple: every significant file of the window; ranked: top pages by changed lines.
    #[arg(long, default_value = "simple", value_parser = parse_variant)]
    pub variant: Variant,
    /// Repository and public base URL as owner/name=https://site/ (repeatable).
    #[arg(long = "repo", value_name = "OWNER/NAME=URL")]
    pub repos: Vec<String>,
    /// Changed lines a single commit must exceed for a file to count.
    #[arg(long)]
    pub threshold: Option<u64>,
    /// Look-back window such as 24h or 15d.
    #[arg(long)]
    pub window: Option<String>,
    /// Number of pages announced by the ranked variant.
    #[arg(long = "top")]
    pub top_n: Option<usize>,
    /// Announce full URLs even in ranked mode.
    #[arg(long)]
    pub no_shorten: bool,
    /// Print the announcement instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_variant(value: &str) -> Result<Variant, String> {
    Variant::from_str(value).ok_or_else(|| format!("unknown variant '{value}' (simple, ranked)"))
}

pub async fn run(args: AnnounceArgs) -> AppResult<()> {
    let overrides = ConfigOverrides {
        targets: args.repos,
        threshold: args.threshold,
        window: args.window,
        top_n: args.top_n,
        no_shorten: args.no_shorten,
    };
    let config = AppConfig::load(args.variant, overrides, Credentials::from_env())?;
    let context = build_context(config)?;

    info!(
        variant = context.config.variant.as_str(),
        window = %context.config.window_label,
        threshold = context.config.threshold,
        repositories = context.config.targets.len(),
        "checking for changed pages"
    );

    let options = AnnounceOptions {
        now: Utc::now(),
        dry_run: args.dry_run,
    };
    match announce_changed_pages(&context, options).await {
        AnnounceOutcome::NothingToReport => {}
        AnnounceOutcome::Previewed { message } => println!("{message}"),
        AnnounceOutcome::Announced { deliveries } => {
            for report in deliveries {
                match report.status {
                    DeliveryStatus::Delivered => info!(channel = report.channel, "sent"),
                    DeliveryStatus::ErrorReported { description }
                    | DeliveryStatus::Failed { description } => {
                        warn!(channel = report.channel, %description, "not delivered")
                    }
                }
            }
        }
    }

    Ok(())
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
    let credentials = &config.credentials;

    if let ChannelSetting::Disabled { missing } = &credentials.github_token {
        warn!("{missing} wasn't configured; repositories will not be queried");
    }
    let commit_history = Arc::new(GitHubClient::new(
        http.clone(),
        credentials.github_token.enabled().cloned(),
    ));

    let mut channels: Vec<Arc<dyn MessagingChannel>> = Vec::new();
    match &credentials.telegram {
        ChannelSetting::Enabled(settings) => {
            channels.push(Arc::new(TelegramClient::new(http.clone(), settings.clone())))
        }
        ChannelSetting::Disabled { missing } => {
            warn!("{missing} wasn't configured; Telegram disabled")
        }
    }
    match &credentials.discord {
        ChannelSetting::Enabled(settings) => {
            channels.push(Arc::new(DiscordWebhook::new(http.clone(), settings.clone())))
        }
        ChannelSetting::Disabled { missing } => {
            warn!("{missing} wasn't configured; Discord disabled")
        }
    }
    match &credentials.twitter {
        ChannelSetting::Enabled(settings) => {
            channels.push(Arc::new(TwitterClient::new(http.clone(), settings.clone())))
        }
        ChannelSetting::Disabled { missing } => {
            warn!("{missing} wasn't configured; Twitter disabled")
        }
    }

    let url_shortener = config
        .shorten_urls
        .then(|| Arc::new(TinyUrlClient::new(http.clone())) as Arc<dyn UrlShortener>);

    Ok(AppContext::new(
        config,
        commit_history,
        channels,
        url_shortener,
    ))
}
