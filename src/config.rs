use std::env;

use chrono::{Duration, Utc};

use crate::domain::announcement::AnnouncementMode;
use crate::domain::page::{RepositoryTarget, UrlPolicy};
use crate::error::{AppError, AppResult};

pub const DEFAULT_THRESHOLD: u64 = 15;
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Daily "new content" digest: every significant file, no ranking.
    Simple,
    /// Periodic "trending" digest: summed, ranked, top N markdown pages.
    Ranked,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Simple => "simple",
            Variant::Ranked => "ranked",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "simple" => Some(Variant::Simple),
            "ranked" | "trending" => Some(Variant::Ranked),
            _ => None,
        }
    }

    pub fn default_window(&self) -> &'static str {
        match self {
            Variant::Simple => "24h",
            Variant::Ranked => "15d",
        }
    }

    pub fn url_policy(&self) -> UrlPolicy {
        UrlPolicy {
            strip_all_markdown: matches!(self, Variant::Ranked),
        }
    }

    pub fn mode(&self) -> AnnouncementMode {
        match self {
            Variant::Simple => AnnouncementMode::NewContent,
            Variant::Ranked => AnnouncementMode::Trending,
        }
    }
}

/// A source or channel that is either fully configured or switched off
/// because of the first missing variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSetting<T> {
    Enabled(T),
    Disabled { missing: &'static str },
}

impl<T> ChannelSetting<T> {
    pub fn enabled(&self) -> Option<&T> {
        match self {
            ChannelSetting::Enabled(value) => Some(value),
            ChannelSetting::Disabled { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordSettings {
    pub webhook_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwitterSettings {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub github_token: ChannelSetting<String>,
    pub telegram: ChannelSetting<TelegramSettings>,
    pub discord: ChannelSetting<DiscordSettings>,
    pub twitter: ChannelSetting<TwitterSettings>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| -> Result<String, &'static str> {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(name)
        };

        let github_token = setting(read("GH_ACCESS_TOKEN"));
        let telegram = setting((|| -> Result<_, &'static str> {
            Ok(TelegramSettings {
                bot_token: read("TELEGRAM_BOT_TOKEN")?,
                chat_id: read("TELEGRAM_CHAT_ID")?,
            })
        })());
        let discord = setting(read("DISCORD_WEBHOOK_URL").map(|webhook_url| DiscordSettings {
            webhook_url,
        }));
        let twitter = setting((|| -> Result<_, &'static str> {
            Ok(TwitterSettings {
                consumer_key: read("TWITTER_CONSUMER_KEY")?,
                consumer_secret: read("TWITTER_CONSUMER_SECRET")?,
                access_token: read("TWITTER_ACCESS_TOKEN")?,
                access_token_secret: read("TWITTER_ACCESS_TOKEN_SECRET")?,
            })
        })());

        Self {
            github_token,
            telegram,
            discord,
            twitter,
        }
    }
}

fn setting<T>(value: Result<T, &'static str>) -> ChannelSetting<T> {
    match value {
        Ok(value) => ChannelSetting::Enabled(value),
        Err(missing) => ChannelSetting::Disabled { missing },
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub variant: Variant,
    pub targets: Vec<RepositoryTarget>,
    pub threshold: u64,
    pub window: Duration,
    pub window_label: String,
    pub top_n: usize,
    pub shorten_urls: bool,
    pub credentials: Credentials,
}

/// Command-line overrides applied on top of the variant defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub targets: Vec<String>,
    pub threshold: Option<u64>,
    pub window: Option<String>,
    pub top_n: Option<usize>,
    pub no_shorten: bool,
}

impl AppConfig {
    pub fn load(
        variant: Variant,
        overrides: ConfigOverrides,
        credentials: Credentials,
    ) -> AppResult<Self> {
        let targets = if overrides.targets.is_empty() {
            RepositoryTarget::defaults()
        } else {
            overrides
                .targets
                .iter()
                .map(|value| RepositoryTarget::parse(value))
                .collect::<AppResult<Vec<_>>>()?
        };

        let threshold = overrides.threshold.unwrap_or(DEFAULT_THRESHOLD);
        if threshold == 0 {
            return Err(AppError::Configuration(
                "threshold must be a positive integer".to_string(),
            ));
        }

        let top_n = overrides.top_n.unwrap_or(DEFAULT_TOP_N);
        if top_n == 0 {
            return Err(AppError::Configuration(
                "top must be a positive integer".to_string(),
            ));
        }

        let window_label = overrides
            .window
            .unwrap_or_else(|| variant.default_window().to_string());
        let window = parse_window(&window_label)?;
        if Utc::now().checked_sub_signed(window).is_none() {
            return Err(AppError::Configuration(format!(
                "time window '{window_label}' reaches before the earliest representable date"
            )));
        }

        Ok(Self {
            variant,
            targets,
            threshold,
            window,
            window_label,
            top_n,
            shorten_urls: matches!(variant, Variant::Ranked) && !overrides.no_shorten,
            credentials,
        })
    }
}

/// Parses `<n>m`, `<n>h`, `<n>d` or `<n>w` into a positive duration.
pub fn parse_window(value: &str) -> AppResult<Duration> {
    let value = value.trim();
    let invalid = || AppError::Configuration(format!("invalid time window '{value}'"));

    let split = value.len().checked_sub(1).ok_or_else(invalid)?;
    if !value.is_char_boundary(split) {
        return Err(invalid());
    }
    let (amount, unit) = value.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    let window = match unit {
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        _ => None,
    };
    window.ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn parses_windows() {
        assert_eq!(parse_window("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_window("15d").unwrap(), Duration::days(15));
        assert_eq!(parse_window("90m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_window("2w").unwrap(), Duration::weeks(2));
        assert!(parse_window("").is_err());
        assert!(parse_window("0d").is_err());
        assert!(parse_window("d").is_err());
        assert!(parse_window("12y").is_err());
        assert!(parse_window("1📓").is_err());
        assert!(parse_window("99999999999999999w").is_err());
    }

    #[test]
    fn missing_variables_disable_their_channel() {
        let credentials = Credentials::from_lookup(lookup(&[
            ("GH_ACCESS_TOKEN", "ghp_token"),
            ("TELEGRAM_BOT_TOKEN", "bot"),
            ("DISCORD_WEBHOOK_URL", "  "),
            ("TWITTER_CONSUMER_KEY", "ck"),
            ("TWITTER_CONSUMER_SECRET", "cs"),
            ("TWITTER_ACCESS_TOKEN", "at"),
        ]));

        assert_eq!(
            credentials.github_token,
            ChannelSetting::Enabled("ghp_token".to_string())
        );
        assert_eq!(
            credentials.telegram,
            ChannelSetting::Disabled {
                missing: "TELEGRAM_CHAT_ID"
            }
        );
        assert_eq!(
            credentials.discord,
            ChannelSetting::Disabled {
                missing: "DISCORD_WEBHOOK_URL"
            }
        );
        assert_eq!(
            credentials.twitter,
            ChannelSetting::Disabled {
                missing: "TWITTER_ACCESS_TOKEN_SECRET"
            }
        );
    }

    #[test]
    fn variant_defaults() {
        let credentials = Credentials::from_lookup(lookup(&[]));
        let simple =
            AppConfig::load(Variant::Simple, ConfigOverrides::default(), credentials.clone())
                .unwrap();
        assert_eq!(simple.window, Duration::hours(24));
        assert_eq!(simple.threshold, 15);
        assert!(!simple.shorten_urls);
        assert_eq!(simple.targets.len(), 2);

        let ranked =
            AppConfig::load(Variant::Ranked, ConfigOverrides::default(), credentials).unwrap();
        assert_eq!(ranked.window, Duration::days(15));
        assert_eq!(ranked.top_n, 5);
        assert!(ranked.shorten_urls);
        assert!(ranked.variant.url_policy().strip_all_markdown);
    }

    #[test]
    fn rejects_window_beyond_calendar_range() {
        let overrides = ConfigOverrides {
            window: Some("100000000d".to_string()),
            ..Default::default()
        };
        let result = AppConfig::load(
            Variant::Ranked,
            overrides,
            Credentials::from_lookup(lookup(&[])),
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn rejects_zero_threshold() {
        let overrides = ConfigOverrides {
            threshold: Some(0),
            ..Default::default()
        };
        let result = AppConfig::load(
            Variant::Simple,
            overrides,
            Credentials::from_lookup(lookup(&[])),
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
