use crate::config::{ChannelSetting, Credentials, DEFAULT_THRESHOLD, DEFAULT_TOP_N};
use crate::domain::page::RepositoryTarget;
use crate::error::AppResult;

/// Show which sources and channels the environment enables (secrets masked).
pub fn run() -> AppResult<()> {
    let credentials = Credentials::from_env();
    for line in describe(&credentials) {
        println!("{line}");
    }
    Ok(())
}

fn describe(credentials: &Credentials) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "GitHub token: {}",
        display_setting(&credentials.github_token, |token| mask_secret(token))
    ));
    lines.push(format!(
        "Telegram (primary): {}",
        display_setting(&credentials.telegram, |settings| format!(
            "bot {} -> chat {}",
            mask_secret(&settings.bot_token),
            settings.chat_id
        ))
    ));
    lines.push(format!(
        "Discord webhook: {}",
        display_setting(&credentials.discord, |settings| mask_secret(
            &settings.webhook_url
        ))
    ));
    lines.push(format!(
        "Twitter: {}",
        display_setting(&credentials.twitter, |settings| format!(
            "consumer {} / token {}",
            mask_secret(&settings.consumer_key),
            mask_secret(&settings.access_token)
        ))
    ));

    lines.push(format!(
        "Default threshold: {DEFAULT_THRESHOLD} changed lines, top {DEFAULT_TOP_N} when ranked"
    ));
    lines.push("Default repositories:".to_string());
    for target in RepositoryTarget::defaults() {
        lines.push(format!("  {} -> {}", target.repository, target.base_url));
    }
    lines
}

fn display_setting<T>(setting: &ChannelSetting<T>, show: impl Fn(&T) -> String) -> String {
    match setting {
        ChannelSetting::Enabled(value) => show(value),
        ChannelSetting::Disabled { missing } => format!("<disabled: {missing} not set>"),
    }
}

fn mask_secret(token: &str) -> String {
    let length = token.chars().count();
    if length > 6 {
        let prefix: String = token.chars().take(3).collect();
        let suffix: String = token.chars().skip(length - 3).collect();
        format!("{prefix}***{suffix}")
    } else if length > 0 {
        "***".to_string()
    } else {
        "<not set>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret("ghp_abcdef123"), "ghp***123");
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret(""), "<not set>");
    }

    #[test]
    fn describes_disabled_channels() {
        let credentials = Credentials::from_lookup(|name| {
            (name == "GH_ACCESS_TOKEN").then(|| "ghp_abcdef123".to_string())
        });
        let lines = describe(&credentials);
        assert_eq!(lines[0], "GitHub token: ghp***123");
        assert_eq!(
            lines[1],
            "Telegram (primary): <disabled: TELEGRAM_BOT_TOKEN not set>"
        );
        assert!(lines.iter().any(|l| l.contains("carlospolop/hacktricks ->")));
    }
}
