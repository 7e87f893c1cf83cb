use crate::domain::page::display_name;

const TWEET_LIMIT: usize = 280;
const TWEET_URL_WEIGHT: usize = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementMode {
    NewContent,
    Trending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementItem {
    pub url: String,
    pub short_url: Option<String>,
}

impl AnnouncementItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            short_url: None,
        }
    }

    pub fn name(&self) -> &str {
        display_name(&self.url)
    }

    pub fn link(&self) -> &str {
        self.short_url.as_deref().unwrap_or(&self.url)
    }
}

#[derive(Debug, Clone)]
pub struct Announcement {
    pub title: String,
    pub items: Vec<AnnouncementItem>,
}

impl Announcement {
    pub fn new(mode: AnnouncementMode, window_label: &str, urls: Vec<String>) -> Self {
        let title = match mode {
            AnnouncementMode::NewContent => {
                "📓 New content has been added to the following pages 📓".to_string()
            }
            AnnouncementMode::Trending => {
                format!("🔥 Most updated pages of the last {window_label} 🔥")
            }
        };
        Self {
            title,
            items: urls.into_iter().map(AnnouncementItem::new).collect(),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut message = format!("{}\n\n", self.title);
        for item in &self.items {
            match &item.short_url {
                Some(short) => message.push_str(&format!("- {}: {short}\n", item.name())),
                None => message.push_str(&format!("- [{}]({})\n", item.name(), item.url)),
            }
        }
        message
    }

    /// Plain text that fits a tweet; trailing items are dropped until it does.
    pub fn to_tweet(&self) -> String {
        let mut tweet = self.title.clone();
        let mut weight = tweet_weight(&self.title);
        for item in &self.items {
            let line_weight = 1 + tweet_weight(item.name()) + 1 + TWEET_URL_WEIGHT;
            if weight + line_weight > TWEET_LIMIT {
                break;
            }
            tweet.push_str(&format!("\n{} {}", item.name(), item.link()));
            weight += line_weight;
        }
        tweet
    }
}

/// Length as the tweet limit counts it: code points outside the Latin,
/// general punctuation and prime ranges weigh two.
fn tweet_weight(text: &str) -> usize {
    text.chars()
        .map(|ch| match u32::from(ch) {
            0x0000..=0x10FF | 0x2000..=0x200D | 0x2010..=0x201F | 0x2032..=0x2037 => 1,
            _ => 2,
        })
        .sum()
}
