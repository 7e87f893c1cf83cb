use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::domain::announcement::Announcement;
use crate::error::AppError;
use crate::services::{ChannelRole, MessagingChannel, UrlShortener};
use crate::workflow::collect::changed_pages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    /// The announcement was rejected but the error notice went through.
    ErrorReported { description: String },
    Failed { description: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub channel: &'static str,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnounceOutcome {
    NothingToReport,
    Previewed { message: String },
    Announced { deliveries: Vec<DeliveryReport> },
}

#[derive(Debug, Clone, Copy)]
pub struct AnnounceOptions {
    pub now: DateTime<Utc>,
    pub dry_run: bool,
}

pub async fn announce_changed_pages(ctx: &AppContext, options: AnnounceOptions) -> AnnounceOutcome {
    let urls = changed_pages(ctx, options.now).await;
    if urls.is_empty() {
        info!("No new content added");
        return AnnounceOutcome::NothingToReport;
    }
    info!(?urls, "changed pages found");

    let config = &ctx.config;
    let mut announcement = Announcement::new(config.variant.mode(), &config.window_label, urls);
    if config.shorten_urls {
        if let Some(shortener) = &ctx.url_shortener {
            shorten_links(&mut announcement, shortener.as_ref()).await;
        }
    }

    if options.dry_run {
        return AnnounceOutcome::Previewed {
            message: announcement.to_markdown(),
        };
    }

    if ctx.channels.is_empty() {
        warn!("no messaging channel is configured; announcement not sent");
    }

    let mut deliveries = Vec::with_capacity(ctx.channels.len());
    for channel in &ctx.channels {
        let status = deliver(channel.as_ref(), &announcement).await;
        deliveries.push(DeliveryReport {
            channel: channel.name(),
            status,
        });
    }
    AnnounceOutcome::Announced { deliveries }
}

async fn shorten_links(announcement: &mut Announcement, shortener: &dyn UrlShortener) {
    for item in &mut announcement.items {
        match shortener.shorten(&item.url).await {
            Ok(short) => item.short_url = Some(short),
            Err(err) => warn!(url = %item.url, error = %err, "keeping full URL"),
        }
    }
}

enum Attempt {
    Normal,
    Annotated { description: String },
}

/// Sends one announcement. A primary channel that rejects it gets exactly
/// one follow-up carrying the title and the rejection; anything after that
/// is only logged.
pub async fn deliver(channel: &dyn MessagingChannel, announcement: &Announcement) -> DeliveryStatus {
    let mut attempt = Attempt::Normal;
    loop {
        let text = match &attempt {
            Attempt::Normal => channel.render(announcement),
            Attempt::Annotated { description } => {
                channel.render_notice(&error_notice(&announcement.title, description))
            }
        };

        match (channel.send(&text).await, attempt) {
            (Ok(()), Attempt::Normal) => {
                info!(channel = channel.name(), "announcement delivered");
                return DeliveryStatus::Delivered;
            }
            (Ok(()), Attempt::Annotated { description }) => {
                warn!(channel = channel.name(), %description, "announcement rejected; error notice delivered");
                return DeliveryStatus::ErrorReported { description };
            }
            (Err(err), Attempt::Normal) if channel.role() == ChannelRole::Primary => {
                warn!(channel = channel.name(), error = %err, "announcement rejected; retrying with error notice");
                attempt = Attempt::Annotated {
                    description: rejection_description(err),
                };
            }
            (Err(err), _) => {
                error!(
                    channel = channel.name(),
                    title = %announcement.title,
                    error = %err,
                    "announcement not delivered"
                );
                return DeliveryStatus::Failed {
                    description: rejection_description(err),
                };
            }
        }
    }
}

fn error_notice(first_line: &str, description: &str) -> String {
    format!("Error with {first_line}: {description}")
}

fn rejection_description(err: AppError) -> String {
    match err {
        AppError::Delivery { description, .. } => description,
        other => other.to_string(),
    }
}
