use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::Variant;
use crate::context::AppContext;
use crate::domain::change::{AggregatedChange, FileChange, aggregate, significant_paths};
use crate::domain::page::{RepositoryTarget, UrlPolicy, page_url};
use crate::error::{AppError, AppResult};
use crate::services::CommitHistoryService;

/// What one repository contributed during the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryChanges {
    /// Significant paths in commit-traversal order.
    Listed(Vec<String>),
    /// Significant paths ranked by summed changed lines.
    Ranked(AggregatedChange),
}

impl RepositoryChanges {
    pub fn paths(&self) -> Vec<&str> {
        match self {
            RepositoryChanges::Listed(paths) => paths.iter().map(String::as_str).collect(),
            RepositoryChanges::Ranked(aggregated) => aggregated.paths().collect(),
        }
    }
}

pub async fn collect_changes(
    history: &dyn CommitHistoryService,
    repository: &str,
    since: DateTime<Utc>,
    threshold: u64,
    variant: Variant,
) -> AppResult<RepositoryChanges> {
    let shas = history.list_commits(repository, since).await?;

    let mut observations: Vec<FileChange> = Vec::new();
    for sha in &shas {
        let commit = history.get_commit(repository, sha).await?;
        observations.extend(commit.files);
    }

    Ok(match variant {
        Variant::Simple => RepositoryChanges::Listed(significant_paths(&observations, threshold)),
        Variant::Ranked => RepositoryChanges::Ranked(aggregate(&observations, threshold)),
    })
}

pub fn page_urls(changes: &RepositoryChanges, target: &RepositoryTarget, policy: UrlPolicy) -> Vec<String> {
    changes
        .paths()
        .into_iter()
        .filter_map(|path| page_url(path, &target.base_url, policy))
        .collect()
}

/// Changed page URLs across every configured repository.
///
/// A repository that cannot be queried contributes nothing; the others still
/// run. The ranked variant drops repeated URLs, keeping the first one, before
/// truncating to the configured top N.
pub async fn changed_pages(ctx: &AppContext, now: DateTime<Utc>) -> Vec<String> {
    let config = &ctx.config;
    let Some(since) = now.checked_sub_signed(config.window) else {
        warn!(window = %config.window_label, "time window reaches before the earliest date; nothing collected");
        return Vec::new();
    };
    let policy = config.variant.url_policy();
    let mut urls = Vec::new();

    for target in &config.targets {
        let changes = match collect_changes(
            ctx.commit_history.as_ref(),
            &target.repository,
            since,
            config.threshold,
            config.variant,
        )
        .await
        {
            Ok(changes) => changes,
            Err(AppError::MissingCredential(variable)) => {
                warn!(
                    repository = %target.repository,
                    "{variable} wasn't configured; skipping repository"
                );
                continue;
            }
            Err(err) => {
                warn!(repository = %target.repository, error = %err, "skipping repository");
                continue;
            }
        };

        let repository_urls = page_urls(&changes, target, policy);
        info!(
            repository = %target.repository,
            pages = repository_urls.len(),
            "collected changed pages"
        );
        urls.extend(repository_urls);
    }

    match config.variant {
        Variant::Simple => urls,
        Variant::Ranked => {
            let mut seen = HashSet::new();
            urls.into_iter()
                .filter(|url| seen.insert(url.clone()))
                .take(config.top_n)
                .collect()
        }
    }
}
