//! In-memory stand-ins for the service traits.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::{AppConfig, ConfigOverrides, Credentials, Variant};
use crate::context::AppContext;
use crate::domain::announcement::Announcement;
use crate::domain::change::{CommitRecord, FileChange};
use crate::error::{AppError, AppResult};
use crate::services::{ChannelRole, CommitHistoryService, MessagingChannel, UrlShortener};

#[derive(Clone, Default)]
pub struct FakeHistory {
    commits: Vec<(String, CommitRecord)>,
    failing: HashSet<String>,
    no_token: bool,
    since: Arc<Mutex<Vec<DateTime<Utc>>>>,
}

impl FakeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(mut self, repository: &str, sha: &str, files: &[(&str, u64)]) -> Self {
        let record = CommitRecord {
            sha: sha.to_string(),
            files: files
                .iter()
                .map(|(path, changes)| FileChange::new(*path, *changes))
                .collect(),
        };
        self.commits.push((repository.to_string(), record));
        self
    }

    pub fn failing(mut self, repository: &str) -> Self {
        self.failing.insert(repository.to_string());
        self
    }

    pub fn without_token(mut self) -> Self {
        self.no_token = true;
        self
    }

    pub fn requested_since(&self) -> Vec<DateTime<Utc>> {
        self.since.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommitHistoryService for FakeHistory {
    async fn list_commits(&self, repository: &str, since: DateTime<Utc>) -> AppResult<Vec<String>> {
        if self.no_token {
            return Err(AppError::MissingCredential("GH_ACCESS_TOKEN"));
        }
        if self.failing.contains(repository) {
            return Err(AppError::upstream(repository, "rate limited"));
        }
        self.since.lock().unwrap().push(since);
        Ok(self
            .commits
            .iter()
            .filter(|(repo, _)| repo == repository)
            .map(|(_, record)| record.sha.clone())
            .collect())
    }

    async fn get_commit(&self, repository: &str, sha: &str) -> AppResult<CommitRecord> {
        self.commits
            .iter()
            .find(|(repo, record)| repo == repository && record.sha == sha)
            .map(|(_, record)| record.clone())
            .ok_or_else(|| AppError::upstream(repository, format!("unknown commit {sha}")))
    }
}

/// Records every send; each send pops the next scripted rejection, if any.
pub struct FakeChannel {
    name: &'static str,
    role: ChannelRole,
    rejections: Mutex<VecDeque<String>>,
    sent: Mutex<Vec<String>>,
}

impl FakeChannel {
    pub fn new(name: &'static str, role: ChannelRole) -> Arc<Self> {
        Self::rejecting(name, role, &[])
    }

    pub fn rejecting(name: &'static str, role: ChannelRole, rejections: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            role,
            rejections: Mutex::new(rejections.iter().map(|r| r.to_string()).collect()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingChannel for FakeChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    fn role(&self) -> ChannelRole {
        self.role
    }

    fn render(&self, announcement: &Announcement) -> String {
        announcement.to_markdown()
    }

    async fn send(&self, text: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(text.to_string());
        match self.rejections.lock().unwrap().pop_front() {
            Some(description) => Err(AppError::delivery(self.name, description)),
            None => Ok(()),
        }
    }
}

pub struct FakeShortener {
    pub fail: bool,
}

#[async_trait]
impl UrlShortener for FakeShortener {
    async fn shorten(&self, url: &str) -> AppResult<String> {
        if self.fail {
            return Err(AppError::Shortener("service unavailable".to_string()));
        }
        let slug = url.rsplit('/').next().unwrap_or_default();
        Ok(format!("https://tiny.example/{slug}"))
    }
}

pub fn context_with(
    variant: Variant,
    history: FakeHistory,
    channels: Vec<Arc<FakeChannel>>,
) -> AppContext {
    let overrides = ConfigOverrides {
        targets: vec![
            "org/book=https://book.example.org/".to_string(),
            "org/cloud=https://cloud.example.org/".to_string(),
        ],
        ..Default::default()
    };
    let config = AppConfig::load(variant, overrides, Credentials::from_lookup(|_| None)).unwrap();
    let channels = channels
        .into_iter()
        .map(|channel| channel as Arc<dyn MessagingChannel>)
        .collect();
    AppContext::new(config, Arc::new(history), channels, None)
}
