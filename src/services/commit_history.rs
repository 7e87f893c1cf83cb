use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::change::CommitRecord;
use crate::error::AppResult;

#[async_trait]
pub trait CommitHistoryService: Send + Sync {
    /// SHAs of commits in `repository` dated at or after `since`, newest first.
    async fn list_commits(&self, repository: &str, since: DateTime<Utc>) -> AppResult<Vec<String>>;
    async fn get_commit(&self, repository: &str, sha: &str) -> AppResult<CommitRecord>;
}
