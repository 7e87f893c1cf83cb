use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::change::{CommitRecord, FileChange};
use crate::error::{AppError, AppResult};
use crate::services::CommitHistoryService;

const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const PAGE_SIZE: usize = 100;

pub struct GitHubClient {
    http: Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(http: Client, token: Option<String>) -> Self {
        Self {
            http,
            api_base: API_BASE.to_string(),
            token,
        }
    }

    fn api_token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or(AppError::MissingCredential("GH_ACCESS_TOKEN"))
    }

    fn commits_endpoint(&self, repository: &str) -> String {
        format!(
            "{}/repos/{}/commits",
            self.api_base.trim_end_matches('/'),
            repository.trim_matches('/')
        )
    }

    async fn get(&self, repository: &str, url: &str, query: &[(&str, String)]) -> AppResult<Response> {
        let token = self.api_token()?;
        let response = self
            .http
            .get(url)
            .query(query)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("changecast/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|err| AppError::upstream(repository, format!("failed to call GitHub: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::upstream(
                repository,
                format!("GitHub responded with {status}: {body}"),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl CommitHistoryService for GitHubClient {
    async fn list_commits(&self, repository: &str, since: DateTime<Utc>) -> AppResult<Vec<String>> {
        let endpoint = self.commits_endpoint(repository);
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut shas = Vec::new();

        for page in 1.. {
            let query = [
                ("since", since.clone()),
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ];
            let batch: Vec<GitHubCommitSummary> = self
                .get(repository, &endpoint, &query)
                .await?
                .json()
                .await
                .map_err(|err| {
                    AppError::upstream(repository, format!("failed to parse commit list: {err}"))
                })?;

            let fetched = batch.len();
            shas.extend(batch.into_iter().map(|commit| commit.sha));
            if fetched < PAGE_SIZE {
                break;
            }
        }

        debug!(repository, commits = shas.len(), %since, "listed commits");
        Ok(shas)
    }

    async fn get_commit(&self, repository: &str, sha: &str) -> AppResult<CommitRecord> {
        let endpoint = format!("{}/{}", self.commits_endpoint(repository), sha);
        let payload: GitHubCommit = self
            .get(repository, &endpoint, &[])
            .await?
            .json()
            .await
            .map_err(|err| {
                AppError::upstream(repository, format!("failed to parse commit {sha}: {err}"))
            })?;

        Ok(payload.into_record())
    }
}

#[derive(Deserialize)]
struct GitHubCommitSummary {
    sha: String,
}

#[derive(Deserialize)]
struct GitHubCommit {
    sha: String,
    #[serde(default)]
    files: Vec<GitHubFile>,
}

impl GitHubCommit {
    fn into_record(self) -> CommitRecord {
        CommitRecord {
            sha: self.sha,
            files: self
                .files
                .into_iter()
                .map(|file| FileChange::new(file.filename, file.changes))
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct GitHubFile {
    filename: String,
    #[serde(default)]
    changes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commit_files() {
        let body = r#"{
            "sha": "abc123",
            "commit": {"message": "update"},
            "files": [
                {"filename": "pentesting/ssh.md", "additions": 10, "deletions": 8, "changes": 18, "status": "modified"},
                {"filename": "images/x.png", "changes": 0, "status": "added"}
            ]
        }"#;
        let commit: GitHubCommit = serde_json::from_str(body).unwrap();
        let record = commit.into_record();
        assert_eq!(record.sha, "abc123");
        assert_eq!(
            record.files,
            vec![
                FileChange::new("pentesting/ssh.md", 18),
                FileChange::new("images/x.png", 0),
            ]
        );
    }

    #[test]
    fn commit_without_files_is_empty() {
        let commit: GitHubCommit = serde_json::from_str(r#"{"sha": "def"}"#).unwrap();
        assert!(commit.into_record().files.is_empty());
    }

    #[test]
    fn builds_commits_endpoint() {
        let client = GitHubClient::new(Client::new(), None);
        assert_eq!(
            client.commits_endpoint("owner/docs"),
            "https://api.github.com/repos/owner/docs/commits"
        );
    }

    #[tokio::test]
    async fn missing_token_is_reported_before_any_request() {
        let client = GitHubClient::new(Client::new(), None);
        let result = client.list_commits("owner/docs", Utc::now()).await;
        assert!(matches!(
            result,
            Err(AppError::MissingCredential("GH_ACCESS_TOKEN"))
        ));
    }
}
