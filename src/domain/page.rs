use crate::error::{AppError, AppResult};

const INDEX_SUFFIX: &str = "/README.md";
const MARKDOWN_EXTENSION: &str = ".md";

/// A documentation repository and the site it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub repository: String,
    pub base_url: String,
}

impl RepositoryTarget {
    pub fn new(repository: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            base_url: base_url.into(),
        }
    }

    /// Parses `owner/name=https://site/`.
    pub fn parse(value: &str) -> AppResult<Self> {
        let (repository, base_url) = value.split_once('=').ok_or_else(|| {
            AppError::Configuration(format!(
                "expected owner/name=https://base/ but got '{value}'"
            ))
        })?;
        let repository = repository.trim();
        let base_url = base_url.trim();

        let valid_repository = repository
            .split_once('/')
            .is_some_and(|(owner, name)| {
                !owner.is_empty() && !name.is_empty() && !name.contains('/')
            });
        if !valid_repository {
            return Err(AppError::Configuration(format!(
                "repository must look like owner/name, got '{repository}'"
            )));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Configuration(format!(
                "base URL must be http(s), got '{base_url}'"
            )));
        }

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Ok(Self::new(repository, base_url))
    }

    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("carlospolop/hacktricks", "https://book.hacktricks.xyz/"),
            Self::new("carlospolop/hacktricks-cloud", "https://cloud.hacktricks.xyz/"),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlPolicy {
    /// Keep only markdown pages and drop their extension.
    pub strip_all_markdown: bool,
}

/// Public URL of a repository file, or `None` when the policy excludes it.
pub fn page_url(path: &str, base_url: &str, policy: UrlPolicy) -> Option<String> {
    let slug = match path.strip_suffix(INDEX_SUFFIX) {
        Some(directory) => directory,
        None if policy.strip_all_markdown => path.strip_suffix(MARKDOWN_EXTENSION)?,
        None => path,
    };
    Some(format!("{base_url}{slug}"))
}

/// Last path segment of a URL, used as the link label.
pub fn display_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
