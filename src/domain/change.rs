use std::collections::HashMap;

/// Changed-line count reported for one file by one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub changes: u64,
}

impl FileChange {
    pub fn new(path: impl Into<String>, changes: u64) -> Self {
        Self {
            path: path.into(),
            changes,
        }
    }

    pub fn is_significant(&self, threshold: u64) -> bool {
        self.changes > threshold
    }
}

#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub sha: String,
    pub files: Vec<FileChange>,
}

/// Cumulative changed lines per path, sorted by descending total.
///
/// Only single-commit observations above the threshold contribute. Equal
/// totals keep the order in which their paths were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedChange {
    entries: Vec<(String, u64)>,
}

impl AggregatedChange {
    #[cfg(test)]
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    #[cfg(test)]
    pub fn total_for(&self, path: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == path)
            .map(|(_, total)| *total)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub fn aggregate<'a, I>(observations: I, threshold: u64) -> AggregatedChange
where
    I: IntoIterator<Item = &'a FileChange>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(String, u64)> = Vec::new();

    for change in observations {
        if !change.is_significant(threshold) {
            continue;
        }
        match index.get(change.path.as_str()) {
            Some(&slot) => entries[slot].1 += change.changes,
            None => {
                index.insert(change.path.as_str(), entries.len());
                entries.push((change.path.clone(), change.changes));
            }
        }
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1));
    AggregatedChange { entries }
}

/// Significant paths in traversal order, one per significant observation.
pub fn significant_paths<'a, I>(observations: I, threshold: u64) -> Vec<String>
where
    I: IntoIterator<Item = &'a FileChange>,
{
    observations
        .into_iter()
        .filter(|change| change.is_significant(threshold))
        .map(|change| change.path.clone())
        .collect()
}
