//! Commit-reference parsing.
//!
//! A namespace is created from a commit location in the compact form
//! `provider/owner/repo:branch[#commit]`, e.g.
//! `GITHUB/acme/app:main` or `GITHUB/acme/app:trunk#d10abcd`.

use std::str::FromStr;

use serde::Serialize;

use crate::error::ApiError;

/// A pointer to source code used to materialize a namespace.
///
/// Only a creation parameter; never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRef {
    /// Source provider, e.g. `GITHUB`.
    pub provider: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch name.
    pub branch: String,
    /// Commit hash; empty when the branch head is meant.
    pub commit: String,
}

impl FromStr for CommitRef {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (before_hash, commit) = match s.split_once('#') {
            Some((head, hash)) => (head, hash.to_string()),
            None => (s, String::new()),
        };

        let (project, branch) = before_hash
            .split_once(':')
            .ok_or_else(|| ApiError::Parse(format!("invalid project '{s}': no branch info")))?;

        if branch.is_empty() {
            return Err(ApiError::Parse(format!("invalid project '{s}': no branch info")));
        }

        let parts: Vec<&str> = project.split('/').collect();
        let [provider, owner, repo] = parts[..] else {
            return Err(ApiError::Parse(format!(
                "invalid project '{s}': expected provider/owner/repo"
            )));
        };

        Ok(Self {
            provider: provider.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            commit,
        })
    }
}
