use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::OpsError;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "main";

// GitHub account names: alphanumerics and single inner hyphens.
static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9](?:-?[A-Za-z0-9])*$").unwrap());

static REPO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

/// The remote and branch a push goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub remote: String,
    pub branch: String,
}

impl PushTarget {
    /// Resolve a push target, substituting defaults for empty names.
    pub fn resolve(remote: &str, branch: &str) -> Self {
        let remote = if remote.is_empty() {
            DEFAULT_REMOTE
        } else {
            remote
        };
        let branch = if branch.is_empty() {
            DEFAULT_BRANCH
        } else {
            branch
        };
        Self {
            remote: remote.to_string(),
            branch: branch.to_string(),
        }
    }
}

impl Display for PushTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// Build the GitHub HTTPS remote URL for a repository.
pub fn github_url(account: &str, repo_name: &str) -> Result<String, OpsError> {
    if !ACCOUNT_RE.is_match(account) {
        return Err(OpsError::InvalidRemoteName {
            kind: "account name",
            value: account.to_string(),
        });
    }
    if !REPO_RE.is_match(repo_name) || repo_name == "." || repo_name == ".." {
        return Err(OpsError::InvalidRemoteName {
            kind: "repository name",
            value: repo_name.to_string(),
        });
    }
    Ok(format!("https://github.com/{account}/{repo_name}.git"))
}
