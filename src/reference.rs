//! Repository reference parsing.
//!
//! A reference names a GitHub repository and optionally pins a release tag:
//! `github.com/<owner>/<repo>[@<version>]`. Without a version suffix the
//! reference resolves against the latest release at run time.

use crate::error::{GhrunError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Version placeholder used when the reference carries no `@version` suffix.
pub const LATEST: &str = "latest";

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^github\.com/([\w.-]+)/([\w.-]+)(?:@([\w.-]+))?$")
            .expect("reference pattern is valid")
    })
}

/// A parsed repository reference. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReference {
    pub owner: String,
    pub repo: String,
    pub version: String,
}

impl RepoReference {
    /// Parse a reference string. No normalization is applied: case, trailing
    /// slashes, and URL schemes are all rejected as-is.
    pub fn parse(input: &str) -> Result<Self> {
        let captures = reference_pattern()
            .captures(input)
            .ok_or_else(|| GhrunError::InvalidReference(input.to_string()))?;

        Ok(Self {
            owner: captures[1].to_string(),
            repo: captures[2].to_string(),
            version: captures
                .get(3)
                .map_or_else(|| LATEST.to_string(), |m| m.as_str().to_string()),
        })
    }

    /// Whether the version still needs resolving against the release API.
    pub fn is_latest(&self) -> bool {
        self.version == LATEST
    }
}

impl fmt::Display for RepoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "github.com/{}/{}@{}", self.owner, self.repo, self.version)
    }
}
