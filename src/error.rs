use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhrunError {
    #[error("invalid reference '{0}' (expected github.com/<owner>/<repo>[@version])")]
    InvalidReference(String),

    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("release not found: {repo}@{version}")]
    ReleaseNotFound { repo: String, version: String },

    #[error("GitHub API returned status {0}")]
    ApiError(u16),

    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("no release asset matches this platform for {0}")]
    NoMatchingAsset(String),

    #[error("too many redirects fetching {0}")]
    TooManyRedirects(String),

    #[error("download failed with status {0}")]
    DownloadFailed(u16),

    #[error("failed to extract archive {path}: {reason}")]
    ArchiveExtractionFailed { path: PathBuf, reason: String },

    #[error("no executable found under {0}")]
    BinaryNotFound(PathBuf),

    #[error("failed to run {0}: {1}")]
    ChildProcessError(PathBuf, String),

    #[error("command exited with status {0}")]
    NonZeroExit(i32),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GhrunError>;
