//! The resolution pipeline: reference → release → asset → local executable.
//!
//! Stages run strictly in sequence. Three cache levels are consulted in
//! order: the whole-entry marker (skips everything, including the asset
//! listing), the raw asset on disk (skips the download), and the extraction
//! marker (skips extract + locate). Nothing here retries; any stage failure
//! aborts the run.

use crate::api::GithubApi;
use crate::cache::{CacheKey, CacheStore};
use crate::download;
use crate::error::Result;
use crate::extract;
use crate::locate;
use crate::matcher::{self, ArchiveKind};
use crate::platform::Platform;
use crate::reference::RepoReference;
use std::path::PathBuf;
use tracing::{debug, info};

/// Resolve a reference to a runnable local executable, downloading and
/// extracting only what the cache cannot serve.
pub async fn resolve_binary(
    api: &GithubApi,
    cache: &dyn CacheStore,
    reference: &RepoReference,
    quiet: bool,
) -> Result<PathBuf> {
    let version = if reference.is_latest() {
        api.resolve_latest(&reference.owner, &reference.repo).await?
    } else {
        reference.version.clone()
    };
    debug!(%reference, %version, "resolved version");

    let key = CacheKey::new(&reference.owner, &reference.repo, &version);
    if let Some(binary) = cache.resolved_binary(&key) {
        debug!(binary = %binary.display(), "cache hit");
        return Ok(binary);
    }

    let assets = api
        .list_assets(&reference.owner, &reference.repo, &version)
        .await?;
    let platform = Platform::detect()?;
    let matched = matcher::match_asset(&assets, &platform, &reference.repo)?;

    let asset_path = match cache.cached_asset(&key, &matched.asset.name) {
        Some(path) => {
            debug!(asset = %path.display(), "reusing downloaded asset");
            path
        }
        None => {
            info!(asset = %matched.asset.name, "downloading");
            let dest = cache.asset_path(&key, &matched.asset.name);
            let client = download::client()?;
            download::download(&client, &matched.asset.download_url, &dest, quiet).await?;
            dest
        }
    };

    let binary = match matched.kind {
        ArchiveKind::None => {
            locate::set_executable(&asset_path)?;
            asset_path
        }
        kind => match cache.extracted_binary(&key) {
            Some(binary) => {
                debug!(binary = %binary.display(), "reusing extracted binary");
                binary
            }
            None => {
                let extract_dir = cache.extraction_dir(&key);
                extract::extract_archive(kind, &asset_path, &extract_dir)?;
                let binary = locate::find_binary(&extract_dir, &reference.repo)?;
                cache.record_extracted_binary(&key, &binary)?;
                binary
            }
        },
    };

    cache.record_resolved_binary(&key, &binary)?;
    Ok(binary)
}
