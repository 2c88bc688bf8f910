//! Archive extraction.
//!
//! Two formats are supported, matching the asset classifications: gzip
//! compressed tar archives (decompressed and untarred in one streaming
//! pipeline) and zip archives. Extraction always lands in the cache entry's
//! `bin/` directory; skipping a re-extraction when a valid marker exists is
//! the pipeline's job, not this module's.

use crate::error::{GhrunError, Result};
use crate::matcher::ArchiveKind;
use flate2::read::GzDecoder;
use std::fs;
use std::path::Path;
use tar::Archive;
use tracing::debug;

/// Unpack an archive of the given kind into `dest`, creating `dest` if
/// absent.
pub fn extract_archive(kind: ArchiveKind, archive: &Path, dest: &Path) -> Result<()> {
    debug!(archive = %archive.display(), dest = %dest.display(), ?kind, "extracting");
    match kind {
        ArchiveKind::Tar => extract_tar_gz(archive, dest),
        ArchiveKind::Zip => extract_zip(archive, dest),
        ArchiveKind::None => Ok(()),
    }
}

/// Gzip-decompress and untar in a single streaming pipeline.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;

    let file = fs::File::open(archive)?;
    let decompressor = GzDecoder::new(file);
    let mut tarball = Archive::new(decompressor);

    tarball
        .unpack(dest)
        .map_err(|e| GhrunError::ArchiveExtractionFailed {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Unpack a whole zip archive.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;

    let file = fs::File::open(archive)?;
    let mut zipball =
        zip::ZipArchive::new(file).map_err(|e| GhrunError::ArchiveExtractionFailed {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;

    zipball
        .extract(dest)
        .map_err(|e| GhrunError::ArchiveExtractionFailed {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })
}
