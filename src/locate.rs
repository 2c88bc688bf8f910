//! Executable search inside an extracted archive tree.
//!
//! Archives rarely contain a single file at the root: the binary may sit
//! next to a README and LICENSE, or one or two directories down. The search
//! is a depth-limited scan (three levels) over a per-directory sorted order,
//! run in two passes:
//!
//! 1. **Strict pass**: accept files carrying an executable permission bit
//!    whose name is neither a documentation name (`readme*`, `license*`,
//!    `changelog*`, `contributing*`) nor a known source/config extension.
//! 2. **Loose pass**: some archives lose permission bits, so accept files
//!    with no extension or a `.exe` extension, same documentation exclusions.
//!
//! In both passes a file whose name contains the repository name stops the
//! scan immediately; otherwise the first acceptance anywhere in the pass is
//! remembered and used only after the whole pass finds no name match. The
//! chosen file gets execute bits for all permission classes before being
//! returned.

use crate::error::{GhrunError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const MAX_DEPTH: usize = 3;

/// Extensions that mark a file as source, config, or docs, never a binary.
const NON_BINARY_EXTENSIONS: &[&str] = &[
    "md", "txt", "json", "yaml", "yml", "toml", "cfg", "ini", "html", "js", "ts", "css", "scss",
    "py", "rb", "go", "rs", "java", "c", "cpp", "h", "hpp",
];

/// Basename prefixes for files that ship alongside binaries but never are one.
const NON_BINARY_NAME_PREFIXES: &[&str] = &["readme", "license", "changelog", "contributing"];

#[derive(Clone, Copy, PartialEq)]
enum Pass {
    Strict,
    Loose,
}

/// Result of scanning one directory subtree: a name-matching hit stops the
/// whole pass, a fallback is the first otherwise-acceptable file seen.
struct ScanOutcome {
    hit: Option<PathBuf>,
    fallback: Option<PathBuf>,
}

/// Find the intended executable under `root`, using the repository name as
/// the tie-breaking hint.
pub fn find_binary(root: &Path, repo: &str) -> Result<PathBuf> {
    let repo_lower = repo.to_lowercase();

    for pass in [Pass::Strict, Pass::Loose] {
        let outcome = scan_dir(root, &repo_lower, 1, pass)?;
        if let Some(path) = outcome.hit.or(outcome.fallback) {
            set_executable(&path)?;
            debug!(binary = %path.display(), "located executable");
            return Ok(path);
        }
    }

    Err(GhrunError::BinaryNotFound(root.to_path_buf()))
}

fn scan_dir(dir: &Path, repo_lower: &str, depth: usize, pass: Pass) -> Result<ScanOutcome> {
    let mut entries: Vec<(String, PathBuf, bool)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type()?.is_dir();
        entries.push((name, entry.path(), is_dir));
    }

    // Cascading order: repo-named entries first, documentation last,
    // otherwise keep the directory listing order (the sort is stable).
    entries.sort_by_key(|(name, _, _)| {
        if name_matches(name, repo_lower) {
            0
        } else if is_doc_name(name) {
            2
        } else {
            1
        }
    });

    let mut fallback: Option<PathBuf> = None;

    for (name, path, is_dir) in entries {
        if is_dir {
            if depth < MAX_DEPTH {
                let child = scan_dir(&path, repo_lower, depth + 1, pass)?;
                if child.hit.is_some() {
                    return Ok(child);
                }
                if fallback.is_none() {
                    fallback = child.fallback;
                }
            }
            continue;
        }

        if !accepts(pass, &name, &path) {
            continue;
        }

        if name_matches(&name, repo_lower) {
            return Ok(ScanOutcome {
                hit: Some(path),
                fallback,
            });
        }
        if fallback.is_none() {
            fallback = Some(path);
        }
    }

    Ok(ScanOutcome { hit: None, fallback })
}

fn accepts(pass: Pass, name: &str, path: &Path) -> bool {
    if is_doc_name(name) {
        return false;
    }
    match pass {
        Pass::Strict => is_executable(path) && !has_non_binary_extension(name),
        Pass::Loose => {
            let lower = name.to_lowercase();
            !lower.contains('.') || lower.ends_with(".exe")
        }
    }
}

fn name_matches(name: &str, repo_lower: &str) -> bool {
    name.to_lowercase().contains(repo_lower)
}

fn is_doc_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    NON_BINARY_NAME_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

fn has_non_binary_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            NON_BINARY_EXTENSIONS.iter().any(|known| *known == ext)
        })
}

/// Whether `path` names an existing file the current user could execute.
#[cfg(unix)]
pub(crate) fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub(crate) fn is_executable(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}

/// Add execute bits for all permission classes.
#[cfg(unix)]
pub(crate) fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
