//! Release asset selection.
//!
//! Matching is an ordered list of named rules, each a compiled filename
//! pattern plus the archive classification it implies. Rules are tried in
//! priority order and the first asset accepted by the earliest rule wins;
//! ties within a rule break by the API's original asset order. There is no
//! scoring or fuzzy matching beyond these patterns.

use crate::api::ReleaseAsset;
use crate::error::{GhrunError, Result};
use crate::platform::Platform;
use regex::Regex;

/// How a matched asset must be unpacked before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// A standalone binary, runnable after setting execute bits.
    None,
    /// A gzip-compressed tar archive.
    Tar,
    /// A zip archive.
    Zip,
}

/// A release asset tagged with its archive classification.
#[derive(Debug, Clone)]
pub struct MatchedAsset {
    pub asset: ReleaseAsset,
    pub kind: ArchiveKind,
}

/// One named matching rule: a pure predicate over an asset filename.
pub struct MatchRule {
    pub name: &'static str,
    pub kind: ArchiveKind,
    pattern: Regex,
}

impl MatchRule {
    pub fn accepts(&self, asset_name: &str) -> bool {
        self.pattern.is_match(asset_name)
    }
}

/// Build the rule list for a repository on a given platform, highest
/// priority first: tar archives, then zip archives, then direct binaries.
pub fn match_rules(repo: &str, platform: &Platform) -> Vec<MatchRule> {
    let repo = regex::escape(repo);
    let os = platform
        .os
        .asset_aliases()
        .iter()
        .map(|alias| regex::escape(alias))
        .collect::<Vec<_>>()
        .join("|");
    let arch = platform.arch.asset_name();
    let platform_suffix = format!("_(?:{})_{}", os, arch);

    // Direct binaries need the .exe suffix on Windows and must not carry
    // one anywhere else.
    let exe = if platform.is_windows() { r"\.exe" } else { "" };

    vec![
        MatchRule {
            name: "tar archive",
            kind: ArchiveKind::Tar,
            pattern: Regex::new(&format!(
                r"(?i)^{}{}\.(?:tar\.gz|tgz)$",
                repo, platform_suffix
            ))
            .expect("tar rule pattern is valid"),
        },
        MatchRule {
            name: "zip archive",
            kind: ArchiveKind::Zip,
            pattern: Regex::new(&format!(r"(?i)^{}{}\.zip$", repo, platform_suffix))
                .expect("zip rule pattern is valid"),
        },
        MatchRule {
            name: "direct binary",
            kind: ArchiveKind::None,
            pattern: Regex::new(&format!(
                r"(?i)^{}(?:{})?{}$",
                repo, platform_suffix, exe
            ))
            .expect("binary rule pattern is valid"),
        },
    ]
}

/// Pick the single best asset for the platform. Deterministic for a fixed
/// asset list and platform.
pub fn match_asset(
    assets: &[ReleaseAsset],
    platform: &Platform,
    repo: &str,
) -> Result<MatchedAsset> {
    for rule in match_rules(repo, platform) {
        if let Some(asset) = assets.iter().find(|a| rule.accepts(&a.name)) {
            tracing::debug!(asset = %asset.name, rule = rule.name, "matched release asset");
            return Ok(MatchedAsset {
                asset: asset.clone(),
                kind: rule.kind,
            });
        }
    }

    Err(GhrunError::NoMatchingAsset(repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_string(),
            download_url: format!("https://example.com/{}", name),
            size: 1,
        }
    }

    fn darwin_arm64() -> Platform {
        Platform::from_parts("macos", "aarch64").unwrap()
    }

    fn linux_x86_64() -> Platform {
        Platform::from_parts("linux", "x86_64").unwrap()
    }

    fn windows_x86_64() -> Platform {
        Platform::from_parts("windows", "x86_64").unwrap()
    }

    #[test]
    fn test_tar_beats_zip() {
        let assets = vec![
            asset("widget_Linux_x86_64.zip"),
            asset("widget_Linux_x86_64.tar.gz"),
        ];
        let matched = match_asset(&assets, &linux_x86_64(), "widget").unwrap();
        assert_eq!(matched.asset.name, "widget_Linux_x86_64.tar.gz");
        assert_eq!(matched.kind, ArchiveKind::Tar);
    }

    #[test]
    fn test_tgz_counts_as_tar() {
        let assets = vec![asset("widget_Linux_x86_64.tgz")];
        let matched = match_asset(&assets, &linux_x86_64(), "widget").unwrap();
        assert_eq!(matched.kind, ArchiveKind::Tar);
    }

    #[test]
    fn test_case_insensitive_archive_match() {
        let assets = vec![asset("Widget_linux_X86_64.TAR.GZ")];
        let matched = match_asset(&assets, &linux_x86_64(), "widget").unwrap();
        assert_eq!(matched.kind, ArchiveKind::Tar);
    }

    #[test]
    fn test_darwin_accepts_macos_alias() {
        let assets = vec![asset("widget_macOS_arm64.tar.gz")];
        let matched = match_asset(&assets, &darwin_arm64(), "widget").unwrap();
        assert_eq!(matched.kind, ArchiveKind::Tar);

        let assets = vec![asset("widget_Darwin_arm64.zip")];
        let matched = match_asset(&assets, &darwin_arm64(), "widget").unwrap();
        assert_eq!(matched.kind, ArchiveKind::Zip);
    }

    #[test]
    fn test_direct_binary_plain_and_suffixed() {
        let assets = vec![asset("widget")];
        let matched = match_asset(&assets, &linux_x86_64(), "widget").unwrap();
        assert_eq!(matched.kind, ArchiveKind::None);

        let assets = vec![asset("widget_Linux_x86_64")];
        let matched = match_asset(&assets, &linux_x86_64(), "widget").unwrap();
        assert_eq!(matched.kind, ArchiveKind::None);
    }

    #[test]
    fn test_windows_requires_exe() {
        let assets = vec![asset("widget")];
        assert!(matches!(
            match_asset(&assets, &windows_x86_64(), "widget"),
            Err(GhrunError::NoMatchingAsset(_))
        ));

        let assets = vec![asset("widget.exe")];
        let matched = match_asset(&assets, &windows_x86_64(), "widget").unwrap();
        assert_eq!(matched.kind, ArchiveKind::None);

        let assets = vec![asset("widget_Windows_x86_64.exe")];
        let matched = match_asset(&assets, &windows_x86_64(), "widget").unwrap();
        assert_eq!(matched.kind, ArchiveKind::None);
    }

    #[test]
    fn test_exe_does_not_match_off_windows() {
        let assets = vec![asset("widget.exe")];
        assert!(matches!(
            match_asset(&assets, &linux_x86_64(), "widget"),
            Err(GhrunError::NoMatchingAsset(_))
        ));
    }

    #[test]
    fn test_wrong_platform_is_skipped() {
        let assets = vec![
            asset("widget_Darwin_arm64.tar.gz"),
            asset("widget_Linux_x86_64.tar.gz"),
        ];
        let matched = match_asset(&assets, &linux_x86_64(), "widget").unwrap();
        assert_eq!(matched.asset.name, "widget_Linux_x86_64.tar.gz");

        let matched = match_asset(&assets, &darwin_arm64(), "widget").unwrap();
        assert_eq!(matched.asset.name, "widget_Darwin_arm64.tar.gz");
    }

    #[test]
    fn test_ties_break_by_list_order() {
        // Two assets accepted by the same rule: first in the list wins.
        let assets = vec![
            asset("widget_Darwin_arm64.tar.gz"),
            asset("widget_macOS_arm64.tar.gz"),
        ];
        let matched = match_asset(&assets, &darwin_arm64(), "widget").unwrap();
        assert_eq!(matched.asset.name, "widget_Darwin_arm64.tar.gz");
    }

    #[test]
    fn test_deterministic_repeat_calls() {
        let assets = vec![
            asset("widget_Linux_x86_64.zip"),
            asset("widget_Linux_x86_64.tar.gz"),
            asset("widget"),
        ];
        let first = match_asset(&assets, &linux_x86_64(), "widget").unwrap();
        let second = match_asset(&assets, &linux_x86_64(), "widget").unwrap();
        assert_eq!(first.asset.name, second.asset.name);
        assert_eq!(first.kind, second.kind);
    }

    #[test]
    fn test_repo_name_with_dot_is_literal() {
        // The dot in the repo name must not act as a regex wildcard.
        let assets = vec![asset("myXtool_Linux_x86_64.tar.gz")];
        assert!(match_asset(&assets, &linux_x86_64(), "my.tool").is_err());
    }

    #[test]
    fn test_no_matching_asset() {
        let assets = vec![asset("checksums.txt"), asset("widget_Linux_arm64.tar.gz")];
        assert!(matches!(
            match_asset(&assets, &linux_x86_64(), "widget"),
            Err(GhrunError::NoMatchingAsset(_))
        ));
    }
}
