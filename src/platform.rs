//! Platform detection for selecting the correct release asset.
//!
//! Release assets are conventionally named `<repo>_<Os>_<arch>` with an
//! archive extension, e.g. `widget_Linux_x86_64.tar.gz`. This module maps the
//! host onto the OS and architecture identifiers used in those names.
//!
//! macOS assets appear under either `Darwin` or `macOS` in the wild, so the
//! Darwin variant matches both spellings.

use crate::error::{GhrunError, Result};

/// Operating system identifier as it appears in asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    /// Names this OS goes by in release asset filenames.
    pub fn asset_aliases(&self) -> &'static [&'static str] {
        match self {
            Os::Darwin => &["Darwin", "macOS"],
            Os::Linux => &["Linux"],
            Os::Windows => &["Windows"],
        }
    }
}

/// CPU architecture identifier as it appears in asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Arm64,
    X86,
}

impl Arch {
    pub fn asset_name(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "arm64",
            Arch::X86 => "386",
        }
    }
}

/// The host platform, derived once per run and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Detect the host OS and architecture. The mapping is exhaustive and
    /// fixed; anything else is unsupported.
    pub fn detect() -> Result<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn from_parts(os: &str, arch: &str) -> Result<Self> {
        let os = match os {
            "macos" => Os::Darwin,
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            other => return Err(GhrunError::UnsupportedPlatform(other.to_string())),
        };

        let arch = match arch {
            "x86_64" => Arch::X86_64,
            "aarch64" | "arm64" => Arch::Arm64,
            "x86" => Arch::X86,
            other => return Err(GhrunError::UnsupportedPlatform(other.to_string())),
        };

        Ok(Self { os, arch })
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }
}
