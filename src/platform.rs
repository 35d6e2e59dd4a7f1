//! Host OS family detection for kindlegen archive selection
//!
//! Amazon shipped kindlegen as a .zip for macOS and a gzipped tar for the
//! Unix-likes; nothing else was ever supported. Detection returns an explicit
//! value that callers pass down rather than re-reading ambient process state.

use anyhow::{anyhow, Result};

use crate::config::KindlegenConfig;

/// OS family the kindlegen distribution supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOs,
    UnixLike,
}

impl OsFamily {
    /// Detect the family of the current host
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Classify an `std::env::consts::OS` value
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "macos" => Ok(OsFamily::MacOs),
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" | "aix" => {
                Ok(OsFamily::UnixLike)
            }
            other => Err(anyhow!(
                "unsupported platform: {}; kindlegen is only available for macOS and Unix-like systems",
                other
            )),
        }
    }

    /// File extension of the vendor archive for this family
    pub fn archive_extension(&self) -> &'static str {
        match self {
            OsFamily::MacOs => "zip",
            OsFamily::UnixLike => "tgz",
        }
    }

    /// Pick the configured download URI for this family
    pub fn download_uri<'a>(&self, kindlegen: &'a KindlegenConfig) -> &'a str {
        match self {
            OsFamily::MacOs => &kindlegen.osx_download_uri,
            OsFamily::UnixLike => &kindlegen.unix_download_uri,
        }
    }
}
