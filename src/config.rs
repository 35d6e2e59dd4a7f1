//! Publication configuration
//!
//! On-disk TOML description of the book being produced. Loaded once at
//! startup, immutable afterwards; the producer borrows it for its lifetime.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level publication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationConfig {
    /// Root directory of the AsciiDoc source tree (contains index.adoc)
    pub root: PathBuf,
    pub book_name: String,
    /// Short book code embedded as a document attribute
    pub code: String,
    pub mobi: MobiConfig,
}

/// Settings specific to the .mobi artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobiConfig {
    pub isbn: String,
    pub kindlegen: KindlegenConfig,
}

/// Where the kindlegen binary lives and where to fetch it from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindlegenConfig {
    /// Path the kindlegen binary must exist at after fetching
    pub binary_location: PathBuf,
    pub unix_download_uri: String,
    pub osx_download_uri: String,
}

impl Default for PublicationConfig {
    fn default() -> Self {
        let binary_location = dirs::data_local_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp")))
            .join("mobipress")
            .join("kindlegen");

        Self {
            root: PathBuf::from("."),
            book_name: "book".into(),
            code: "book".into(),
            mobi: MobiConfig {
                isbn: String::new(),
                kindlegen: KindlegenConfig {
                    binary_location,
                    unix_download_uri:
                        "https://kindlegen.s3.amazonaws.com/kindlegen_linux_2.6_i386_v2_9.tar.gz"
                            .into(),
                    osx_download_uri:
                        "https://kindlegen.s3.amazonaws.com/KindleGen_Mac_i386_v2_9.zip".into(),
                },
            },
        }
    }
}

impl PublicationConfig {
    /// Load configuration from `path`, writing a default file first if none exists
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "Config not found at {}, creating default configuration",
                path.display()
            );

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }

            let default_toml = toml::to_string_pretty(&Self::default())
                .context("Failed to serialize default config")?;
            fs::write(path, default_toml).context("Failed to write config file")?;

            log::info!("Created default configuration at {}", path.display());
        }

        let cfg_str = fs::read_to_string(path).context("Failed to read config file")?;
        let cfg: Self = toml::from_str(&cfg_str).context("Failed to parse config")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = PublicationConfig {
            root: PathBuf::from("/books/rust-in-anger"),
            book_name: "Rust in Anger".into(),
            code: "ria".into(),
            mobi: MobiConfig {
                isbn: "978-0-0000-0000-0".into(),
                kindlegen: KindlegenConfig {
                    binary_location: PathBuf::from("/opt/kindlegen/kindlegen"),
                    unix_download_uri: "https://example.com/kindlegen.tar.gz".into(),
                    osx_download_uri: "https://example.com/kindlegen.zip".into(),
                },
            },
        };

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: PublicationConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.book_name, "Rust in Anger");
        assert_eq!(back.mobi.isbn, "978-0-0000-0000-0");
        assert_eq!(
            back.mobi.kindlegen.binary_location,
            PathBuf::from("/opt/kindlegen/kindlegen")
        );
    }

    #[test]
    fn load_or_init_writes_a_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("mobipress.toml");

        let cfg = PublicationConfig::load_or_init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.book_name, "book");

        // Second load reads the file it just wrote
        let again = PublicationConfig::load_or_init(&path).unwrap();
        assert_eq!(again.code, cfg.code);
    }
}
