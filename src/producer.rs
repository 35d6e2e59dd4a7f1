//! .mobi production
//!
//! Construction ensures kindlegen is in place; `produce` drives the
//! conversion engine once and returns the two fixed output paths. The engine's
//! "No child processes" report is tolerated because the .mobi frequently
//! exists despite it; every other engine failure is fatal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::PublicationConfig;
use crate::engine::{ConversionEngine, ConvertRequest, EngineErrorKind};
use crate::fetch::ensure_kindlegen;
use crate::platform::OsFamily;

/// The two artifacts the conversion produces under `root`
pub fn output_paths(root: &Path) -> [PathBuf; 2] {
    [root.join("index-kf8.epub"), root.join("index.mobi")]
}

/// Produces the Kindle artifacts for one publication
pub struct MobiProducer<'a> {
    properties: &'a PublicationConfig,
}

impl<'a> MobiProducer<'a> {
    /// Fails if the platform is unsupported or kindlegen cannot be fetched
    pub fn new(properties: &'a PublicationConfig, family: OsFamily) -> Result<Self> {
        ensure_kindlegen(&properties.mobi.kindlegen, family)
            .context("Failed to provision kindlegen")?;
        Ok(Self { properties })
    }

    /// Convert the index document, returning the two fixed output paths
    ///
    /// The paths are returned whether or not the files were actually written;
    /// the caller decides what a missing artifact means. Their presence is
    /// logged to make the tolerated-error case diagnosable.
    pub fn produce(&self, engine: &dyn ConversionEngine) -> Result<[PathBuf; 2]> {
        let root = &self.properties.root;
        let index = root.join("index.adoc");
        let request = self.convert_request();

        if let Err(err) = engine.convert_file(&index, &request) {
            if err.kind() == EngineErrorKind::ChildProcess {
                warn!(
                    "Engine reported an error while producing the .mobi: {}. If the error says \
                     'No child processes' but you see a resulting .mobi in {} then don't worry \
                     about the error.",
                    err,
                    root.display()
                );
            } else {
                return Err(err).context("Conversion of the index document failed");
            }
        }

        let outputs = output_paths(root);
        for path in &outputs {
            if path.exists() {
                info!("produced {}", path.display());
            } else {
                warn!("expected output {} is not present", path.display());
            }
        }
        Ok(outputs)
    }

    fn convert_request(&self) -> ConvertRequest {
        ConvertRequest::new("epub3")
            .attribute("title", &self.properties.book_name)
            .attribute("isbn", &self.properties.mobi.isbn)
            .attribute("code", &self.properties.code)
            .attribute("ebook-format", "kf8")
    }
}
