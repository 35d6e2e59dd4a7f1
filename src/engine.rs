//! Conversion engine boundary
//!
//! The document-conversion engine is an opaque collaborator: the producer
//! hands it an index document and a fixed request and only inspects the error
//! kind on failure. `AsciidoctorCli` is the production implementation; tests
//! substitute stubs.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Why a conversion call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// The engine reported "No child processes" while driving kindlegen.
    /// Known false positive: the .mobi may exist despite this error.
    ChildProcess,
    /// Any other conversion failure
    Conversion,
}

/// Error returned by a conversion engine
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    kind: EngineErrorKind,
    message: String,
}

impl EngineError {
    pub fn new(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> EngineErrorKind {
        self.kind
    }
}

/// Conversion request: backend plus document attributes
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub backend: String,
    pub attributes: Vec<(String, String)>,
}

impl ConvertRequest {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

/// Opaque document-conversion collaborator
pub trait ConversionEngine {
    fn convert_file(&self, index: &Path, request: &ConvertRequest) -> Result<(), EngineError>;
}

/// Invokes the `asciidoctor` executable with an explicit argument list
pub struct AsciidoctorCli {
    program: PathBuf,
}

impl AsciidoctorCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for AsciidoctorCli {
    fn default() -> Self {
        Self::new("asciidoctor")
    }
}

impl ConversionEngine for AsciidoctorCli {
    fn convert_file(&self, index: &Path, request: &ConvertRequest) -> Result<(), EngineError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-b").arg(&request.backend);
        for (key, value) in &request.attributes {
            cmd.arg("-a").arg(format!("{key}={value}"));
        }
        cmd.arg(index);

        let output = cmd.output().map_err(|e| {
            EngineError::new(
                EngineErrorKind::Conversion,
                format!("failed to run {}: {e}", self.program.display()),
            )
        })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let kind = if stderr.contains("No child processes") {
            EngineErrorKind::ChildProcess
        } else {
            EngineErrorKind::Conversion
        };

        Err(EngineError::new(
            kind,
            format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            ),
        ))
    }
}
