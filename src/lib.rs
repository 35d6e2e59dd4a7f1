//! mobipress library
//!
//! Turns an AsciiDoc source tree into Kindle artifacts by orchestrating two
//! external collaborators: a document-conversion engine (asciidoctor with the
//! epub3 backend) and the vendor-distributed `kindlegen` binary, which is
//! downloaded and unpacked on first use.

pub mod config;
pub mod engine;
pub mod fetch;
pub mod platform;
pub mod producer;

// Public exports
pub use config::PublicationConfig;
pub use engine::{AsciidoctorCli, ConversionEngine, ConvertRequest, EngineError, EngineErrorKind};
pub use fetch::ensure_kindlegen;
pub use platform::OsFamily;
pub use producer::{MobiProducer, output_paths};
