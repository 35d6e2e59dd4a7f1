//! Kindlegen download and unpacking
//!
//! Ensures the kindlegen binary exists at its configured location, fetching
//! the vendor archive and unpacking it on first use. Everything here blocks
//! the calling thread; a second concurrent invocation against the same target
//! is not guarded against.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use log::info;
use url::Url;

use crate::config::KindlegenConfig;
use crate::platform::OsFamily;

/// Vendor archive format, selected purely by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

impl ArchiveKind {
    /// `.zip` unpacks with unzip, anything else with tar
    pub fn of(archive: &Path) -> Self {
        match archive.extension().and_then(|s| s.to_str()) {
            Some("zip") => ArchiveKind::Zip,
            _ => ArchiveKind::TarGz,
        }
    }
}

/// Ensure the kindlegen binary exists at its configured location
///
/// Skips the download when the archive is already on disk and skips the
/// unpack when the binary itself is already present, so repeated calls are
/// no-ops once the binary is in place.
pub fn ensure_kindlegen(kindlegen: &KindlegenConfig, family: OsFamily) -> Result<PathBuf> {
    let binary = &kindlegen.binary_location;
    if binary.exists() {
        info!("kindlegen already present at {}", binary.display());
        return Ok(binary.clone());
    }

    let dir = binary
        .parent()
        .ok_or_else(|| anyhow!("binary location {} has no parent directory", binary.display()))?;
    let archive = dir.join(format!("dl.{}", family.archive_extension()));

    if !archive.exists() {
        std::fs::create_dir_all(dir).with_context(|| {
            format!("couldn't create the directory for the archive, {}", dir.display())
        })?;
        download(family.download_uri(kindlegen), &archive)?;
    }

    if !binary.exists() {
        unpack(&archive, dir)?;
    }

    if !binary.exists() {
        return Err(anyhow!(
            "unpacked {} but {} did not appear",
            archive.display(),
            binary.display()
        ));
    }

    Ok(binary.clone())
}

/// Blocking HTTP GET streamed into `dest`
fn download(uri: &str, dest: &Path) -> Result<()> {
    let url = Url::parse(uri).with_context(|| format!("invalid download URI: {uri}"))?;

    let mut response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to download {uri}"))?
        .error_for_status()
        .with_context(|| format!("Download of {uri} was rejected"))?;

    let mut out = File::create(dest)
        .with_context(|| format!("Failed to create archive file {}", dest.display()))?;
    let bytes = std::io::copy(&mut response, &mut out)
        .with_context(|| format!("Failed to write archive to {}", dest.display()))?;

    info!("downloaded {} ({} bytes) to {}", uri, bytes, dest.display());
    Ok(())
}

/// Unpack `archive` into `dest`, dispatching on archive kind
///
/// Exit status is captured for logging only; whether the binary actually
/// appeared is checked by the caller.
fn unpack(archive: &Path, dest: &Path) -> Result<()> {
    let mut cmd = match ArchiveKind::of(archive) {
        ArchiveKind::Zip => {
            let mut c = Command::new("unzip");
            c.arg(archive).arg("-d").arg(dest);
            c
        }
        ArchiveKind::TarGz => {
            let mut c = Command::new("tar");
            c.arg("xzf").arg(archive).arg("-C").arg(dest);
            c
        }
    };

    let status = cmd
        .status()
        .with_context(|| format!("Failed to spawn extraction command for {}", archive.display()))?;

    info!(
        "extracted {} to {} having return value {}",
        archive.display(),
        dest.display(),
        status
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KindlegenConfig;
    use std::io::Write;

    fn config(binary: PathBuf) -> KindlegenConfig {
        // invalid.invalid never resolves, so any network attempt fails loudly
        KindlegenConfig {
            binary_location: binary,
            unix_download_uri: "https://invalid.invalid/kindlegen.tar.gz".into(),
            osx_download_uri: "https://invalid.invalid/kindlegen.zip".into(),
        }
    }

    /// Write a gzipped tar containing a single `kindlegen` file
    fn write_fixture_archive(archive: &Path) {
        let file = File::create(archive).unwrap();
        let enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(enc);

        let payload = b"#!/bin/sh\nexit 0\n";
        let mut header = tar::Header::new_gnu();
        header.set_path("kindlegen").unwrap();
        header.set_size(payload.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append(&header, payload.as_slice()).unwrap();
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn zip_extension_selects_unzip() {
        assert_eq!(ArchiveKind::of(Path::new("/tmp/dl.zip")), ArchiveKind::Zip);
        assert_eq!(ArchiveKind::of(Path::new("/tmp/dl.tgz")), ArchiveKind::TarGz);
        assert_eq!(
            ArchiveKind::of(Path::new("/tmp/dl.tar.gz")),
            ArchiveKind::TarGz
        );
        assert_eq!(ArchiveKind::of(Path::new("/tmp/dl")), ArchiveKind::TarGz);
    }

    #[test]
    fn existing_binary_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("kindlegen");
        let mut f = File::create(&binary).unwrap();
        f.write_all(b"fake").unwrap();

        // Bogus URIs: any download attempt would fail, so success proves the
        // fetch was skipped entirely.
        let cfg = config(binary.clone());
        let got = ensure_kindlegen(&cfg, OsFamily::UnixLike).unwrap();
        assert_eq!(got, binary);
        assert!(!dir.path().join("dl.tgz").exists());
    }

    #[test]
    fn existing_archive_skips_download_but_unpacks() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("kindlegen");
        let archive = dir.path().join("dl.tgz");
        write_fixture_archive(&archive);

        let cfg = config(binary.clone());
        let got = ensure_kindlegen(&cfg, OsFamily::UnixLike).unwrap();
        assert_eq!(got, binary);
        assert!(binary.exists());
    }

    #[test]
    fn unpack_that_yields_no_binary_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("kindlegen");
        let archive = dir.path().join("dl.tgz");

        // Archive contains a different file, so the binary never appears.
        let file = File::create(&archive).unwrap();
        let enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(enc);
        let payload = b"not the binary\n";
        let mut header = tar::Header::new_gnu();
        header.set_path("README").unwrap();
        header.set_size(payload.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, payload.as_slice()).unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        let cfg = config(binary);
        assert!(ensure_kindlegen(&cfg, OsFamily::UnixLike).is_err());
    }
}
