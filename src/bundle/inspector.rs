//! Bundle inspection.
//!
//! Extracts identity metadata from a bundle file without loading its code
//! or assets.

use crate::bundle::archive;
use crate::bundle::manifest::BundleManifest;
use crate::core::Result;
use std::path::{Path, PathBuf};

/// Identity metadata extracted from a bundle file.
#[derive(Clone, Debug)]
pub struct BundleInfo {
    /// Bundle identity (the manifest's package name)
    pub identity: String,
    /// Path the bundle was inspected at
    pub path: PathBuf,
    /// The packaged manifest
    pub manifest: BundleManifest,
}

/// Inspect a bundle file.
///
/// Reads only the container header and manifest section; a missing file,
/// corrupt header, or rejected manifest yields an error and nothing else
/// happens. Pure read, no side effects.
pub fn inspect(path: impl AsRef<Path>) -> Result<BundleInfo> {
    let path = path.as_ref();
    let manifest = archive::read_manifest(path)?;
    manifest.validate()?;
    Ok(BundleInfo {
        identity: manifest.package.clone(),
        path: path.to_path_buf(),
        manifest,
    })
}
