//! Loaded plugin package.
//!
//! The immutable registry entry owning a bundle's contexts and metadata.

use crate::bundle::inspector::BundleInfo;
use crate::bundle::manifest::BundleManifest;
use crate::context::code::CodeContext;
use crate::context::resources::ResourceContext;
use crate::core::{now, Timestamp};
use std::path::Path;

/// A loaded bundle's registry entry.
///
/// Created once on the first successful load of an identity, immutable
/// thereafter, and kept for the life of the registry. Both contexts are
/// exclusively owned; they are never shared with another entry.
pub struct PluginPackage {
    identity: String,
    source_path: std::path::PathBuf,
    manifest: BundleManifest,
    code: CodeContext,
    resources: ResourceContext,
    loaded_at: Timestamp,
}

impl PluginPackage {
    pub(crate) fn new(info: BundleInfo, code: CodeContext, resources: ResourceContext) -> Self {
        Self {
            identity: info.identity,
            source_path: info.path,
            manifest: info.manifest,
            code,
            resources,
            loaded_at: now(),
        }
    }

    /// Bundle identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Path the bundle was first loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Inspected manifest.
    pub fn manifest(&self) -> &BundleManifest {
        &self.manifest
    }

    /// Code-resolution context.
    pub fn code(&self) -> &CodeContext {
        &self.code
    }

    /// Resource-lookup context.
    pub fn resources(&self) -> &ResourceContext {
        &self.resources
    }

    /// When the package was loaded.
    pub fn loaded_at(&self) -> Timestamp {
        self.loaded_at
    }

    /// The bundle's default entry component.
    pub fn default_entry(&self) -> Option<&str> {
        self.manifest.default_entry()
    }
}

impl std::fmt::Debug for PluginPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginPackage")
            .field("identity", &self.identity)
            .field("source_path", &self.source_path)
            .field("loaded_at", &self.loaded_at)
            .finish_non_exhaustive()
    }
}
