//! Resource-lookup contexts.
//!
//! A bundle's packaged assets composed with the host's display metrics and
//! configuration, so bundle-drawn and host-drawn content stay consistent.

use crate::bundle::archive::BundleArchive;
use crate::core::Result;
use crate::host::ResourceHost;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Host display metrics snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    /// Pixel density scale factor
    pub density: f32,
    /// Display width in pixels
    pub width_px: u32,
    /// Display height in pixels
    pub height_px: u32,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            density: 1.0,
            width_px: 1280,
            height_px: 720,
        }
    }
}

/// Host UI theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

/// Host configuration snapshot composed into bundle resource lookups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostConfiguration {
    /// BCP 47 locale tag (e.g. "en-US")
    pub locale: String,
    /// Active theme
    pub theme: Theme,
    /// User font scale factor
    pub font_scale: f32,
}

impl Default for HostConfiguration {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            theme: Theme::Light,
            font_scale: 1.0,
        }
    }
}

/// Resource-lookup context scoped to one loaded bundle.
///
/// Lookups consult the bundle's own packaged assets; display metrics and
/// configuration are snapshotted from the host at build time. Never shared
/// across registry entries.
pub struct ResourceContext {
    assets: HashMap<String, Vec<u8>>,
    metrics: DisplayMetrics,
    configuration: HostConfiguration,
}

impl ResourceContext {
    /// Build the context from a bundle file and the host's resource state.
    ///
    /// Opens the bundle's asset container (verifying the content digest)
    /// and composes it with the host snapshot. Any failure abandons the
    /// registry entry; nothing is partially cached.
    pub(crate) fn build(path: &Path, host: &dyn ResourceHost) -> Result<Self> {
        let archive = BundleArchive::open(path)?;
        Ok(Self {
            assets: archive.into_assets(),
            metrics: host.display_metrics(),
            configuration: host.configuration(),
        })
    }

    /// Look up a packaged asset by name.
    pub fn asset(&self, name: &str) -> Option<&[u8]> {
        self.assets.get(name).map(|v| v.as_slice())
    }

    /// Whether the bundle packages an asset with this name.
    pub fn has_asset(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Names of all packaged assets.
    pub fn asset_names(&self) -> Vec<&str> {
        self.assets.keys().map(|k| k.as_str()).collect()
    }

    /// Display metrics snapshotted from the host.
    pub fn display_metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    /// Configuration snapshotted from the host.
    pub fn configuration(&self) -> &HostConfiguration {
        &self.configuration
    }
}

impl std::fmt::Debug for ResourceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceContext")
            .field("assets", &self.assets.len())
            .field("metrics", &self.metrics)
            .field("configuration", &self.configuration)
            .finish()
    }
}
