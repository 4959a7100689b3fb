//! Isolated component-resolution contexts.
//!
//! Each loaded bundle gets its own resolver chain so identically-named
//! components in independently-loaded bundles never clash, while host
//! framework components stay reachable through the fallback link.

use crate::bundle::inspector::BundleInfo;
use crate::bundle::manifest::Capability;
use crate::core::Result;
use crate::host::CodeLoader;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A resolved component symbol.
///
/// Components declare at most one recognized base [`Capability`]; dispatch
/// rejects components that declare none.
pub trait ComponentClass: Send + Sync {
    /// Fully-qualified component name.
    fn name(&self) -> &str;

    /// The recognized base capability this component declares, if any.
    fn capability(&self) -> Option<Capability>;
}

/// Resolves fully-qualified component names to component symbols.
///
/// Resolvers are consulted in chain order; the first that claims a name
/// wins.
pub trait ComponentResolver: Send + Sync {
    /// Resolve a fully-qualified component name.
    fn resolve(&self, name: &str) -> Option<Arc<dyn ComponentClass>>;

    /// Human-readable resolver name for diagnostics.
    fn name(&self) -> &str;
}

/// Code-resolution context scoped to one loaded bundle.
///
/// Owns the bundle-local resolver produced by the host's code loader, the
/// fallback link to the host's own resolver, and a private on-disk staging
/// area for derived artifacts. Never shared across registry entries.
pub struct CodeContext {
    bundle_path: PathBuf,
    staging_dir: PathBuf,
    local: Arc<dyn ComponentResolver>,
    host: Arc<dyn ComponentResolver>,
}

impl CodeContext {
    /// Build the context for an inspected bundle.
    ///
    /// Creates `<staging_root>/<identity>` and hands it to the code loader
    /// together with the bundle metadata.
    pub(crate) fn build(
        info: &BundleInfo,
        loader: &dyn CodeLoader,
        host: Arc<dyn ComponentResolver>,
        staging_root: &Path,
    ) -> Result<Self> {
        let staging_dir = staging_root.join(&info.identity);
        fs::create_dir_all(&staging_dir)?;
        let local = loader.load(info, &staging_dir)?;
        Ok(Self {
            bundle_path: info.path.clone(),
            staging_dir,
            local,
            host,
        })
    }

    /// Resolve a fully-qualified component name.
    ///
    /// The bundle's own components shadow host components of the same name;
    /// names the bundle does not define fall back to the host resolver.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ComponentClass>> {
        self.local
            .resolve(name)
            .or_else(|| self.host.resolve(name))
    }

    /// Path of the bundle file this context was built from.
    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }

    /// Private staging directory for derived artifacts.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }
}

impl std::fmt::Debug for CodeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeContext")
            .field("bundle_path", &self.bundle_path)
            .field("staging_dir", &self.staging_dir)
            .field("local", &self.local.name())
            .field("host", &self.host.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::archive::BundleWriter;
    use crate::bundle::inspector::inspect;
    use crate::bundle::manifest::BundleManifest;
    use crate::host::{DeclaredComponent, ManifestCodeLoader, StaticResolver};
    use std::path::PathBuf;

    fn temp_dir(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()))
    }

    fn write_bundle(manifest: BundleManifest) -> PathBuf {
        let path = temp_dir("gantry-code").with_extension("bundle");
        BundleWriter::new(manifest).write_to(&path).unwrap();
        path
    }

    fn build_context(manifest: BundleManifest, host: StaticResolver) -> CodeContext {
        let path = write_bundle(manifest);
        let info = inspect(&path).unwrap();
        CodeContext::build(
            &info,
            &ManifestCodeLoader,
            Arc::new(host),
            &temp_dir("gantry-staging"),
        )
        .unwrap()
    }

    #[test]
    fn test_resolves_bundle_component() {
        let manifest =
            BundleManifest::new("com.example.notes", "1.0.0").with_component(".MainScreen", "screen");
        let context = build_context(manifest, StaticResolver::new("host"));

        let class = context.resolve("com.example.notes.MainScreen").unwrap();
        assert_eq!(class.name(), "com.example.notes.MainScreen");
        assert_eq!(class.capability(), Some(Capability::Screen));
        assert!(context.resolve("com.example.notes.Missing").is_none());
    }

    #[test]
    fn test_falls_back_to_host_resolver() {
        let manifest = BundleManifest::new("com.example.notes", "1.0.0");
        let host = StaticResolver::new("host")
            .with_component(Arc::new(DeclaredComponent::new("host.About", Some(Capability::Screen))));
        let context = build_context(manifest, host);

        let class = context.resolve("host.About").unwrap();
        assert_eq!(class.name(), "host.About");
    }

    #[test]
    fn test_bundle_component_shadows_host() {
        let manifest =
            BundleManifest::new("com.example.notes", "1.0.0").with_component("shared.Screen", "screen");
        let host = StaticResolver::new("host").with_component(Arc::new(DeclaredComponent::new(
            "shared.Screen",
            Some(Capability::PanelHost),
        )));
        let context = build_context(manifest, host);

        // The bundle's declaration wins over the host's.
        let class = context.resolve("shared.Screen").unwrap();
        assert_eq!(class.capability(), Some(Capability::Screen));
    }

    #[test]
    fn test_staging_dir_created_per_identity() {
        let manifest = BundleManifest::new("com.example.notes", "1.0.0");
        let path = write_bundle(manifest);
        let info = inspect(&path).unwrap();
        let staging_root = temp_dir("gantry-staging");

        let context = CodeContext::build(
            &info,
            &ManifestCodeLoader,
            Arc::new(StaticResolver::new("host")),
            &staging_root,
        )
        .unwrap();

        assert_eq!(context.staging_dir(), staging_root.join("com.example.notes"));
        assert!(context.staging_dir().is_dir());
        assert_eq!(context.bundle_path(), path);
    }
}
