//! Plugin registry.
//!
//! Identity-keyed cache of loaded plugin packages.

use crate::bundle::inspector::inspect;
use crate::context::code::CodeContext;
use crate::context::resources::ResourceContext;
use crate::core::Result;
use crate::host::HostEnvironment;
use crate::registry::package::PluginPackage;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Identity-keyed cache of loaded plugin packages.
///
/// Constructed once by the host and shared (`Arc`) with every caller.
/// Entries live until the registry is dropped; there is no eviction,
/// unloading, or hot-swap.
pub struct PluginRegistry {
    host: HostEnvironment,
    packages: RwLock<HashMap<String, Arc<PluginPackage>>>,
}

impl PluginRegistry {
    /// Create an empty registry over a host environment.
    pub fn new(host: HostEnvironment) -> Self {
        Self {
            host,
            packages: RwLock::new(HashMap::new()),
        }
    }

    /// Load a bundle file, or return the cached package for its identity.
    ///
    /// Inspection runs first; an invalid or missing bundle is an error and
    /// nothing is cached. If the identity is already cached the existing
    /// package is returned unchanged and the new path is ignored
    /// (first-loaded-wins). Otherwise both contexts are built and the entry
    /// inserted; a context-builder failure abandons the entry.
    ///
    /// Entry creation happens under the registry's write lock, so at most
    /// one builder executes per identity and concurrent loaders observe the
    /// same package. Loading performs blocking file I/O on the calling
    /// thread; avoid calling it from a latency-sensitive UI thread.
    pub fn load_bundle(&self, path: impl AsRef<Path>) -> Result<Arc<PluginPackage>> {
        let path = path.as_ref();
        let info = inspect(path)?;

        let mut packages = self.packages.write().expect("plugin registry lock poisoned");
        if let Some(existing) = packages.get(&info.identity) {
            if existing.source_path() != path {
                warn!(
                    identity = %info.identity,
                    cached = %existing.source_path().display(),
                    requested = %path.display(),
                    "identity already loaded from a different path; keeping first-loaded entry"
                );
            }
            return Ok(existing.clone());
        }

        debug!(identity = %info.identity, path = %path.display(), "loading bundle");
        let code = CodeContext::build(
            &info,
            self.host.code_loader(),
            self.host.host_resolver(),
            self.host.staging_root(),
        )?;
        let resources = ResourceContext::build(path, self.host.resource_host())?;
        let package = Arc::new(PluginPackage::new(info, code, resources));
        packages.insert(package.identity().to_string(), package.clone());
        info!(identity = %package.identity(), "bundle loaded");
        Ok(package)
    }

    /// Look up a cached package by identity. Pure lookup, no side effects.
    pub fn package(&self, identity: &str) -> Option<Arc<PluginPackage>> {
        self.packages
            .read()
            .expect("plugin registry lock poisoned")
            .get(identity)
            .cloned()
    }

    /// Whether an identity is cached.
    pub fn contains(&self, identity: &str) -> bool {
        self.packages
            .read()
            .expect("plugin registry lock poisoned")
            .contains_key(identity)
    }

    /// Number of cached packages.
    pub fn package_count(&self) -> usize {
        self.packages
            .read()
            .expect("plugin registry lock poisoned")
            .len()
    }

    /// Identities of all cached packages.
    pub fn identities(&self) -> Vec<String> {
        self.packages
            .read()
            .expect("plugin registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("packages", &self.package_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::archive::BundleWriter;
    use crate::bundle::inspector::BundleInfo;
    use crate::bundle::manifest::BundleManifest;
    use crate::context::code::ComponentResolver;
    use crate::core::Error;
    use crate::host::{CodeLoader, ManifestCodeLoader};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_dir(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()))
    }

    fn write_bundle(identity: &str, version: &str) -> PathBuf {
        let path = temp_dir("gantry-reg").with_extension("bundle");
        let manifest =
            BundleManifest::new(identity, version).with_component(".MainScreen", "screen");
        BundleWriter::new(manifest)
            .with_asset("strings/en.json", br#"{"title":"Test"}"#)
            .write_to(&path)
            .unwrap();
        path
    }

    fn test_registry() -> PluginRegistry {
        PluginRegistry::new(HostEnvironment::new(temp_dir("gantry-staging")))
    }

    #[test]
    fn test_load_caches_by_identity() {
        let registry = test_registry();
        let path = write_bundle("com.example.notes", "1.0.0");

        let first = registry.load_bundle(&path).unwrap();
        let second = registry.load_bundle(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.package_count(), 1);
        assert_eq!(first.identity(), "com.example.notes");
        assert_eq!(first.default_entry(), Some(".MainScreen"));
    }

    #[test]
    fn test_first_loaded_wins_across_paths() {
        let registry = test_registry();
        let path_a = write_bundle("com.example.notes", "1.0.0");
        let path_b = write_bundle("com.example.notes", "2.0.0");

        let first = registry.load_bundle(&path_a).unwrap();
        let second = registry.load_bundle(&path_b).unwrap();

        // The second path is ignored; the cached entry survives unchanged.
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.source_path(), path_a);
        assert_eq!(second.manifest().version, "1.0.0");
        assert_eq!(registry.package_count(), 1);
    }

    #[test]
    fn test_load_missing_bundle() {
        let registry = test_registry();
        let result = registry.load_bundle(temp_dir("gantry-missing").with_extension("bundle"));
        assert!(matches!(result, Err(Error::BundleNotFound(_))));
        assert_eq!(registry.package_count(), 0);
    }

    #[test]
    fn test_failed_build_caches_nothing() {
        let registry = test_registry();
        let path = temp_dir("gantry-reg").with_extension("bundle");
        let mut bytes = BundleWriter::new(
            BundleManifest::new("com.example.broken", "1.0.0").with_component(".Main", "screen"),
        )
        .with_asset("data.bin", &[3u8; 64])
        .to_bytes()
        .unwrap();
        let mid = bytes.len() - 40;
        bytes[mid] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        // Inspection passes (header intact) but the resource build fails.
        assert!(registry.load_bundle(&path).is_err());
        assert_eq!(registry.package_count(), 0);
        assert!(registry.package("com.example.broken").is_none());
    }

    #[test]
    fn test_package_lookup() {
        let registry = test_registry();
        let path = write_bundle("com.example.notes", "1.0.0");
        registry.load_bundle(&path).unwrap();

        assert!(registry.package("com.example.notes").is_some());
        assert!(registry.package("com.example.other").is_none());
        assert!(registry.contains("com.example.notes"));
        assert_eq!(registry.identities(), vec!["com.example.notes".to_string()]);
    }

    /// Code loader that counts builder executions.
    struct CountingLoader {
        inner: ManifestCodeLoader,
        builds: AtomicUsize,
    }

    impl CodeLoader for CountingLoader {
        fn load(
            &self,
            bundle: &BundleInfo,
            staging_dir: &std::path::Path,
        ) -> Result<Arc<dyn ComponentResolver>> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            self.inner.load(bundle, staging_dir)
        }
    }

    #[test]
    fn test_concurrent_loads_build_once() {
        let loader = Arc::new(CountingLoader {
            inner: ManifestCodeLoader,
            builds: AtomicUsize::new(0),
        });
        let host =
            HostEnvironment::new(temp_dir("gantry-staging")).with_code_loader(loader.clone());
        let registry = Arc::new(PluginRegistry::new(host));
        let path = write_bundle("com.example.notes", "1.0.0");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let path = path.clone();
                std::thread::spawn(move || registry.load_bundle(&path).unwrap())
            })
            .collect();

        let packages: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for package in &packages[1..] {
            assert!(Arc::ptr_eq(&packages[0], package));
        }
        assert_eq!(registry.package_count(), 1);
        assert_eq!(loader.builds.load(Ordering::SeqCst), 1);
    }
}
