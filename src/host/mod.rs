//! Host Module
//!
//! Collaborator seams the embedding host implements, plus provided
//! defaults:
//! - Code loading (bundle-local component resolvers)
//! - Resource state (display metrics, configuration)
//! - Launch hand-off (fire-and-forget or result-correlated)

use crate::bundle::inspector::BundleInfo;
use crate::bundle::manifest::Capability;
use crate::context::code::{ComponentClass, ComponentResolver};
use crate::context::resources::{DisplayMetrics, HostConfiguration};
use crate::core::Result;
use crate::dispatch::outcome::ProxyLaunch;
use crate::dispatch::request::CorrelationToken;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Builds the bundle-local component resolver for an inspected bundle.
///
/// The loader receives the bundle's private staging directory and may
/// materialize derived artifacts there.
pub trait CodeLoader: Send + Sync {
    /// Build a resolver over the bundle's own components.
    fn load(&self, bundle: &BundleInfo, staging_dir: &Path) -> Result<Arc<dyn ComponentResolver>>;
}

/// Supplies the host's current display and configuration state.
pub trait ResourceHost: Send + Sync {
    /// Current display metrics.
    fn display_metrics(&self) -> DisplayMetrics;

    /// Current configuration.
    fn configuration(&self) -> HostConfiguration;
}

/// Issues proxy launches on behalf of a caller.
///
/// The hand-off is asynchronous from the dispatcher's point of view: both
/// methods return immediately and the launched component completes later,
/// out of band.
pub trait LaunchGateway: Send + Sync {
    /// Fire-and-forget launch.
    fn launch(&self, launch: ProxyLaunch);

    /// Result-correlated launch. Only reached when
    /// [`correlates_results`](LaunchGateway::correlates_results) is true.
    fn launch_for_result(&self, launch: ProxyLaunch, token: CorrelationToken);

    /// Whether this caller can deliver correlated results.
    fn correlates_results(&self) -> bool;
}

/// Aggregated host environment handed to the registry.
pub struct HostEnvironment {
    code_loader: Arc<dyn CodeLoader>,
    host_resolver: Arc<dyn ComponentResolver>,
    resource_host: Arc<dyn ResourceHost>,
    staging_root: PathBuf,
}

impl HostEnvironment {
    /// Create an environment with default collaborators.
    ///
    /// Defaults: manifest-backed code loading, an empty host resolver, and
    /// fixed display/configuration state. `staging_root` is where each
    /// bundle gets its private staging directory.
    pub fn new(staging_root: impl Into<PathBuf>) -> Self {
        Self {
            code_loader: Arc::new(ManifestCodeLoader),
            host_resolver: Arc::new(StaticResolver::new("host")),
            resource_host: Arc::new(StaticResourceHost::default()),
            staging_root: staging_root.into(),
        }
    }

    /// Replace the code loader.
    pub fn with_code_loader(mut self, loader: Arc<dyn CodeLoader>) -> Self {
        self.code_loader = loader;
        self
    }

    /// Replace the host's own component resolver (the fallback link).
    pub fn with_host_resolver(mut self, resolver: Arc<dyn ComponentResolver>) -> Self {
        self.host_resolver = resolver;
        self
    }

    /// Replace the resource state collaborator.
    pub fn with_resource_host(mut self, host: Arc<dyn ResourceHost>) -> Self {
        self.resource_host = host;
        self
    }

    /// The code loader collaborator.
    pub fn code_loader(&self) -> &dyn CodeLoader {
        self.code_loader.as_ref()
    }

    /// The host's own component resolver.
    pub fn host_resolver(&self) -> Arc<dyn ComponentResolver> {
        self.host_resolver.clone()
    }

    /// The resource state collaborator.
    pub fn resource_host(&self) -> &dyn ResourceHost {
        self.resource_host.as_ref()
    }

    /// Root directory for per-bundle staging areas.
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }
}

/// Component symbol backed by a declaration.
pub struct DeclaredComponent {
    name: String,
    capability: Option<Capability>,
}

impl DeclaredComponent {
    /// Create a declared component symbol.
    pub fn new(name: &str, capability: Option<Capability>) -> Self {
        Self {
            name: name.to_string(),
            capability,
        }
    }
}

impl ComponentClass for DeclaredComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Option<Capability> {
        self.capability
    }
}

/// Table-backed component resolver.
///
/// Used for host framework components and by the default code loader.
pub struct StaticResolver {
    name: String,
    table: HashMap<String, Arc<dyn ComponentClass>>,
}

impl StaticResolver {
    /// Create an empty resolver.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            table: HashMap::new(),
        }
    }

    /// Register a component under its fully-qualified name.
    pub fn with_component(mut self, class: Arc<dyn ComponentClass>) -> Self {
        self.table.insert(class.name().to_string(), class);
        self
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the resolver has no components.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl ComponentResolver for StaticResolver {
    fn resolve(&self, name: &str) -> Option<Arc<dyn ComponentClass>> {
        self.table.get(name).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Default code loader: materializes the manifest's component declarations.
///
/// Each declaration becomes a [`DeclaredComponent`] registered under its
/// qualified name; unrecognized capability tags carry through as `None`
/// and fail the dispatch capability check.
pub struct ManifestCodeLoader;

impl CodeLoader for ManifestCodeLoader {
    fn load(&self, bundle: &BundleInfo, _staging_dir: &Path) -> Result<Arc<dyn ComponentResolver>> {
        let mut resolver = StaticResolver::new(&bundle.identity);
        for decl in &bundle.manifest.components {
            let fqn = bundle.manifest.qualify(&decl.name);
            resolver = resolver.with_component(Arc::new(DeclaredComponent::new(
                &fqn,
                Capability::parse(&decl.capability),
            )));
        }
        Ok(Arc::new(resolver))
    }
}

/// Fixed resource state collaborator.
#[derive(Clone, Debug, Default)]
pub struct StaticResourceHost {
    metrics: DisplayMetrics,
    configuration: HostConfiguration,
}

impl StaticResourceHost {
    /// Create a collaborator with fixed state.
    pub fn new(metrics: DisplayMetrics, configuration: HostConfiguration) -> Self {
        Self {
            metrics,
            configuration,
        }
    }
}

impl ResourceHost for StaticResourceHost {
    fn display_metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    fn configuration(&self) -> HostConfiguration {
        self.configuration.clone()
    }
}

/// Event emitted by a [`QueuedGateway`].
#[derive(Clone, Debug, PartialEq)]
pub enum GatewayEvent {
    /// Fire-and-forget launch
    Launch(ProxyLaunch),
    /// Result-correlated launch
    LaunchForResult(ProxyLaunch, CorrelationToken),
}

/// Channel-backed launch gateway.
///
/// Posts launches onto an unbounded channel consumed by the host's UI
/// loop and returns immediately.
pub struct QueuedGateway {
    tx: mpsc::UnboundedSender<GatewayEvent>,
    correlates: bool,
}

impl QueuedGateway {
    /// Create a gateway and the receiver the host drains.
    pub fn new(correlates: bool) -> (Self, mpsc::UnboundedReceiver<GatewayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, correlates }, rx)
    }
}

impl LaunchGateway for QueuedGateway {
    fn launch(&self, launch: ProxyLaunch) {
        if self.tx.send(GatewayEvent::Launch(launch)).is_err() {
            warn!("launch gateway receiver dropped; discarding launch");
        }
    }

    fn launch_for_result(&self, launch: ProxyLaunch, token: CorrelationToken) {
        if self
            .tx
            .send(GatewayEvent::LaunchForResult(launch, token))
            .is_err()
        {
            warn!("launch gateway receiver dropped; discarding launch");
        }
    }

    fn correlates_results(&self) -> bool {
        self.correlates
    }
}
