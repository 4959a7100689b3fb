//! Dispatch resolver.
//!
//! Resolves launch requests against the registry and hands them to a
//! capability-matched host proxy.

use crate::dispatch::outcome::{DispatchOutcome, ProxyLaunch, ProxyTable};
use crate::dispatch::request::LaunchRequest;
use crate::host::LaunchGateway;
use crate::registry::registry::PluginRegistry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Dispatch counters snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchMetrics {
    pub total: u64,
    pub succeeded: u64,
    pub no_package: u64,
    pub no_class: u64,
    pub type_error: u64,
}

#[derive(Default)]
struct Counters {
    total: AtomicU64,
    succeeded: AtomicU64,
    no_package: AtomicU64,
    no_class: AtomicU64,
    type_error: AtomicU64,
}

/// Resolves launch requests to capability-matched proxy launches.
pub struct Dispatcher {
    registry: Arc<PluginRegistry>,
    proxies: ProxyTable,
    counters: Counters,
}

impl Dispatcher {
    /// Create a dispatcher over a shared registry and the host proxy table.
    pub fn new(registry: Arc<PluginRegistry>, proxies: ProxyTable) -> Self {
        Self {
            registry,
            proxies,
            counters: Counters::default(),
        }
    }

    /// Start a component inside a loaded bundle.
    ///
    /// Resolution order: registry lookup by the request's bundle identity,
    /// component-name defaulting and qualification, code-context symbol
    /// resolution, capability check, proxy selection, then hand-off through
    /// the caller's gateway. The hand-off is result-correlated when the
    /// caller correlates results and the request carries a token, otherwise
    /// fire-and-forget. The dispatcher never waits for the launched
    /// component.
    ///
    /// # Panics
    ///
    /// Panics if the request's bundle identity is empty. A request without
    /// an identity is a caller bug, not a runtime condition.
    pub fn start_component(
        &self,
        caller: &dyn LaunchGateway,
        request: LaunchRequest,
    ) -> DispatchOutcome {
        assert!(
            !request.bundle.is_empty(),
            "launch request carries no bundle identity"
        );
        self.counters.total.fetch_add(1, Ordering::Relaxed);

        let Some(package) = self.registry.package(&request.bundle) else {
            debug!(bundle = %request.bundle, "dispatch failed: bundle not loaded");
            self.counters.no_package.fetch_add(1, Ordering::Relaxed);
            return DispatchOutcome::NoPackage;
        };

        let Some(name) = request
            .component
            .clone()
            .or_else(|| package.default_entry().map(str::to_string))
        else {
            debug!(bundle = %request.bundle, "dispatch failed: no component name and no default entry");
            self.counters.no_class.fetch_add(1, Ordering::Relaxed);
            return DispatchOutcome::NoClass;
        };
        let component = package.manifest().qualify(&name);

        let Some(class) = package.code().resolve(&component) else {
            debug!(bundle = %request.bundle, %component, "dispatch failed: component not resolved");
            self.counters.no_class.fetch_add(1, Ordering::Relaxed);
            return DispatchOutcome::NoClass;
        };

        let Some(capability) = class.capability() else {
            debug!(bundle = %request.bundle, %component, "dispatch failed: no recognized capability");
            self.counters.type_error.fetch_add(1, Ordering::Relaxed);
            return DispatchOutcome::TypeError;
        };

        let proxy = self.proxies.proxy_for(capability).clone();
        let correlated = caller.correlates_results() && request.correlation.is_some();
        let launch = ProxyLaunch {
            proxy,
            component: component.clone(),
            bundle: request.bundle.clone(),
            parameters: request.parameters.clone(),
            correlation: if correlated {
                request.correlation.clone()
            } else {
                None
            },
        };

        debug!(
            bundle = %request.bundle,
            %component,
            proxy = %launch.proxy.name,
            correlated,
            "dispatching component"
        );
        match request.correlation {
            Some(token) if correlated => caller.launch_for_result(launch.clone(), token),
            _ => caller.launch(launch.clone()),
        }

        self.counters.succeeded.fetch_add(1, Ordering::Relaxed);
        DispatchOutcome::Success(launch)
    }

    /// Snapshot the dispatch counters.
    pub fn metrics(&self) -> DispatchMetrics {
        DispatchMetrics {
            total: self.counters.total.load(Ordering::Relaxed),
            succeeded: self.counters.succeeded.load(Ordering::Relaxed),
            no_package: self.counters.no_package.load(Ordering::Relaxed),
            no_class: self.counters.no_class.load(Ordering::Relaxed),
            type_error: self.counters.type_error.load(Ordering::Relaxed),
        }
    }

    /// The registry this dispatcher resolves against.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }
}
