//! Dispatch outcomes and proxy selection types.
//!
//! The closed set of dispatch results and the host proxy table.

use crate::bundle::manifest::Capability;
use crate::dispatch::request::CorrelationToken;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A host proxy component registered for one capability.
///
/// Proxies are host-defined components that forward lifecycle events to
/// the bundle component they wrap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyComponent {
    /// Fully-qualified host component name
    pub name: String,
    /// Capability this proxy forwards for
    pub capability: Capability,
}

impl ProxyComponent {
    /// Create a proxy descriptor.
    pub fn new(name: &str, capability: Capability) -> Self {
        Self {
            name: name.to_string(),
            capability,
        }
    }
}

/// Fixed table of host proxies, one per recognized capability.
#[derive(Clone, Debug)]
pub struct ProxyTable {
    screen: ProxyComponent,
    panel_host: ProxyComponent,
}

impl ProxyTable {
    /// Create the table from the host's proxy component names.
    pub fn new(screen_proxy: &str, panel_host_proxy: &str) -> Self {
        Self {
            screen: ProxyComponent::new(screen_proxy, Capability::Screen),
            panel_host: ProxyComponent::new(panel_host_proxy, Capability::PanelHost),
        }
    }

    /// The proxy registered for a capability.
    pub fn proxy_for(&self, capability: Capability) -> &ProxyComponent {
        match capability {
            Capability::Screen => &self.screen,
            Capability::PanelHost => &self.panel_host,
        }
    }
}

/// The retargeted launch payload handed to the launch gateway.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProxyLaunch {
    /// Selected host proxy
    pub proxy: ProxyComponent,
    /// Fully-qualified bundle component the proxy will wrap
    pub component: String,
    /// Bundle identity
    pub bundle: String,
    /// Forwarded caller parameters
    pub parameters: HashMap<String, serde_json::Value>,
    /// Correlation token when the launch is result-correlated
    pub correlation: Option<CorrelationToken>,
}

/// Outcome of a component dispatch.
///
/// A closed set: every dispatch terminates in exactly one of these.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// Component resolved and handed to the launch gateway
    Success(ProxyLaunch),
    /// Bundle identity was never loaded
    NoPackage,
    /// Component not found in the bundle's code context
    NoClass,
    /// Component declares no recognized capability
    TypeError,
}

impl DispatchOutcome {
    /// Whether the dispatch succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_table_selection() {
        let table = ProxyTable::new("host.ProxyScreen", "host.ProxyPanelHost");
        assert_eq!(table.proxy_for(Capability::Screen).name, "host.ProxyScreen");
        assert_eq!(
            table.proxy_for(Capability::PanelHost).name,
            "host.ProxyPanelHost"
        );
        assert_eq!(
            table.proxy_for(Capability::Screen).capability,
            Capability::Screen
        );
    }

    #[test]
    fn test_outcome_is_success() {
        assert!(!DispatchOutcome::NoPackage.is_success());
        assert!(!DispatchOutcome::NoClass.is_success());
        assert!(!DispatchOutcome::TypeError.is_success());

        let launch = ProxyLaunch {
            proxy: ProxyComponent::new("host.ProxyScreen", Capability::Screen),
            component: "com.example.notes.MainScreen".to_string(),
            bundle: "com.example.notes".to_string(),
            parameters: HashMap::new(),
            correlation: None,
        };
        assert!(DispatchOutcome::Success(launch).is_success());
    }
}
