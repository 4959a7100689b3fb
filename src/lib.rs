//! # Gantry - Runtime Plugin Bundle Loading
//!
//! A registry and dispatch core for hosts that load self-contained plugin
//! bundles at runtime:
//! - **Bundles**: single-file containers of component declarations + assets
//! - **Registry**: one immutable, cached package per bundle identity
//! - **Dispatch**: launch requests resolved to capability-matched host proxies
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gantry::dispatch::{Dispatcher, LaunchRequest, ProxyTable};
//! use gantry::host::{HostEnvironment, QueuedGateway};
//! use gantry::registry::PluginRegistry;
//!
//! fn main() -> gantry::Result<()> {
//!     let host = HostEnvironment::new("/tmp/gantry/staging");
//!     let registry = Arc::new(PluginRegistry::new(host));
//!     registry.load_bundle("plugins/notes.bundle")?;
//!
//!     let proxies = ProxyTable::new("host.ProxyScreen", "host.ProxyPanelHost");
//!     let dispatcher = Dispatcher::new(registry, proxies);
//!     let (gateway, _events) = QueuedGateway::new(true);
//!     let outcome = dispatcher.start_component(&gateway, LaunchRequest::new("com.example.notes"));
//!     println!("dispatched: {:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod bundle;
pub mod context;
pub mod core;
pub mod dispatch;
pub mod host;
pub mod registry;
pub mod telemetry;

pub use crate::core::error::{Error, Result};
