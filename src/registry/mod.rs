//! Registry Module
//!
//! Identity-keyed plugin package cache:
//! - One immutable package per bundle identity
//! - First-loaded-wins caching for the process lifetime
//! - Serialized entry creation under concurrent loads

pub mod package;
pub mod registry;

pub use package::PluginPackage;
pub use registry::PluginRegistry;
