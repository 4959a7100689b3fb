//! Context Module
//!
//! Per-bundle isolated contexts:
//! - Code context: component resolution with host fallback and a private
//!   staging area
//! - Resource context: packaged assets composed with host display state

pub mod code;
pub mod resources;

pub use code::{CodeContext, ComponentClass, ComponentResolver};
pub use resources::{DisplayMetrics, HostConfiguration, ResourceContext, Theme};
