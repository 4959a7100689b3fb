//! Logging initialization for embedding hosts.
//!
//! The crate emits `tracing` events at load and dispatch decision points;
//! hosts that do not install their own subscriber can call [`init`] once
//! at startup.

use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Install a global formatted `tracing` subscriber at the given level.
///
/// Safe to call more than once; only the first call installs anything.
/// Hosts with their own subscriber should skip this entirely.
pub fn init(level: Level) {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(true)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(Level::DEBUG);
        init(Level::INFO);
    }
}
