//! Launch request representation.
//!
//! The caller-supplied description of which bundle component to start.

use crate::core::{now, Result, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Token linking a result-correlated launch to its later result delivery.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    /// Create a fresh token.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a caller-supplied token value.
    pub fn from_value(value: &str) -> Self {
        Self(value.to_string())
    }

    /// The token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request to start a component inside a loaded bundle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Unique request identifier
    pub id: String,
    /// Target bundle identity (required)
    pub bundle: String,
    /// Target component name; the bundle's default entry when absent
    pub component: Option<String>,
    /// Caller-supplied launch parameters
    pub parameters: HashMap<String, serde_json::Value>,
    /// Result-correlation token, used only by correlating callers
    pub correlation: Option<CorrelationToken>,
    /// Creation timestamp
    pub created: Timestamp,
}

impl LaunchRequest {
    /// Create a request targeting a bundle's default entry component.
    pub fn new(bundle: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            bundle: bundle.to_string(),
            component: None,
            parameters: HashMap::new(),
            correlation: None,
            created: now(),
        }
    }

    /// Set an explicit target component name.
    pub fn with_component(mut self, name: &str) -> Self {
        self.component = Some(name.to_string());
        self
    }

    /// Add a launch parameter.
    pub fn with_param(mut self, key: &str, value: serde_json::Value) -> Self {
        self.parameters.insert(key.to_string(), value);
        self
    }

    /// Attach a result-correlation token.
    pub fn with_correlation(mut self, token: CorrelationToken) -> Self {
        self.correlation = Some(token);
        self
    }

    /// Get a parameter value.
    pub fn get_param<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.parameters
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from binary.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
