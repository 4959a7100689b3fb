//! Bundle manifest schema.
//!
//! Identity metadata and component declarations packaged inside a bundle.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Host-recognized base capabilities a bundle component may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Plain screen component
    Screen,
    /// Screen component that hosts embedded panels
    PanelHost,
}

impl Capability {
    /// Parse a manifest capability tag. Unrecognized tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "screen" => Some(Capability::Screen),
            "panel-host" => Some(Capability::PanelHost),
            _ => None,
        }
    }

    /// The manifest tag for this capability.
    pub fn tag(&self) -> &'static str {
        match self {
            Capability::Screen => "screen",
            Capability::PanelHost => "panel-host",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A component declared by a bundle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentDecl {
    /// Component name, fully qualified or relative with a leading `.`
    pub name: String,
    /// Declared capability tag (e.g. "screen", "panel-host")
    pub capability: String,
}

/// Manifest describing a bundle's identity and contents.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Bundle identity, stable across loads (e.g. "com.example.notes")
    pub package: String,
    /// Bundle version
    pub version: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Explicit default entry component
    #[serde(default)]
    pub default_component: Option<String>,
    /// Declared components
    #[serde(default)]
    pub components: Vec<ComponentDecl>,
}

impl BundleManifest {
    /// Create a new manifest.
    pub fn new(package: &str, version: &str) -> Self {
        Self {
            package: package.to_string(),
            version: version.to_string(),
            description: String::new(),
            default_component: None,
            components: Vec::new(),
        }
    }

    /// Set description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Declare a component.
    pub fn with_component(mut self, name: &str, capability: &str) -> Self {
        self.components.push(ComponentDecl {
            name: name.to_string(),
            capability: capability.to_string(),
        });
        self
    }

    /// Set the explicit default entry component.
    pub fn with_default_component(mut self, name: &str) -> Self {
        self.default_component = Some(name.to_string());
        self
    }

    /// The default entry component: the explicit field when set, otherwise
    /// the first declared component.
    pub fn default_entry(&self) -> Option<&str> {
        self.default_component
            .as_deref()
            .or_else(|| self.components.first().map(|c| c.name.as_str()))
    }

    /// Qualify a possibly-relative component name against the bundle identity.
    ///
    /// A name with a leading `.` is namespace-relative: `.MainScreen` inside
    /// `com.example.notes` becomes `com.example.notes.MainScreen`.
    pub fn qualify(&self, name: &str) -> String {
        if name.starts_with('.') {
            format!("{}{}", self.package, name)
        } else {
            name.to_string()
        }
    }

    /// Validate structural requirements.
    pub fn validate(&self) -> Result<()> {
        if self.package.is_empty() {
            return Err(Error::ManifestInvalid("empty package identity".to_string()));
        }
        if let Some(decl) = self.components.iter().find(|c| c.name.is_empty()) {
            return Err(Error::ManifestInvalid(format!(
                "component with empty name (capability {:?})",
                decl.capability
            )));
        }
        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_manifest() -> BundleManifest {
        BundleManifest::new("com.example.notes", "1.2.0")
            .with_description("Note-taking plugin")
            .with_component(".MainScreen", "screen")
            .with_component(".BrowserScreen", "panel-host")
    }

    #[test]
    fn test_capability_parse() {
        assert_eq!(Capability::parse("screen"), Some(Capability::Screen));
        assert_eq!(Capability::parse("panel-host"), Some(Capability::PanelHost));
        assert_eq!(Capability::parse("widget"), None);
        assert_eq!(Capability::parse(""), None);
    }

    #[test]
    fn test_capability_tag_roundtrip() {
        for cap in [Capability::Screen, Capability::PanelHost] {
            assert_eq!(Capability::parse(cap.tag()), Some(cap));
        }
    }

    #[test]
    fn test_default_entry_prefers_explicit() {
        let manifest = sample_manifest().with_default_component(".BrowserScreen");
        assert_eq!(manifest.default_entry(), Some(".BrowserScreen"));
    }

    #[test]
    fn test_default_entry_falls_back_to_first_component() {
        let manifest = sample_manifest();
        assert_eq!(manifest.default_entry(), Some(".MainScreen"));
    }

    #[test]
    fn test_default_entry_absent() {
        let manifest = BundleManifest::new("com.example.empty", "0.1.0");
        assert_eq!(manifest.default_entry(), None);
    }

    #[test]
    fn test_qualify_relative_name() {
        let manifest = sample_manifest();
        assert_eq!(
            manifest.qualify(".MainScreen"),
            "com.example.notes.MainScreen"
        );
    }

    #[test]
    fn test_qualify_absolute_name_unchanged() {
        let manifest = sample_manifest();
        assert_eq!(manifest.qualify("host.Settings"), "host.Settings");
    }

    #[test]
    fn test_validate_rejects_empty_package() {
        let manifest = BundleManifest::new("", "1.0.0");
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_component_name() {
        let manifest = BundleManifest::new("com.example.x", "1.0.0").with_component("", "screen");
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let manifest = sample_manifest();
        let json = manifest.to_json().unwrap();
        let parsed = BundleManifest::from_json(&json).unwrap();
        assert_eq!(parsed.package, manifest.package);
        assert_eq!(parsed.components.len(), 2);
        assert_eq!(parsed.default_entry(), Some(".MainScreen"));
    }
}
