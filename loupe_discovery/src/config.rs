// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use loupe_overlay::{ConfigError, LightboxConfig};

/// Selector matching the containers diagrams are rendered into.
pub const DEFAULT_SELECTOR: &str = ".docusaurus-mermaid-container";

/// Caption shown above each inline diagram.
pub const DEFAULT_HINT: &str = "Click to open this diagram. Use your mouse to zoom and pan.";

/// Settings for a [`PageSession`](crate::PageSession).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiscoveryConfig {
    /// Selector for diagram containers.
    pub selector: String,
    /// Caption inserted once into each container, or `None` for no caption.
    pub hint: Option<String>,
    /// Whether wired containers are decorated at all (height cap and hint).
    pub decorate: bool,
    /// Settings for the lightbox itself.
    pub lightbox: LightboxConfig,
}

/// Error returned by [`DiscoveryConfig::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DiscoveryConfigError {
    /// The container selector is empty.
    #[error("container selector must not be empty")]
    EmptySelector,
    /// The lightbox settings are invalid.
    #[error(transparent)]
    Lightbox(#[from] ConfigError),
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            selector: String::from(DEFAULT_SELECTOR),
            hint: Some(String::from(DEFAULT_HINT)),
            decorate: true,
            lightbox: LightboxConfig::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Sets the container selector.
    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    /// Sets or removes the hint caption.
    #[must_use]
    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    /// Enables or disables container decoration.
    #[must_use]
    pub fn with_decorate(mut self, decorate: bool) -> Self {
        self.decorate = decorate;
        self
    }

    /// Replaces the lightbox settings.
    #[must_use]
    pub fn with_lightbox(mut self, lightbox: LightboxConfig) -> Self {
        self.lightbox = lightbox;
        self
    }

    /// Checks the selector and the lightbox settings.
    pub fn validate(&self) -> Result<(), DiscoveryConfigError> {
        if self.selector.trim().is_empty() {
            return Err(DiscoveryConfigError::EmptySelector);
        }
        self.lightbox.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_rendered_diagrams() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.selector, DEFAULT_SELECTOR);
        assert_eq!(config.hint.as_deref(), Some(DEFAULT_HINT));
        assert!(config.decorate);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_selector_and_bad_lightbox() {
        let config = DiscoveryConfig::default().with_selector("  ");
        assert_eq!(config.validate(), Err(DiscoveryConfigError::EmptySelector));

        let config =
            DiscoveryConfig::default().with_lightbox(LightboxConfig::default().with_zoom_step(0.5));
        assert_eq!(
            config.validate(),
            Err(DiscoveryConfigError::Lightbox(ConfigError::ZoomStep(0.5)))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_keeps_defaults() {
        let config: DiscoveryConfig =
            serde_json::from_str(r#"{ "selector": ".diagram", "hint": null }"#).unwrap();
        assert_eq!(config.selector, ".diagram");
        assert_eq!(config.hint, None);
        assert!(config.decorate);
        assert_eq!(config.lightbox, LightboxConfig::default());
    }
}
