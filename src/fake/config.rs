//! Fake configuration.
//!
//! [`FakeConfig`] selects which built-in behaviors a new fake starts with and whether it
//! records calls.
//!
//! # Configuration Presets
//!
//! - [`FakeConfig::default()`] - Every built-in behavior on, calls recorded
//! - [`FakeConfig::minimal()`] - Only the default return value rule, calls recorded
//!
//! # Example
//!
//! ```rust
//! use dotfake::fake::FakeConfig;
//!
//! // Use a preset
//! let config = FakeConfig::minimal();
//! assert!(!config.auto_fake_properties);
//!
//! // Or customize
//! let config = FakeConfig {
//!     event_behavior: false,
//!     ..Default::default()
//! };
//! assert!(config.property_behavior);
//! ```

/// Settings for the fakes created by an [`InterfaceCatalog`](crate::fake::InterfaceCatalog).
///
/// Nested fakes created by auto-fake properties and default return values are created
/// by the same catalog and therefore share its configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeConfig {
    /// Populate fakable properties with a nested fake on first read.
    pub auto_fake_properties: bool,

    /// Append every intercepted call to the fake's recorder.
    pub record_calls: bool,

    /// Remember property writes so later reads return the written value.
    pub property_behavior: bool,

    /// Track event subscriptions and fire events for attached raise handlers.
    pub event_behavior: bool,
}

impl Default for FakeConfig {
    fn default() -> Self {
        Self {
            auto_fake_properties: true,
            record_calls: true,
            property_behavior: true,
            event_behavior: true,
        }
    }
}

impl FakeConfig {
    /// Creates a configuration with only the catch-all default rule.
    ///
    /// Calls are still recorded. Properties and events behave like ordinary methods:
    /// reads return defaults, writes and subscriptions are ignored.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            auto_fake_properties: false,
            record_calls: true,
            property_behavior: false,
            event_behavior: false,
        }
    }

    /// Sets whether fakable properties are auto-populated.
    #[must_use]
    pub fn with_auto_fake_properties(mut self, enabled: bool) -> Self {
        self.auto_fake_properties = enabled;
        self
    }

    /// Sets whether calls are recorded.
    #[must_use]
    pub fn with_record_calls(mut self, enabled: bool) -> Self {
        self.record_calls = enabled;
        self
    }

    /// Sets whether property writes are remembered.
    #[must_use]
    pub fn with_property_behavior(mut self, enabled: bool) -> Self {
        self.property_behavior = enabled;
        self
    }

    /// Sets whether events are tracked.
    #[must_use]
    pub fn with_event_behavior(mut self, enabled: bool) -> Self {
        self.event_behavior = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let full = FakeConfig::default();
        assert!(full.auto_fake_properties && full.record_calls);
        assert!(full.property_behavior && full.event_behavior);

        let minimal = FakeConfig::minimal();
        assert!(minimal.record_calls);
        assert!(!minimal.auto_fake_properties);
        assert!(!minimal.property_behavior);
        assert!(!minimal.event_behavior);
    }

    #[test]
    fn test_builder() {
        let config = FakeConfig::minimal()
            .with_event_behavior(true)
            .with_record_calls(false);
        assert!(config.event_behavior);
        assert!(!config.record_calls);
        assert_ne!(config, FakeConfig::minimal());
    }
}
