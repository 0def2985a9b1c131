use crate::core::{Result, TrackError};

/// Collection tracking configuration
///
/// Controls how trackable collections treat the elements they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingConfig {
    /// Trackers created for collection elements start enabled
    pub enable_element_trackers: bool,

    /// Index reads and iteration register elements, not only insertion
    pub register_on_read: bool,
}

impl TrackingConfig {
    /// Create a configuration with the default element policy
    pub const fn new() -> Self {
        Self {
            enable_element_trackers: true,
            register_on_read: true,
        }
    }

    /// Set whether element trackers start enabled
    pub const fn enable_element_trackers(mut self, enabled: bool) -> Self {
        self.enable_element_trackers = enabled;
        self
    }

    /// Set whether reads register elements
    pub const fn register_on_read(mut self, enabled: bool) -> Self {
        self.register_on_read = enabled;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.register_on_read && !self.enable_element_trackers {
            return Err(TrackError::InvalidConfig(
                "register_on_read requires enable_element_trackers".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrackingConfig::default();
        assert!(config.enable_element_trackers);
        assert!(config.register_on_read);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_read_registration_needs_enabled_trackers() {
        let config = TrackingConfig::new().enable_element_trackers(false);
        assert!(matches!(
            config.validate(),
            Err(TrackError::InvalidConfig(_))
        ));

        let config = config.register_on_read(false);
        assert!(config.validate().is_ok());
    }
}
