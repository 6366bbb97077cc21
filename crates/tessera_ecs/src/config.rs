//! # ECS Configuration
//!
//! Capacities are fixed for the lifetime of a [`Controller`](crate::Controller).
//! They default to [`MAX_ENTITY_COUNT`] and [`MAX_COMPONENT_COUNT`] and may be
//! lowered (never raised past the signature width) from a TOML file:
//!
//! ```toml
//! max_entities = 5000
//! max_components = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EcsError, EcsResult};

/// Default maximum number of live entities.
pub const MAX_ENTITY_COUNT: usize = 100_000;

/// Maximum number of component types, and the width of every [`Signature`](crate::Signature).
pub const MAX_COMPONENT_COUNT: usize = 1024;

/// Capacity limits for one ECS instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EcsConfig {
    /// Maximum number of simultaneously live entities.
    pub max_entities: usize,
    /// Maximum number of registered component types.
    pub max_components: usize,
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            max_entities: MAX_ENTITY_COUNT,
            max_components: MAX_COMPONENT_COUNT,
        }
    }
}

impl EcsConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the text is not valid TOML,
    /// contains unknown keys, or fails [`EcsConfig::validate`].
    pub fn from_toml_str(text: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the file cannot be read or
    /// its content is rejected by [`EcsConfig::from_toml_str`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> EcsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EcsError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks the limits against what the core can represent.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if either limit is zero, if
    /// `max_entities` does not fit an entity id, or if `max_components`
    /// exceeds [`MAX_COMPONENT_COUNT`].
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_entities == 0 {
            return Err(EcsError::InvalidConfig(
                "max_entities must be greater than zero".into(),
            ));
        }
        if self.max_entities >= u32::MAX as usize {
            return Err(EcsError::InvalidConfig(format!(
                "max_entities must be below {}",
                u32::MAX
            )));
        }
        if self.max_components == 0 || self.max_components > MAX_COMPONENT_COUNT {
            return Err(EcsError::InvalidConfig(format!(
                "max_components must be in 1..={MAX_COMPONENT_COUNT}, got {}",
                self.max_components
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EcsConfig::default();
        assert_eq!(config.max_entities, MAX_ENTITY_COUNT);
        assert_eq!(config.max_components, MAX_COMPONENT_COUNT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EcsConfig::from_toml_str("max_entities = 32").unwrap();
        assert_eq!(config.max_entities, 32);
        assert_eq!(config.max_components, MAX_COMPONENT_COUNT);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EcsConfig::from_toml_str("max_entities = 0"),
            Err(EcsError::InvalidConfig(_))
        ));
        assert!(matches!(
            EcsConfig::from_toml_str("max_components = 2048"),
            Err(EcsError::InvalidConfig(_))
        ));
        assert!(matches!(
            EcsConfig::from_toml_str("max_enemies = 3"),
            Err(EcsError::InvalidConfig(_))
        ));
    }
}
