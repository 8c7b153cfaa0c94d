//! Realtime relay configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Upper bound on per-connection queued events.
pub const MAX_OUTBOUND_BUFFER: usize = 4096;

/// Relay tuning and collaborator credentials
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Events queued per connection before new ones are dropped
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,

    /// Bearer token the persistence collaborator presents on the delivery hook
    #[serde(default)]
    pub delivery_token: Option<String>,
}

impl RealtimeConfig {
    /// Validate realtime configuration
    ///
    /// Production deployments must protect the delivery hook.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.outbound_buffer == 0 || self.outbound_buffer > MAX_OUTBOUND_BUFFER {
            return Err(ValidationError::InvalidOutboundBuffer {
                got: self.outbound_buffer,
                max: MAX_OUTBOUND_BUFFER,
            });
        }

        let has_token = self
            .delivery_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if *environment == Environment::Production && !has_token {
            return Err(ValidationError::MissingRequired("realtime.delivery_token"));
        }

        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: default_outbound_buffer(),
            delivery_token: None,
        }
    }
}

fn default_outbound_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_defaults() {
        let config = RealtimeConfig::default();
        assert_eq!(config.outbound_buffer, 64);
        assert!(config.delivery_token.is_none());
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_outbound_buffer_bounds() {
        for bad in [0, MAX_OUTBOUND_BUFFER + 1] {
            let config = RealtimeConfig {
                outbound_buffer: bad,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(&Environment::Development),
                Err(ValidationError::InvalidOutboundBuffer { .. })
            ));
        }

        let config = RealtimeConfig {
            outbound_buffer: MAX_OUTBOUND_BUFFER,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_production_requires_delivery_token() {
        let config = RealtimeConfig::default();
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::MissingRequired("realtime.delivery_token"))
        );

        let blank = RealtimeConfig {
            delivery_token: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate(&Environment::Production).is_err());

        let config = RealtimeConfig {
            delivery_token: Some("s3cret".to_string()),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }
}
