//! Configuration loading from the process environment.
//!
//! # Responsibilities
//! - Read the service settings under the `STEWARD_` prefix
//! - Substitute the default port when none is configured
//! - Reject values that cannot be interpreted at all
//!
//! # Design Decisions
//! - The lookup is injectable so unit tests never mutate process environment
//! - The port is kept as a string and not validated here; a bad port surfaces
//!   as a bind error when the listener starts
//! - `STEWARD_WAIT` is a whole number of seconds

use std::time::Duration;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// Port used when [`PORT_KEY`] is unset or empty.
pub const DEFAULT_PORT: &str = "8080";

/// Environment key for the listen port.
pub const PORT_KEY: &str = "STEWARD_PORT";

/// Environment key for the shutdown drain deadline, in seconds.
pub const WAIT_KEY: &str = "STEWARD_WAIT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The shutdown wait was present but not an unsigned integer.
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidWait {
        /// Environment key that held the bad value.
        key: &'static str,
        /// The rejected raw value.
        value: String,
    },
}

impl ServerConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `from_env` passes `std::env::var`; tests pass closures over fixed maps.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_KEY).filter(|value| !value.is_empty()) {
            Some(port) => port,
            None => {
                tracing::info!(default_port = DEFAULT_PORT, "port not set, using default");
                DEFAULT_PORT.to_string()
            }
        };

        let shutdown_wait = match lookup(WAIT_KEY).filter(|value| !value.is_empty()) {
            None => Duration::ZERO,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidWait {
                    key: WAIT_KEY,
                    value: raw,
                })?,
        };

        Ok(Self {
            bind_address: format!("0.0.0.0:{port}"),
            shutdown_wait,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts events carrying the `default_port` field, i.e. the port
    /// substitution notice.
    struct SubstitutionCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for SubstitutionCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct SeesDefaultPort(bool);

            impl tracing::field::Visit for SeesDefaultPort {
                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    _value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "default_port" {
                        self.0 = true;
                    }
                }
            }

            let mut visitor = SeesDefaultPort(false);
            event.record(&mut visitor);
            if visitor.0 {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Run `from_lookup` under a capturing subscriber and return how many
    /// substitution notices it emitted.
    fn substitution_events<F>(lookup: F) -> usize
    where
        F: Fn(&str) -> Option<String>,
    {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber =
            tracing_subscriber::registry().with(SubstitutionCounter(Arc::clone(&count)));
        tracing::subscriber::with_default(subscriber, || {
            ServerConfig::from_lookup(lookup).unwrap();
        });
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn unset_port_falls_back_to_default() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.shutdown_wait, Duration::ZERO);
    }

    #[test]
    fn empty_port_is_treated_as_unset() {
        let config = ServerConfig::from_lookup(|key| match key {
            PORT_KEY => Some(String::new()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn configured_port_is_used_verbatim() {
        let config = ServerConfig::from_lookup(|key| match key {
            PORT_KEY => Some("3000".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn wait_is_interpreted_as_seconds() {
        let config = ServerConfig::from_lookup(|key| match key {
            WAIT_KEY => Some("30".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.shutdown_wait, Duration::from_secs(30));
    }

    #[test]
    fn non_integer_wait_is_rejected() {
        let err = ServerConfig::from_lookup(|key| match key {
            WAIT_KEY => Some("15s".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWait { key, .. } if key == WAIT_KEY));
    }

    #[test]
    fn unset_port_logs_the_substitution_exactly_once() {
        assert_eq!(substitution_events(|_| None), 1);
    }

    #[test]
    fn empty_port_logs_the_substitution_exactly_once() {
        let events = substitution_events(|key| match key {
            PORT_KEY => Some(String::new()),
            _ => None,
        });
        assert_eq!(events, 1);
    }

    #[test]
    fn configured_port_logs_no_substitution() {
        let events = substitution_events(|key| match key {
            PORT_KEY => Some("3000".to_string()),
            _ => None,
        });
        assert_eq!(events, 0);
    }

    #[test]
    fn timeouts_keep_their_fixed_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.read_timeout, Duration::from_secs(15));
        assert_eq!(config.write_timeout, Duration::from_secs(15));
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
    }
}
