//! Server configuration for domain settings.
//!
//! Listener addresses and the database URL come from the command line (with env
//! fallbacks). Everything else is read here:
//!
//! ```bash
//! PUMAPAL_EMAIL_DOMAIN=valenciacollege.edu   # accepts user@<domain> and user@mail.<domain>
//! PUMAPAL_SWEEP_INTERVAL_SECS=300            # expired-group sweep period, 0 disables the loop
//! PUMAPAL_LOG_JSON=true                      # JSON log lines instead of human-readable ones
//! ```

use std::env;
use std::time::Duration;

use pumapal_storage::{EmailPolicy, ValidationError, DEFAULT_INSTITUTION_DOMAIN};
use thiserror::Error;

pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Which addresses may create and join groups
    pub email_policy: EmailPolicy,
    /// Period of the background expiry sweep; `None` runs only the startup pass
    pub sweep_interval: Option<Duration>,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            email_policy: EmailPolicy::default(),
            sweep_interval: Some(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)),
            log_json: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PUMAPAL_EMAIL_DOMAIN: {0}")]
    InvalidEmailDomain(#[from] ValidationError),

    #[error("Invalid PUMAPAL_SWEEP_INTERVAL_SECS: {0}")]
    InvalidSweepInterval(String),
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain = env::var("PUMAPAL_EMAIL_DOMAIN")
            .unwrap_or_else(|_| DEFAULT_INSTITUTION_DOMAIN.to_string());
        let email_policy = EmailPolicy::new(&domain)?;

        let sweep_interval = match env::var("PUMAPAL_SWEEP_INTERVAL_SECS") {
            Err(_) => Some(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)),
            Ok(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSweepInterval(raw.clone()))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self {
            email_policy,
            sweep_interval,
            log_json: env_flag("PUMAPAL_LOG_JSON"),
        })
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "PUMAPAL_EMAIL_DOMAIN",
        "PUMAPAL_SWEEP_INTERVAL_SECS",
        "PUMAPAL_LOG_JSON",
    ];

    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
    }

    impl<'a> EnvGuard<'a> {
        fn new() -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            for var in ENV_VARS {
                env::remove_var(var);
            }
            Self { _lock: lock }
        }

        fn set(&self, key: &str, value: &str) {
            env::set_var(key, value);
        }
    }

    impl<'a> Drop for EnvGuard<'a> {
        fn drop(&mut self) {
            for var in ENV_VARS {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let _guard = EnvGuard::new();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.email_policy.domain(), DEFAULT_INSTITUTION_DOMAIN);
        assert_eq!(
            config.sweep_interval,
            Some(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS))
        );
        assert!(!config.log_json);
    }

    #[test]
    fn test_custom_domain_and_interval() {
        let guard = EnvGuard::new();
        guard.set("PUMAPAL_EMAIL_DOMAIN", "ucf.edu");
        guard.set("PUMAPAL_SWEEP_INTERVAL_SECS", "60");
        guard.set("PUMAPAL_LOG_JSON", "1");

        let config = ServerConfig::from_env().unwrap();
        assert!(config.email_policy.validate("kim@mail.ucf.edu").is_ok());
        assert!(config
            .email_policy
            .validate("kim@valenciacollege.edu")
            .is_err());
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(60)));
        assert!(config.log_json);
    }

    #[test]
    fn test_zero_interval_disables_loop() {
        let guard = EnvGuard::new();
        guard.set("PUMAPAL_SWEEP_INTERVAL_SECS", "0");

        let config = ServerConfig::from_env().unwrap();
        assert!(config.sweep_interval.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let guard = EnvGuard::new();
        guard.set("PUMAPAL_SWEEP_INTERVAL_SECS", "soon");
        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::InvalidSweepInterval(_))
        ));

        guard.set("PUMAPAL_SWEEP_INTERVAL_SECS", "30");
        guard.set("PUMAPAL_EMAIL_DOMAIN", "not a domain");
        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::InvalidEmailDomain(_))
        ));
    }
}
