//! Dispatch engine configuration

use core_config::{env_parse_or_default, ConfigError, FromEnv};

/// Default worker pool width when `MAILER_CONCURRENCY` is unset.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Run configuration for the dispatch engine.
///
/// The pool width is the only externally tunable core parameter; it is
/// fixed before dispatch begins and never adjusted mid-run. Provider
/// settings (region, credentials) are resolved by the transport itself.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Worker pool width; 1 means fully sequential execution
    pub concurrency: usize,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl FromEnv for MailerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let concurrency = env_parse_or_default("MAILER_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        if concurrency == 0 {
            return Err(ConfigError::Invalid(
                "MAILER_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        Ok(Self { concurrency })
    }
}
