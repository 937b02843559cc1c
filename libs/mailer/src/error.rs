//! Error types for the dispatch engine
//!
//! Per-record failures (invalid address, provider rejection, transport
//! failure) are not errors at this level - they are recorded as error
//! lines in the run summary and never stop the batch. `MailerError`
//! covers the conditions that abort a run or drop a single record during
//! construction.

use core_config::ConfigError;
use thiserror::Error;

/// Errors raised by the dispatch engine
#[derive(Error, Debug)]
pub enum MailerError {
    /// Fatal for the whole run (e.g. both templates absent, zero-width pool)
    #[error("configuration error: {0}")]
    Config(String),

    /// Message construction failed for a single record
    #[error("message build error: {0}")]
    Message(String),

    /// The record source could not be read (adapter-level, fatal for the run)
    #[error("batch read error: {0}")]
    BatchRead(String),
}

impl From<ConfigError> for MailerError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
