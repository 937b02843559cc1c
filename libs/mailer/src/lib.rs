//! Bulk email dispatch engine
//!
//! Given a batch of records and a pair of message templates, renders and
//! sends one email per record through a transactional email provider,
//! deduplicating repeat submissions and bounding concurrency.
//!
//! ## Components
//!
//! - **Records**: `Record` for the four-field input rows
//! - **Validation**: `is_valid_address` syntactic recipient check
//! - **Rendering**: `RenderedMessage` multipart construction via lettre
//! - **Dedup**: `Fingerprint` + `DedupLedger` for at-most-once delivery per run
//! - **Transports**: AWS SES (`SesTransport`) and Mock (always available)
//! - **Dispatch**: `Dispatcher` fan-out with a bounded worker pool
//! - **Reporting**: `RunSummary` counters and ordered error log
//!
//! ## Usage
//!
//! ```ignore
//! use mailer::{Dispatcher, MessageTemplates, SesTransport};
//!
//! let transport = SesTransport::from_env().await?;
//! let templates = MessageTemplates { text: Some(body), html: None };
//! let dispatcher = Dispatcher::new(transport, templates, 4)?;
//! let summary = dispatcher.run(records).await?;
//! ```

// Core modules
pub mod config;
pub mod dedup;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod provider;
pub mod record;
pub mod summary;
pub mod templates;
pub mod validate;

// Re-export main types
pub use config::MailerConfig;
pub use dedup::{DedupLedger, Fingerprint};
pub use dispatcher::Dispatcher;
pub use error::MailerError;
pub use message::RenderedMessage;
pub use provider::{MailTransport, MockTransport, SendOutcome, SesTransport};
pub use record::Record;
pub use summary::{Aggregator, RunSummary};
pub use templates::MessageTemplates;
pub use validate::is_valid_address;
