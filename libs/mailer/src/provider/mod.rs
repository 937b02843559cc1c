//! Mail transport implementations

pub mod mock;
pub mod ses;

pub use mock::MockTransport;
pub use ses::SesTransport;

use crate::message::RenderedMessage;
use async_trait::async_trait;

/// Classified outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The provider accepted the message
    Sent { message_id: String },
    /// The call succeeded but the provider reported a structured
    /// non-success response; `detail` carries the provider metadata
    Rejected { detail: String },
    /// The send call itself failed (network, auth, throttling)
    TransportError { detail: String },
}

/// Trait for mail transports.
///
/// One attempt per message; retries and quota management are out of
/// scope for the transport.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempt delivery of a rendered message and classify the outcome.
    async fn send(&self, message: &RenderedMessage) -> SendOutcome;

    /// Check if the transport is healthy
    async fn health_check(&self) -> eyre::Result<()>;

    /// Get transport name
    fn name(&self) -> &'static str;
}
