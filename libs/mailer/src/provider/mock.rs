//! Mock transport for testing and dry runs

use super::{MailTransport, SendOutcome};
use crate::message::RenderedMessage;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum Behavior {
    /// Accept every message
    Accept,
    /// Reject every message with the given provider detail
    Reject(String),
    /// Fail every send at the transport level
    Fail(String),
    /// Reject sends to one recipient, accept the rest
    RejectRecipient { to_address: String, detail: String },
}

/// Mock mail transport that captures accepted messages.
pub struct MockTransport {
    accepted: Arc<Mutex<Vec<RenderedMessage>>>,
    behavior: Behavior,
}

impl MockTransport {
    /// Create a mock that accepts everything
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Accept)
    }

    /// Create a mock where the provider rejects every message
    pub fn rejecting(detail: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reject(detail.into()))
    }

    /// Create a mock where every send fails at the transport level
    pub fn failing(detail: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(detail.into()))
    }

    /// Create a mock that rejects sends to `to_address` and accepts the rest
    pub fn rejecting_for(to_address: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::RejectRecipient {
            to_address: to_address.into(),
            detail: detail.into(),
        })
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            accepted: Arc::new(Mutex::new(Vec::new())),
            behavior,
        }
    }

    /// Get all accepted messages
    pub async fn accepted_messages(&self) -> Vec<RenderedMessage> {
        self.accepted.lock().await.clone()
    }

    /// Get the count of accepted messages
    pub async fn accepted_count(&self) -> usize {
        self.accepted.lock().await.len()
    }

    /// Check if a message was accepted for a specific recipient
    pub async fn was_sent_to(&self, to_address: &str) -> bool {
        self.accepted
            .lock()
            .await
            .iter()
            .any(|m| m.to_address == to_address)
    }

    /// Clear all captured messages
    pub async fn clear(&self) {
        self.accepted.lock().await.clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, message: &RenderedMessage) -> SendOutcome {
        match &self.behavior {
            Behavior::Reject(detail) => {
                return SendOutcome::Rejected {
                    detail: detail.clone(),
                }
            }
            Behavior::Fail(detail) => {
                return SendOutcome::TransportError {
                    detail: detail.clone(),
                }
            }
            Behavior::RejectRecipient { to_address, detail } if *to_address == message.to_address => {
                return SendOutcome::Rejected {
                    detail: detail.clone(),
                }
            }
            Behavior::Accept | Behavior::RejectRecipient { .. } => {}
        }

        let mut accepted = self.accepted.lock().await;
        accepted.push(message.clone());

        SendOutcome::Sent {
            message_id: format!("mock-{}", accepted.len()),
        }
    }

    async fn health_check(&self) -> Result<()> {
        if let Behavior::Fail(detail) = &self.behavior {
            return Err(eyre::eyre!("mock transport unhealthy: {detail}"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
