//! AWS SES (Simple Email Service) transport
//!
//! Sends the raw rendered payload via the SES v2 API.
//!
//! ## Configuration
//!
//! The transport uses standard AWS SDK credential resolution:
//! - Environment variables: `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`
//! - IAM roles (EKS IRSA, EC2 instance profile)
//! - Shared credentials file
//!
//! `AWS_SES_REGION` overrides `AWS_REGION` for the SES endpoint.

use crate::message::RenderedMessage;
use crate::provider::{MailTransport, SendOutcome};
use async_trait::async_trait;
use aws_sdk_sesv2::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_sesv2::operation::RequestId;
use aws_sdk_sesv2::primitives::Blob;
use aws_sdk_sesv2::types::{Destination, EmailContent, RawMessage};
use aws_sdk_sesv2::Client;
use eyre::{eyre, Result};
use tracing::debug;

/// AWS SES mail transport
pub struct SesTransport {
    client: Client,
}

impl SesTransport {
    /// Create a new SesTransport with an existing AWS SES client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create from the default AWS SDK config.
    ///
    /// Uses the SDK's default credential chain:
    /// - Environment variables (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)
    /// - Web identity token (EKS IRSA)
    /// - IAM instance profile (EC2)
    /// - Shared credentials file
    pub async fn from_env() -> Result<Self> {
        let region = std::env::var("AWS_SES_REGION")
            .or_else(|_| std::env::var("AWS_REGION"))
            .ok();

        let mut config_loader = aws_config::from_env();

        if let Some(region_str) = region {
            config_loader = config_loader.region(aws_config::Region::new(region_str));
        }

        let config = config_loader.load().await;
        Ok(Self::new(Client::new(&config)))
    }
}

#[async_trait]
impl MailTransport for SesTransport {
    async fn send(&self, message: &RenderedMessage) -> SendOutcome {
        let raw = match RawMessage::builder()
            .data(Blob::new(message.payload.clone()))
            .build()
        {
            Ok(raw) => raw,
            Err(e) => {
                return SendOutcome::TransportError {
                    detail: format!("failed to assemble raw message: {e}"),
                }
            }
        };

        let destination = Destination::builder()
            .to_addresses(&message.to_address)
            .build();

        debug!(
            to = %message.to_address,
            subject = %message.subject,
            from = %message.from_address,
            "Sending email via AWS SES"
        );

        let result = self
            .client
            .send_email()
            .from_email_address(&message.from_address)
            .destination(destination)
            .content(EmailContent::builder().raw(raw).build())
            .send()
            .await;

        match result {
            Ok(output) => {
                let message_id = output.message_id().unwrap_or_default().to_string();
                debug!(message_id = %message_id, "Email accepted by AWS SES");
                SendOutcome::Sent { message_id }
            }
            // A structured service response is a provider rejection; anything
            // else (construction, dispatch, timeout) is a transport failure
            Err(err) => match err.as_service_error() {
                Some(service_err) => SendOutcome::Rejected {
                    detail: format!(
                        "code={}, message={}, request_id={}",
                        service_err.code().unwrap_or("Unknown"),
                        service_err.message().unwrap_or("no detail provided"),
                        service_err.request_id().unwrap_or("unknown"),
                    ),
                },
                None => SendOutcome::TransportError {
                    detail: DisplayErrorContext(&err).to_string(),
                },
            },
        }
    }

    async fn health_check(&self) -> Result<()> {
        // GetAccount is a lightweight call that confirms credentials and access
        self.client
            .get_account()
            .send()
            .await
            .map_err(|e| eyre!("AWS SES health check failed: {}", DisplayErrorContext(&e)))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "aws-ses"
    }
}
