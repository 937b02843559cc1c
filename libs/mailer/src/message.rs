//! MIME message construction via lettre

use crate::error::MailerError;
use crate::templates::MessageTemplates;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::Message;

/// A fully constructed email payload ready for transport.
///
/// Owned exclusively by the send task that created it and discarded
/// after the single send attempt.
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    pub subject: String,
    pub from_address: String,
    pub to_address: String,
    /// Raw RFC 2822 bytes handed to the provider
    pub payload: Vec<u8>,
}

impl RenderedMessage {
    /// Render a message from the record headers and the run-wide templates.
    ///
    /// Produces multipart/alternative when both bodies are present and a
    /// single part when only one is. Subject/From/To come verbatim from
    /// the inputs. Both bodies absent is a configuration error; the
    /// dispatcher rejects it once per run before building anything.
    pub fn build(
        subject: &str,
        from_address: &str,
        to_address: &str,
        templates: &MessageTemplates,
    ) -> Result<Self, MailerError> {
        let from: Mailbox = from_address.parse().map_err(|e| {
            MailerError::Message(format!("invalid from address {from_address:?}: {e}"))
        })?;
        let to: Mailbox = to_address
            .parse()
            .map_err(|e| MailerError::Message(format!("invalid to address {to_address:?}: {e}")))?;

        let builder = Message::builder().from(from).to(to).subject(subject);

        let message = match (&templates.text, &templates.html) {
            (Some(text), Some(html)) => builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(text.clone()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(html.clone()),
                        ),
                )
                .map_err(|e| MailerError::Message(e.to_string()))?,
            (Some(text), None) => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text.clone())
                .map_err(|e| MailerError::Message(e.to_string()))?,
            (None, Some(html)) => builder
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .map_err(|e| MailerError::Message(e.to_string()))?,
            (None, None) => {
                return Err(MailerError::Config(
                    "cannot render a message without a text or html template".to_string(),
                ));
            }
        };

        Ok(Self {
            subject: subject.to_string(),
            from_address: from_address.to_string(),
            to_address: to_address.to_string(),
            payload: message.formatted(),
        })
    }
}
