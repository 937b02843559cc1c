//! Run-wide message templates

use crate::error::MailerError;

/// The plain-text and HTML template bodies shared by every message in a
/// run. Either may be absent (distinct from present-but-empty), but not
/// both - a run without any template cannot render messages and must
/// abort before processing records.
#[derive(Debug, Clone, Default)]
pub struct MessageTemplates {
    pub text: Option<String>,
    pub html: Option<String>,
}

impl MessageTemplates {
    pub fn new(text: Option<String>, html: Option<String>) -> Self {
        Self { text, html }
    }

    /// Fail the run if both template bodies are absent. Checked once per
    /// run before any record is processed.
    pub fn ensure_usable(&self) -> Result<(), MailerError> {
        if self.text.is_none() && self.html.is_none() {
            return Err(MailerError::Config(
                "cannot continue without a text or html template".to_string(),
            ));
        }
        Ok(())
    }
}
