//! Input batch records

use serde::Deserialize;

/// One input row describing a single email to send.
///
/// Rows carry exactly four fields in this order:
/// `from_address,to_address,subject,body`. The `body` slot is the
/// per-record message text from the batch; the rendered payload comes
/// from the run-wide templates, so the body does not enter the
/// deduplication fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    pub from_address: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
}

impl Record {
    pub fn new(
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from_address: from_address.into(),
            to_address: to_address.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Copy of the record with surrounding whitespace stripped from all fields.
    pub fn trimmed(&self) -> Self {
        Self {
            from_address: self.from_address.trim().to_string(),
            to_address: self.to_address.trim().to_string(),
            subject: self.subject.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }
}
