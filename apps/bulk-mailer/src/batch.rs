//! Batch and template file loading

use mailer::{MailerError, Record};
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Parse a headerless CSV batch: `from_address,to_address,subject,message`
/// per row. Field trimming happens in the dispatcher, not here.
pub fn parse_batch<R: io::Read>(reader: R) -> Result<Vec<Record>, MailerError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let record: Record =
            row.map_err(|e| MailerError::BatchRead(format!("failed to parse batch row: {e}")))?;
        records.push(record);
    }
    Ok(records)
}

/// Read and parse the batch file.
pub fn read_batch(path: &Path) -> Result<Vec<Record>, MailerError> {
    let file = fs::File::open(path).map_err(|e| {
        MailerError::BatchRead(format!("failed to open batch file {}: {e}", path.display()))
    })?;
    parse_batch(io::BufReader::new(file))
}

/// Read a template body if a path was given.
///
/// A missing or unreadable file is not fatal on its own: it maps to an
/// absent template with a warning. Only both templates being absent
/// aborts the run, and the dispatcher enforces that.
pub fn load_template(path: Option<&Path>) -> Option<String> {
    let path = path?;
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to read template file. Did you upload it?"
            );
            None
        }
    }
}
