//! Syntactic recipient address validation

use regex::Regex;
use std::sync::LazyLock;

static ADDRESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap());

/// Check an email address against the accepted syntactic pattern.
///
/// The local part is one or more of letters, digits and `_.+-`; the
/// domain is letter/digit/hyphen segments with at least one dot after
/// the `@`. Never errors - a malformed address is the caller's cue to
/// record a skip and continue, not to abort the batch.
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_PATTERN.is_match(address)
}
