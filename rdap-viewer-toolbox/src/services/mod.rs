//! Lookup and rendering services.
//!
//! [`RdapClient`] performs the network request; [`format_report`] and [`format_json`]
//! turn a [`LookupResult`](crate::types::LookupResult) into exportable text.

mod format;
mod query;
mod vcard;

pub use format::{FormatOptions, DEFAULT_PLACEHOLDER, format_json, format_report, suggested_filename};
pub use query::{ClientOptions, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, RdapClient, normalize_endpoint};
pub use vcard::{ContactCard, parse_vcard};

use crate::error::{RdapError, RdapResult};

/// Maximum length of a domain name in presentation form.
const MAX_DOMAIN_LEN: usize = 253;

/// Full stops that IDNA maps to `.` (ASCII, ideographic, fullwidth, halfwidth).
const FULL_STOPS: [char; 4] = ['.', '\u{3002}', '\u{FF0E}', '\u{FF61}'];

/// Validate and normalise a domain name input.
///
/// Trims whitespace, rejects IP addresses (the lookup endpoint serves domains only),
/// converts internationalised domain names (IDN) to ASCII via IDNA 2008, drops a
/// single trailing root dot, and rejects empty, single-label or overlong inputs.
/// Label separators are checked on the converted form.
pub fn validate_domain(domain: &str) -> RdapResult<String> {
    let domain = domain.trim();
    let domain = domain.strip_suffix(FULL_STOPS).unwrap_or(domain);
    if domain.is_empty() {
        return Err(RdapError::ValidationError(
            "Domain name is required".to_string(),
        ));
    }
    if domain.parse::<std::net::IpAddr>().is_ok() {
        return Err(RdapError::ValidationError(format!(
            "IP addresses are not supported, enter a domain name: {domain}"
        )));
    }
    // IDNA processing: maps full stops, converts Unicode labels to Punycode and validates.
    let ascii_domain = idna::domain_to_ascii_strict(domain)
        .map_err(|_| RdapError::ValidationError(format!("Invalid domain name: {domain}")))?;
    if !ascii_domain.contains('.') {
        return Err(RdapError::ValidationError(format!(
            "Enter a fully qualified domain name (e.g. example.com): {domain}"
        )));
    }
    if ascii_domain.len() > MAX_DOMAIN_LEN {
        return Err(RdapError::ValidationError(format!(
            "Domain name exceeds maximum length of {MAX_DOMAIN_LEN} characters (got {})",
            ascii_domain.len()
        )));
    }
    Ok(ascii_domain.to_ascii_lowercase())
}
