//! Log sanitization utilities
//!
//! RDAP bodies carry contact details (names, e-mail addresses, phone numbers) and
//! can run to tens of kilobytes, so only a single-line prefix ever reaches the logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 200;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a response body for logging.
///
/// Line breaks are folded into spaces so a pretty-printed JSON body stays on one
/// log line. Bodies over the limit are cut on a char boundary and suffixed with
/// their total length.
pub fn truncate_for_log(s: &str) -> String {
    let head = &s[..floor_char_boundary(s, TRUNCATE_LIMIT)];
    let folded: String = head
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if head.len() == s.len() {
        folded
    } else {
        format!("{folded}... [truncated, total {} bytes]", s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        let s = r#"{"ldhName":"example.com"}"#;
        assert_eq!(truncate_for_log(s), s);
    }

    #[test]
    fn newlines_folded() {
        let s = "{\n  \"ldhName\": \"example.com\"\n}";
        assert_eq!(truncate_for_log(s), r#"{ "ldhName": "example.com" }"#);
    }

    #[test]
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.ends_with(&format!("[truncated, total {} bytes]", TRUNCATE_LIMIT + 100)));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "名".repeat(200);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total 600 bytes]"));
    }
}
