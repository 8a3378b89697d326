//! HTTP helpers for the lookup service
//!
//! Sending the request, logging, reading the body, and turning HTTP status codes and
//! RDAP error bodies into [`RdapError`] values.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::{RdapError, RdapResult};
use crate::types::RdapErrorBody;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status code and response text.
    ///
    /// Transport timeouts map to [`RdapError::Timeout`], every other transport
    /// failure to [`RdapError::NetworkError`]. Non-2xx statuses are returned as-is;
    /// see [`HttpUtils::check_status`].
    pub async fn execute_request(
        request_builder: RequestBuilder,
        url: &str,
    ) -> RdapResult<(u16, String)> {
        log::debug!("[rdap] GET {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                RdapError::Timeout(e.to_string())
            } else {
                RdapError::NetworkError(format!("Request failed: {e}"))
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[rdap] Response Status: {status_code}");

        let response_text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RdapError::Timeout(e.to_string())
            } else {
                RdapError::NetworkError(format!("Failed to read response body: {e}"))
            }
        })?;

        log::debug!("[rdap] Response Body: {}", truncate_for_log(&response_text));

        Ok((status_code, response_text))
    }

    /// Map a non-success status to an error.
    ///
    /// 404 means the registry has no such domain. Other statuses carry the RDAP
    /// error body's `title` and `description` when the body is one, else the raw
    /// body text.
    pub fn check_status(status: u16, body: &str, domain: &str) -> RdapResult<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        if status == 404 {
            return Err(RdapError::NotFound(domain.to_string()));
        }

        let message = serde_json::from_str::<RdapErrorBody>(body)
            .ok()
            .and_then(|err| {
                let mut parts: Vec<String> = err.title.into_iter().collect();
                parts.extend(err.description);
                if parts.is_empty() {
                    err.error_code.map(|code| format!("error code {code}"))
                } else {
                    Some(parts.join(" - "))
                }
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "empty response".to_string()
                } else {
                    truncate_for_log(trimmed)
                }
            });

        log::warn!("[rdap] HTTP {status} for {domain}: {message}");
        Err(RdapError::ServerError { status, message })
    }

    /// Parse JSON response
    pub fn parse_json<T>(response_text: &str) -> RdapResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[rdap] JSON parse failed: {e}");
            log::error!("[rdap] Raw response: {}", truncate_for_log(response_text));
            RdapError::ParseError(e.to_string())
        })
    }
}
