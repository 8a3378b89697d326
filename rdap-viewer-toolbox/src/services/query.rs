//! Query component: one GET against the lookup endpoint, gated by a loading flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use url::Url;

use crate::error::{RdapError, RdapResult};
use crate::http_client::HttpUtils;
use crate::types::LookupResult;

/// Public RDAP aggregator that routes a domain to its authoritative registry.
pub const DEFAULT_ENDPOINT: &str = "https://rdap.org/domain/";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const ACCEPT: &str = "application/rdap+json, application/json;q=0.9";

/// Connection settings for [`RdapClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL; the domain is appended as the last path segment.
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("rdap-viewer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Parse an endpoint, forcing a trailing `/` so `join` appends rather than replaces.
pub fn normalize_endpoint(endpoint: &str) -> RdapResult<Url> {
    let endpoint = endpoint.trim();
    let with_slash = if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{endpoint}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| RdapError::ValidationError(format!("Invalid endpoint {endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RdapError::ValidationError(format!(
            "Endpoint must be http or https: {endpoint}"
        )));
    }
    Ok(url)
}

/// Clears the loading flag when the lookup finishes, on every path.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> RdapResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| RdapError::Busy)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// RDAP lookup client.
///
/// At most one lookup runs at a time; a second call while one is in flight fails
/// with [`RdapError::Busy`]. Share it behind an `Arc` to observe [`is_loading`](Self::is_loading)
/// from other tasks.
#[derive(Debug)]
pub struct RdapClient {
    http: reqwest::Client,
    endpoint: Url,
    loading: AtomicBool,
}

impl RdapClient {
    pub fn new(options: &ClientOptions) -> RdapResult<Self> {
        let endpoint = normalize_endpoint(&options.endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .build()
            .map_err(|e| RdapError::NetworkError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            loading: AtomicBool::new(false),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether a lookup is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// URL queried for an already-validated domain.
    pub fn lookup_url(&self, domain: &str) -> RdapResult<Url> {
        self.endpoint
            .join(domain)
            .map_err(|e| RdapError::ValidationError(format!("Invalid domain {domain}: {e}")))
    }

    /// Look up registration data for `domain`.
    ///
    /// The input is validated and normalised first (see [`validate_domain`](super::validate_domain)).
    pub async fn lookup(&self, domain: &str) -> RdapResult<LookupResult> {
        let domain = super::validate_domain(domain)?;
        let _guard = LoadingGuard::acquire(&self.loading)?;

        let url = self.lookup_url(&domain)?;
        let request = self.http.get(url.clone()).header(reqwest::header::ACCEPT, ACCEPT);

        let (status, body) = HttpUtils::execute_request(request, url.as_str()).await?;
        HttpUtils::check_status(status, &body, &domain)?;
        let result: LookupResult = HttpUtils::parse_json(&body)?;

        log::info!(
            "[rdap] {domain}: {} status value(s), {} event(s), {} nameserver(s)",
            result.status.len(),
            result.events.len(),
            result.nameservers.len()
        );
        Ok(result)
    }
}
