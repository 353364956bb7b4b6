use std::io::ErrorKind;
use std::time::Duration;

use latency_grader_core::prelude::{HttpMethod, RequestSpec};
use ureq::typestate::{WithBody, WithoutBody};
use ureq::RequestBuilder;
use url::Url;

/// Header the logistics backend uses to report how long it spent handling a request.
pub const DEFAULT_PROCESS_TIME_HEADER: &str = "X-Process-Time";

/// What the sampler needs to know about a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Raw value of the processing time header, if the target sent one.
    pub server_processing_time: Option<String>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[display("request timed out after {timeout:?}")]
    Timeout { timeout: Duration },
    #[display("request failed: {reason}")]
    Failed { reason: String },
}

/// Sends a single request to the target system and waits for it to complete.
///
/// Implementations must block until the request completes, fails or the timeout expires. They must
/// not retry.
pub trait Transport {
    fn execute(
        &self,
        request: &RequestSpec,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(
        &self,
        request: &RequestSpec,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        (**self).execute(request, timeout)
    }
}

/// Blocking HTTP transport.
///
/// Non-success status codes are returned as responses rather than errors so that the caller can
/// classify them. The response body is read to the end so that the measured time covers the whole
/// transfer.
pub struct HttpTransport {
    base_url: Url,
    agent: ureq::Agent,
    process_time_header: String,
}

impl HttpTransport {
    pub fn new(base_url: Url, process_time_header: &str) -> Self {
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self {
            base_url,
            agent,
            process_time_header: process_time_header.to_ascii_lowercase(),
        }
    }

    /// Resolve a request against the base address.
    ///
    /// The path is appended to the base address as written, so a base address with a path prefix
    /// keeps that prefix.
    pub fn url_for(&self, request: &RequestSpec) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url =
            Url::parse(&format!("{base}{}", request.path)).map_err(|e| TransportError::Failed {
                reason: format!("invalid url for {request}: {e}"),
            })?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    fn call(
        builder: RequestBuilder<WithoutBody>,
        timeout: Duration,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        builder.config().timeout_global(Some(timeout)).build().call()
    }

    fn send_empty(
        builder: RequestBuilder<WithBody>,
        timeout: Duration,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        builder
            .config()
            .timeout_global(Some(timeout))
            .build()
            .send_empty()
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        request: &RequestSpec,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(request)?;
        let url = url.as_str();

        let response = match request.method {
            HttpMethod::Get => Self::call(self.agent.get(url), timeout),
            HttpMethod::Head => Self::call(self.agent.head(url), timeout),
            HttpMethod::Delete => Self::call(self.agent.delete(url), timeout),
            HttpMethod::Post => Self::send_empty(self.agent.post(url), timeout),
            HttpMethod::Put => Self::send_empty(self.agent.put(url), timeout),
            HttpMethod::Patch => Self::send_empty(self.agent.patch(url), timeout),
        }
        .map_err(|e| classify_error(e, timeout))?;

        let status = response.status().as_u16();
        let server_processing_time = response
            .headers()
            .get(self.process_time_header.as_str())
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

        let mut body = response.into_body();
        std::io::copy(&mut body.as_reader(), &mut std::io::sink())
            .map_err(|e| classify_body_error(e, timeout))?;

        Ok(TransportResponse {
            status,
            server_processing_time,
        })
    }
}

fn classify_error(err: ureq::Error, timeout: Duration) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout { timeout },
        ureq::Error::Io(e) if is_timeout_kind(e.kind()) => TransportError::Timeout { timeout },
        other => TransportError::Failed {
            reason: other.to_string(),
        },
    }
}

/// The body reader reports ureq's own errors wrapped in an [std::io::Error].
fn classify_body_error(err: std::io::Error, timeout: Duration) -> TransportError {
    let timed_out = is_timeout_kind(err.kind())
        || match err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<ureq::Error>())
        {
            Some(ureq::Error::Timeout(_)) => true,
            Some(ureq::Error::Io(e)) => is_timeout_kind(e.kind()),
            _ => false,
        };

    if timed_out {
        TransportError::Timeout { timeout }
    } else {
        TransportError::Failed {
            reason: format!("failed to read response body: {err}"),
        }
    }
}

fn is_timeout_kind(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::TimedOut | ErrorKind::WouldBlock)
}
