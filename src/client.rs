use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::config::load_config;
use crate::error::{Error, Result};
use crate::response::{Payload, parse_body};
use crate::station::Station;

/// Base URL of the CBIBS web API.
pub const DEFAULT_BASE_URL: &str = "https://mw.buoybay.noaa.gov/api/v1";

/// Serialization the service should answer with.
///
/// The format is part of the request path (`.../json/station`,
/// `.../xml/station`), so it is fixed per client and validated eagerly:
/// an unsupported format string never survives construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Structured JSON documents (the default).
    #[default]
    Json,
    /// XML tree documents. Note that CBIBS does not reliably signal an
    /// invalid API key in this mode; see [`crate::Error::Auth`].
    Xml,
}

impl ResponseFormat {
    /// The path segment used in request URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            _ => Err(Error::Configuration(format!(
                "unsupported response format {s:?} (expected \"json\" or \"xml\")"
            ))),
        }
    }
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key, passed as the `key` query parameter on every request.
    pub key: String,
    /// Base API URL, typically [`DEFAULT_BASE_URL`].
    pub url: String,
    /// Response serialization.
    pub format: ResponseFormat,
}

/// Client for the CBIBS buoy-telemetry API.
///
/// Each read method performs a single blocking GET and returns the decoded
/// payload, or a classified [`Error`]. There are no retries and no caching;
/// a failed call is simply surfaced to the caller.
#[derive(Debug, Clone)]
pub struct Client {
    key: String,
    url: String,
    format: ResponseFormat,
    timeout: Duration,

    // Reusable connection handle, present only inside a `with_session`
    // scope. Cleared on every exit path.
    session: Option<HttpClient>,
}

impl Client {
    /// Creates a client for the public CBIBS endpoint with the given API
    /// key, JSON responses, and a 30 second timeout.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: DEFAULT_BASE_URL.to_string(),
            format: ResponseFormat::default(),
            timeout: Duration::from_secs(30),
            session: None,
        }
    }

    /// Creates a client from environment variables (`CBIBS_API_KEY`,
    /// `CBIBS_URL`, `CBIBS_FORMAT`) and/or a `.cbibsrc` file.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(load_config(None, None, None)?))
    }

    /// Creates a client from an already-resolved configuration.
    pub fn from_config(cfg: ClientConfig) -> Self {
        Self::new(cfg.key)
            .with_base_url(cfg.url)
            .with_format(cfg.format)
    }

    /// Overrides the base API URL. Trailing slashes are tolerated.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Selects JSON or XML responses.
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Overrides the per-request timeout handed to the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The fully-qualified endpoint prefix, `{base_url}/{format}`.
    pub fn endpoint_prefix(&self) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), self.format)
    }

    /// Runs `f` with a reusable connection handle held for the duration of
    /// the call, so sequential requests inside the scope share connections.
    ///
    /// The handle is released when `f` returns, whether it succeeds, fails
    /// early with `?`, or panics. Outside such a scope every request opens
    /// its own ephemeral connection.
    pub fn with_session<T>(&mut self, f: impl FnOnce(&mut Client) -> Result<T>) -> Result<T> {
        struct Guard<'a>(&'a mut Client);

        impl Drop for Guard<'_> {
            fn drop(&mut self) {
                self.0.session = None;
            }
        }

        self.session = Some(build_http(self.timeout)?);
        let mut guard = Guard(self);
        f(&mut *guard.0)
    }

    /// Fetches the current readings for every CBIBS station.
    ///
    /// Issues `GET {prefix}/station?key={key}`.
    pub fn current_readings(&self) -> Result<Payload> {
        let url = format!("{}/station", self.endpoint_prefix());
        self.fetch(&url, &[])
    }

    /// Fetches the current readings for one station.
    ///
    /// `code` is matched case-insensitively against the published station
    /// set; an unknown code fails with [`Error::InvalidStationCode`] before
    /// any network call. Issues `GET {prefix}/station/{CODE}?key={key}`.
    pub fn station_readings(&self, code: &str) -> Result<Payload> {
        let station = Station::from_code(code)?;
        let url = format!("{}/station/{}", self.endpoint_prefix(), station);
        self.fetch(&url, &[])
    }

    /// Fetches readings for one station over a time window, via the
    /// service's query endpoint:
    /// `GET {prefix}/query/{CODE}?key={key}&sd={start}&ed={end}`.
    ///
    /// Timestamps are sent as RFC 3339 UTC. Station validation and response
    /// handling match [`Client::station_readings`].
    pub fn query_readings(
        &self,
        code: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Payload> {
        let station = Station::from_code(code)?;
        let url = format!("{}/query/{}", self.endpoint_prefix(), station);
        let params = [
            ("sd", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("ed", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        self.fetch(&url, &params)
    }

    fn http(&self) -> Result<HttpClient> {
        match &self.session {
            Some(session) => Ok(session.clone()),
            None => build_http(self.timeout),
        }
    }

    fn fetch(&self, url: &str, extra_params: &[(&str, String)]) -> Result<Payload> {
        let http = self.http()?;

        debug!(url, "issuing CBIBS request");
        let resp = http
            .get(url)
            .query(&[("key", self.key.as_str())])
            .query(extra_params)
            .send()?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Http {
                status,
                url: url.to_string(),
            });
        }

        let body = resp.text()?;
        debug!(%status, bytes = body.len(), "CBIBS responded");

        parse_body(self.format, &body)
    }
}

fn build_http(timeout: Duration) -> Result<HttpClient> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&format!("cbibs-rs/{}", env!("CARGO_PKG_VERSION")))
            .unwrap_or(HeaderValue::from_static("cbibs-rs")),
    );

    Ok(HttpClient::builder()
        .default_headers(default_headers)
        .timeout(timeout)
        .build()?)
}
