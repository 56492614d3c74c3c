use reqwest::StatusCode;

use crate::client::ResponseFormat;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the CBIBS client, as a single tagged enum.
///
/// Every public method returns exactly one of these kinds; nothing is
/// retried, logged-and-swallowed, or downgraded internally.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A configuration value was missing or unsupported (bad response
    /// format, absent API key). Raised at construction time, before any
    /// request is issued.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The station code is not one of the codes CBIBS publishes. Raised
    /// before any network call is made; carries the offending code.
    #[error("unknown CBIBS station code: {0:?}")]
    InvalidStationCode(String),

    /// The HTTP request itself failed (DNS, timeout, connection reset).
    /// Propagated from the transport unchanged.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-200 status.
    #[error("API request failed: HTTP {status} for url ({url})")]
    Http { status: StatusCode, url: String },

    /// The service accepted the request (HTTP 200) but the JSON payload
    /// reports the API key as invalid. CBIBS only signals this reliably in
    /// JSON mode; XML responses carry no equivalent marker.
    #[error("CBIBS rejected the API key: {0}")]
    Auth(String),

    /// The response body could not be decoded as the configured format.
    #[error("failed to decode {format} response body: {message}")]
    Decode {
        format: ResponseFormat,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_mentions_status_and_url() {
        let err = Error::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url: "https://mw.buoybay.noaa.gov/api/v1/json/station".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("/json/station"));
    }

    #[test]
    fn invalid_station_error_carries_the_code() {
        assert!(
            Error::InvalidStationCode("ZZ".to_string())
                .to_string()
                .contains("ZZ")
        );
    }
}
