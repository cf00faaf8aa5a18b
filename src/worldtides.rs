//! # WorldTides Heights Fetching
//!
//! All network I/O for the pipeline lives here: one HTTP GET against the
//! WorldTides v2 heights endpoint, decoded into [`Sample`]s for the
//! classifier.
//!
//! ## Data Source
//!
//! - **Endpoint**: `{base_url}/heights`
//! - **Query**: `lat`, `lon`, `start`, `end` (Unix seconds) and the access
//!   `key`
//! - **Window**: 12 hours either side of "now", computed with plain hour
//!   arithmetic on UTC instants
//! - **Body**: `{"heights": [{"dt": <seconds>, "height": <meters>}, ...]}`;
//!   unknown fields are ignored
//!
//! ## Failure Modes
//!
//! Each request either succeeds or fails once; there is no retry, no backoff
//! and no timeout override beyond the client defaults. A URL that cannot be
//! built (non-finite coordinate, broken base URL) fails before any request is
//! issued. Non-success statuses and connectivity problems surface as
//! transport errors, and a body of the wrong shape as a decode error. All of
//! them propagate through [`FetchError`] and are terminal for that request;
//! the caller decides whether to try again later.

use crate::{Coordinate, Sample};
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Default WorldTides API v2 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.worldtides.info/api/v2";

/// Hours fetched on either side of "now".
const WINDOW_HOURS: i64 = 12;

/// Errors that can occur while fetching tide heights.
///
/// One variant per failure class: the request could not be built, the
/// exchange with the server failed, or the body was not what the service
/// promises. Callers treat all three the same way (report and move on), but
/// the distinction keeps logs and tests honest.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request URL could not be built from the inputs; nothing was sent.
    #[error("invalid request: {0}")]
    Request(String),

    /// Network failure or a non-success HTTP status.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Wire shape of a successful heights response.
#[derive(Debug, Deserialize)]
struct HeightsResponse {
    heights: Vec<Sample>,
}

/// HTTP client for the heights endpoint.
///
/// Cheap to clone; holds the base URL and access key alongside a pooled
/// `reqwest` client.
#[derive(Clone)]
pub struct TideClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TideClient {
    /// Create a client against `base_url` with the given access key.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("tide-times/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch the 24-hour height window centered on `now` for `location`.
    ///
    /// Issues a single GET and decodes the body into samples. The returned
    /// sequence is whatever the service sent, untouched; labeling and
    /// ordering concerns belong to [`classify`](crate::classify).
    ///
    /// # Errors
    ///
    /// [`FetchError::Request`] when the URL cannot be built (no request is
    /// issued), [`FetchError::Transport`] for connection failures and
    /// non-success statuses, [`FetchError::Decode`] for malformed bodies.
    pub async fn fetch_heights(
        &self,
        location: &Coordinate,
        now: DateTime<Utc>,
    ) -> Result<Vec<Sample>, FetchError> {
        let (start, end) = window(now);
        let url = heights_url(&self.base_url, location, start, end, &self.api_key)?;

        debug!(
            "requesting tide heights for {} ({} to {})",
            location.name, start, end
        );

        // reqwest errors echo the full request URL, key included; drop the
        // URL so the credential stays out of logs and error output.
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;

        // Decode from text so a wrong-shaped body is reported as a decode
        // failure rather than folded into the transport error.
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let decoded: HeightsResponse = serde_json::from_str(&body)?;

        debug!("received {} samples", decoded.heights.len());
        Ok(decoded.heights)
    }
}

/// Window bounds as Unix seconds: 12 hours before and after `now`.
fn window(now: DateTime<Utc>) -> (i64, i64) {
    let start = now - Duration::hours(WINDOW_HOURS);
    let end = now + Duration::hours(WINDOW_HOURS);
    (start.timestamp(), end.timestamp())
}

/// Build the heights request URL.
///
/// Format:
/// `{base}/heights?lat={lat}&lon={lon}&start={start}&end={end}&key={key}`.
/// Non-finite coordinates would stringify into something the service cannot
/// parse, so they are rejected here before a request exists to fail.
fn heights_url(
    base_url: &str,
    location: &Coordinate,
    start: i64,
    end: i64,
    key: &str,
) -> Result<Url, FetchError> {
    if !location.latitude.is_finite() || !location.longitude.is_finite() {
        return Err(FetchError::Request(format!(
            "non-finite coordinate for {}",
            location.name
        )));
    }

    let raw = format!(
        "{}/heights?lat={}&lon={}&start={}&end={}&key={}",
        base_url, location.latitude, location.longitude, start, end, key
    );
    Url::parse(&raw).map_err(|err| FetchError::Request(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn location() -> Coordinate {
        Coordinate {
            name: "San Francisco".to_string(),
            latitude: 37.7749,
            longitude: -122.4194,
        }
    }

    #[test]
    fn test_window_is_twelve_hours_each_side() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let (start, end) = window(now);

        assert_eq!(start, now.timestamp() - 12 * 3600);
        assert_eq!(end, now.timestamp() + 12 * 3600);
        assert_eq!(end - start, 24 * 3600);
    }

    #[test]
    fn test_heights_url_format() {
        let url = heights_url(DEFAULT_BASE_URL, &location(), 1_700_000_000, 1_700_086_400, "secret")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://www.worldtides.info/api/v2/heights?lat=37.7749&lon=-122.4194&start=1700000000&end=1700086400&key=secret"
        );
    }

    #[test]
    fn test_heights_url_strips_trailing_slash_via_client() {
        let client = TideClient::new("https://example.com/api/", "k").unwrap();
        assert_eq!(client.base_url, "https://example.com/api");
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let mut nan_lat = location();
        nan_lat.latitude = f64::NAN;
        assert!(matches!(
            heights_url(DEFAULT_BASE_URL, &nan_lat, 0, 100, "k"),
            Err(FetchError::Request(_))
        ));

        let mut inf_lon = location();
        inf_lon.longitude = f64::INFINITY;
        assert!(matches!(
            heights_url(DEFAULT_BASE_URL, &inf_lon, 0, 100, "k"),
            Err(FetchError::Request(_))
        ));
    }

    #[test]
    fn test_unparseable_base_url_is_rejected() {
        assert!(matches!(
            heights_url("not a url", &location(), 0, 100, "k"),
            Err(FetchError::Request(_))
        ));
    }

    #[test]
    fn test_decode_expected_shape() {
        let body = r#"{
            "status": 200,
            "heights": [
                {"dt": 1748779200, "height": -0.307},
                {"dt": 1748781000, "height": -0.315}
            ]
        }"#;

        let decoded: HeightsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.heights.len(), 2);
        assert_eq!(decoded.heights[0].dt, 1_748_779_200);
        assert!((decoded.heights[0].height + 0.307).abs() < 1e-9);
    }

    #[test]
    fn test_decode_tolerates_empty_heights() {
        let decoded: HeightsResponse = serde_json::from_str(r#"{"heights": []}"#).unwrap();
        assert!(decoded.heights.is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed_bodies() {
        assert!(serde_json::from_str::<HeightsResponse>("{}").is_err());
        assert!(serde_json::from_str::<HeightsResponse>(r#"{"heights": "nope"}"#).is_err());
        assert!(serde_json::from_str::<HeightsResponse>("<html></html>").is_err());
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_finite_before_any_request() {
        let client = TideClient::new(DEFAULT_BASE_URL, "k").unwrap();
        let mut bad = location();
        bad.longitude = f64::NEG_INFINITY;

        let result = client.fetch_heights(&bad, Utc::now()).await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport() {
        // Discard port; nothing listens there.
        let client = TideClient::new("http://127.0.0.1:9", "k").unwrap();

        let result = client.fetch_heights(&location(), Utc::now()).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport() {
        use std::io::{Read, Write};

        // One-shot server that answers any request with a 500 and hangs up.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\n\
                  content-length: 0\r\nconnection: close\r\n\r\n",
            );
        });

        let client = TideClient::new(&format!("http://{addr}"), "k").unwrap();
        let result = client.fetch_heights(&location(), Utc::now()).await;
        server.join().unwrap();

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
