//! # Tide Times Core Library
//!
//! This library holds the data model and the fetch/classify pipeline behind
//! the `tide-times` binary: pull 24 hours of tide heights for one saved
//! location from the WorldTides service, label each sample as high or low
//! water, and hand the caller a ready-to-render report.
//!
//! ## Data Flow
//!
//! 1. **Fetch** ([`worldtides`]): one HTTP GET for the window from 12 hours
//!    before "now" to 12 hours after, decoded into [`Sample`]s.
//! 2. **Classify** ([`classify`]): label every sample [`TideKind::High`] or
//!    [`TideKind::Low`] by comparing it to its immediate neighbors, and pick
//!    the current height from the sample nearest the present moment.
//! 3. **Render**: the binary draws the labeled series as an ASCII chart
//!    ([`renderer`]) or emits the report as JSON.
//!
//! Samples and events are request-scoped: every fetch allocates fresh
//! sequences and nothing is cached across requests. The only persistent
//! state is the last-selected [`Coordinate`], stored as JSON by [`store`].
//!
//! ## Core Types
//!
//! - [`Sample`]: one raw (timestamp, height) reading, matching the wire shape
//! - [`TideEvent`]: a sample annotated with its high/low label
//! - [`Coordinate`]: the named location used as the query key
//! - [`TideReport`]: the classified series plus the optional current height

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod classify;
pub mod config;
pub mod renderer;
pub mod store;
pub mod worldtides;

/// A single tide reading as returned by the heights endpoint.
///
/// Field names match the wire format (`{"dt": ..., "height": ...}`) so the
/// response decodes straight into this type. Heights are meters relative to
/// the service's reference datum and pass through unconverted.
///
/// # Example
/// ```
/// use tide_times_lib::Sample;
///
/// let sample = Sample { dt: 1_700_000_000, height: 1.42 };
/// assert_eq!(sample.time().timestamp(), 1_700_000_000);
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Sample {
    /// Unix timestamp of the reading, in seconds (UTC).
    pub dt: i64,
    /// Tide height in meters.
    pub height: f64,
}

impl Sample {
    /// Timestamp of the reading as a chrono instant.
    ///
    /// Timestamps outside chrono's representable range fall back to the Unix
    /// epoch rather than panicking; the service never produces such values.
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.dt, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// High or low water, as decided by the neighbor comparison in [`classify`].
///
/// Serializes as `"High"` / `"Low"`, the strings the original service
/// clients exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TideKind {
    High,
    Low,
}

/// A classified tide sample.
///
/// Derived from one [`Sample`] plus its left/right neighbors; exists only for
/// the lifetime of a report and is never persisted.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TideEvent {
    /// Tide height in meters.
    pub height: f64,
    /// Instant of the underlying sample.
    pub time: DateTime<Utc>,
    /// High/low label.
    pub kind: TideKind,
}

/// A named geographic point used as the query key for a fetch.
///
/// No validation is applied here beyond the fields being numeric; request
/// construction rejects non-finite coordinates before any network call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Coordinate {
    /// Display name for the location.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// The read-only result of one fetch-and-classify cycle.
///
/// Callers receive this as a plain value: there is no shared mutable state
/// between the pipeline and whatever renders the result, so a stale fetch can
/// never scribble over a newer one.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use tide_times_lib::{Coordinate, Sample, TideKind, TideReport};
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
/// let base = now.timestamp();
/// let samples = vec![
///     Sample { dt: base - 600, height: 1.0 },
///     Sample { dt: base, height: 3.0 },
///     Sample { dt: base + 600, height: 1.0 },
/// ];
/// let location = Coordinate {
///     name: "San Francisco".into(),
///     latitude: 37.7749,
///     longitude: -122.4194,
/// };
///
/// let report = TideReport::new(location, samples, now);
/// assert_eq!(report.events[1].kind, TideKind::High);
/// assert_eq!(report.current_height, Some(3.0));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TideReport {
    /// Location the heights were fetched for.
    pub location: Coordinate,
    /// Every sample in the window, labeled high or low, in time order.
    pub events: Vec<TideEvent>,
    /// Height of the sample within tolerance of "now", if any.
    pub current_height: Option<f64>,
    /// Instant the report was produced for (the center of the window).
    pub fetched_at: DateTime<Utc>,
}

impl TideReport {
    /// Classify freshly fetched samples into a report.
    pub fn new(location: Coordinate, samples: Vec<Sample>, now: DateTime<Utc>) -> Self {
        let (events, current_height) = classify::classify(samples, now);
        Self {
            location,
            events,
            current_height,
            fetched_at: now,
        }
    }
}
