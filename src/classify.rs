//! # High/Low Water Classification
//!
//! Turns a decoded sample window into labeled tide events and picks out the
//! height of the sample nearest the present moment. Pure and synchronous:
//! everything here operates on in-memory data produced by
//! [`worldtides`](crate::worldtides).
//!
//! ## Heuristic
//!
//! Every sample is compared against its immediate neighbors:
//!
//! - strictly greater than both → [`TideKind::High`]
//! - anything else → [`TideKind::Low`]
//!
//! That second bucket deliberately lumps together local minima, monotonic
//! points and plateaus; the chart only needs crests flagged. The first and
//! last samples of the window have a single neighbor and are always labeled
//! low, even when the curve is still rising or falling through the window
//! edge.
//!
//! The service returns samples in chronological order, but the neighbor
//! comparison is only meaningful if that actually holds, so the input is
//! sorted here before labeling rather than trusted.

use crate::{Sample, TideEvent, TideKind};
use chrono::{DateTime, Utc};

/// Half-width of the "current height" match window, in seconds.
///
/// A sample counts as "now" when its timestamp is strictly within this many
/// seconds of the present moment.
pub const CURRENT_TOLERANCE_SECS: i64 = 300;

/// Label every sample as high or low water and pick the current height.
///
/// Returns the labeled events in chronological order together with the height
/// of the first event within [`CURRENT_TOLERANCE_SECS`] of `now`, or `None`
/// when no sample is close enough. An empty input yields an empty event list
/// and no current height; that is not an error.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use tide_times_lib::classify::classify;
/// use tide_times_lib::{Sample, TideKind};
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
/// let base = now.timestamp();
/// let samples = vec![
///     Sample { dt: base - 600, height: 0.8 },
///     Sample { dt: base, height: 2.1 },
///     Sample { dt: base + 600, height: 0.9 },
/// ];
///
/// let (events, current) = classify(samples, now);
/// assert_eq!(events[1].kind, TideKind::High);
/// assert_eq!(current, Some(2.1));
/// ```
pub fn classify(mut samples: Vec<Sample>, now: DateTime<Utc>) -> (Vec<TideEvent>, Option<f64>) {
    // Stable, so duplicate timestamps keep their arrival order and the
    // first-match rule below stays deterministic.
    samples.sort_by_key(|sample| sample.dt);

    let events: Vec<TideEvent> = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| TideEvent {
            height: sample.height,
            time: sample.time(),
            kind: kind_at(&samples, index),
        })
        .collect();

    let current = current_height(&events, now);
    (events, current)
}

/// Label for the sample at `index`: a strict local maximum is high water,
/// everything else (boundaries included) is low.
fn kind_at(samples: &[Sample], index: usize) -> TideKind {
    if index == 0 || index + 1 == samples.len() {
        return TideKind::Low;
    }
    let height = samples[index].height;
    if height > samples[index - 1].height && height > samples[index + 1].height {
        TideKind::High
    } else {
        TideKind::Low
    }
}

/// Height of the first event in sequence order whose timestamp falls strictly
/// within the tolerance of `now`.
fn current_height(events: &[TideEvent], now: DateTime<Utc>) -> Option<f64> {
    events
        .iter()
        .find(|event| (event.time - now).num_seconds().abs() < CURRENT_TOLERANCE_SECS)
        .map(|event| event.height)
}
