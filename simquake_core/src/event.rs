//! The canonical event record and the candidate → event builder.
//!
//! Historical note: two generator variants wrote different shapes
//! (`tsunami: bool` vs. `tsunamiWarning: "yes"/"no"`, `place` vs.
//! `location`). This is the canonical one; the store keeps foreign
//! elements as raw JSON so old records survive a rewrite.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One synthetic earthquake record, as written to the feed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Random identifier, `sim-NNNNNN`. Not guaranteed unique.
    pub id: String,

    /// Moment magnitude
    pub magnitude: f64,

    /// Hypocenter depth in kilometers
    pub depth: f64,

    /// Epicenter latitude in degrees
    pub lat: f64,

    /// Epicenter longitude in degrees
    pub lon: f64,

    /// Human-readable location label
    pub place: String,

    /// Origin time (UTC, serialized as ISO-8601)
    pub time: DateTime<Utc>,

    /// Tsunami-prone event
    pub tsunami: bool,
}

/// An event minus identity and timestamp: what a scenario generator emits
/// and the significance sampler scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub place: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub magnitude: f64,
    pub depth: f64,
    pub tsunami: bool,
}

impl Candidate {
    /// Stamps a fresh random identifier and the given timestamp onto the
    /// candidate, producing the final record.
    pub fn into_event<R: Rng>(self, rng: &mut R, now: DateTime<Utc>) -> Event {
        Event {
            id: rand_id(rng, "sim"),
            magnitude: self.magnitude,
            depth: self.depth,
            lat: self.lat,
            lon: self.lon,
            place: self.place.to_string(),
            time: now,
            tsunami: self.tsunami,
        }
    }
}

/// Generates a `<prefix>-NNNNNN` identifier from six random digits.
/// Collisions are possible and accepted as negligible.
pub fn rand_id<R: Rng>(rng: &mut R, prefix: &str) -> String {
    format!("{}-{:06}", prefix, rng.gen_range(0..1_000_000))
}
