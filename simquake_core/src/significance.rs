//! Significance scoring and rejection sampling.
//!
//! A candidate's significance combines magnitude (cubed), proximity to a
//! fixed reference point, and a tsunami bonus. The sampler retries rejected
//! candidates with a bounded budget and falls back to a fixed
//! guaranteed-to-pass event, so a cycle always terminates.

use crate::event::Candidate;
use crate::geo::haversine_km;
use crate::scenarios::ScenarioId;
use rand::Rng;

/// Reference point for distance scoring: Bangkok.
pub const REFERENCE_LAT: f64 = 13.7563;
pub const REFERENCE_LON: f64 = 100.5018;

/// Default acceptance threshold.
pub const DEFAULT_TARGET: f64 = 230.0;

/// Default retry budget before the sampler gives up on randomness.
pub const DEFAULT_MAX_TRIES: u32 = 12;

const MAG_WEIGHT: f64 = 1.05;
const DIST_WEIGHT: f64 = 35.0;
const TSUNAMI_BONUS: f64 = 120.0;
const MAG_CAP: f64 = 9.5;

/// `magnitude³ · 1.05 − 35 · log10(dist_km + 1) + tsunami bonus`
pub fn heuristic_significance(magnitude: f64, dist_km: f64, tsunami: bool) -> f64 {
    let mag_term = magnitude.powi(3) * MAG_WEIGHT;
    let dist_term = -DIST_WEIGHT * (dist_km + 1.0).log10();
    let bonus = if tsunami { TSUNAMI_BONUS } else { 0.0 };
    mag_term + dist_term + bonus
}

/// Scores a candidate against the fixed reference point.
pub fn score(candidate: &Candidate) -> f64 {
    let dist_km = haversine_km(candidate.lat, candidate.lon, REFERENCE_LAT, REFERENCE_LON);
    heuristic_significance(candidate.magnitude, dist_km, candidate.tsunami)
}

/// Fixed escape-hatch candidate: an Andaman M8.4 tsunami event whose score
/// (~640) comfortably clears [`DEFAULT_TARGET`].
pub fn fallback_candidate() -> Candidate {
    Candidate {
        place: "Simulated (Andaman Sea)",
        lat: 8.2,
        lon: 97.2,
        magnitude: 8.4,
        depth: 12.0,
        tsunami: true,
    }
}

/// Rejection sampling with a deterministic escape hatch.
///
/// Generates one candidate from `scenario`, accepts it if its score reaches
/// `target`, and otherwise nudges it toward acceptance and retries. After
/// `max_tries` attempts the fixed fallback candidate is returned, so this
/// terminates in bounded time for any `target` and `max_tries >= 1`.
pub fn sample_matched<R: Rng>(
    rng: &mut R,
    scenario: ScenarioId,
    target: f64,
    max_tries: u32,
) -> Candidate {
    let mut candidate = scenario.generate(rng);

    for _ in 0..max_tries.max(1) {
        if score(&candidate) >= target {
            return candidate;
        }
        candidate = nudge(candidate);
    }

    fallback_candidate()
}

/// Moves a rejected candidate toward acceptance: slightly stronger, a
/// quarter of the way closer to the reference point.
fn nudge(mut candidate: Candidate) -> Candidate {
    candidate.magnitude = ((candidate.magnitude + 0.2) * 10.0).round() / 10.0;
    candidate.magnitude = candidate.magnitude.min(MAG_CAP);
    candidate.lat += (REFERENCE_LAT - candidate.lat) * 0.25;
    candidate.lon += (REFERENCE_LON - candidate.lon) * 0.25;
    candidate
}
