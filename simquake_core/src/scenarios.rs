//! Named scenario generators for synthetic events.

use crate::event::Candidate;
use crate::geo::jitter_deg;
use rand::Rng;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Strong shallow quake in inland Thailand
    Inland,

    /// Tsunami-prone undersea quake in the Andaman Sea
    Andaman,

    /// Major quake far away in the NW Pacific
    FarBig,
}

/// Generation parameters for one scenario.
struct Profile {
    place: &'static str,
    base_lat: f64,
    base_lon: f64,
    jitter_km: f64,
    magnitude: (f64, f64),
    depth: (f64, f64),
    tsunami: bool,
}

impl ScenarioId {
    /// Returns a list of all scenarios, in round-robin order.
    pub fn all() -> Vec<ScenarioId> {
        vec![ScenarioId::Inland, ScenarioId::Andaman, ScenarioId::FarBig]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Inland => "inland",
            ScenarioId::Andaman => "andaman",
            ScenarioId::FarBig => "far_big",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Inland => "M7.3-8.2 shallow quake near central Thailand",
            ScenarioId::Andaman => "M7.4-8.6 undersea quake, Andaman Sea, tsunami-prone",
            ScenarioId::FarBig => "M7.8-8.6 distant major quake, NW Pacific",
        }
    }

    fn profile(&self) -> Profile {
        match self {
            ScenarioId::Inland => Profile {
                place: "Simulated (Inland Thailand)",
                base_lat: 15.5,
                base_lon: 101.8,
                jitter_km: 150.0,
                magnitude: (7.3, 8.2),
                depth: (8.0, 28.0),
                tsunami: false,
            },
            ScenarioId::Andaman => Profile {
                place: "Simulated (Andaman Sea)",
                base_lat: 8.2,
                base_lon: 97.2,
                jitter_km: 160.0,
                magnitude: (7.4, 8.6),
                depth: (8.0, 30.0),
                tsunami: true,
            },
            ScenarioId::FarBig => Profile {
                place: "Simulated (NW Pacific, far)",
                base_lat: 38.3,
                base_lon: 142.4,
                jitter_km: 200.0,
                magnitude: (7.8, 8.6),
                depth: (10.0, 40.0),
                tsunami: false,
            },
        }
    }

    /// Generates one candidate with scenario-appropriate ranges, jittered
    /// around the base location.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Candidate {
        let p = self.profile();
        let (dlat, dlon) = jitter_deg(rng, p.base_lat, p.jitter_km, p.jitter_km);

        Candidate {
            place: p.place,
            lat: round4(p.base_lat + dlat).clamp(-90.0, 90.0),
            lon: round4(p.base_lon + dlon).clamp(-180.0, 180.0),
            magnitude: round1(rng.gen_range(p.magnitude.0..p.magnitude.1)),
            depth: round1(rng.gen_range(p.depth.0..p.depth.1)),
            tsunami: p.tsunami,
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inland" | "inland_thailand" => Ok(ScenarioId::Inland),
            "andaman" | "tsunami" => Ok(ScenarioId::Andaman),
            "far_big" | "farbig" | "far" => Ok(ScenarioId::FarBig),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

/// Round-robin scenario selection with a forced tsunami share.
///
/// Each draw first rolls against `tsunami_ratio`; on a hit the tsunami-prone
/// scenario is selected and the round-robin cursor is left untouched.
pub struct ScenarioCycle {
    cursor: usize,
    tsunami_ratio: f64,
}

impl ScenarioCycle {
    pub fn new(tsunami_ratio: f64) -> Self {
        Self {
            cursor: 0,
            tsunami_ratio: tsunami_ratio.clamp(0.0, 1.0),
        }
    }

    /// Selects the scenario for the next cycle.
    pub fn next<R: Rng>(&mut self, rng: &mut R) -> ScenarioId {
        if rng.gen::<f64>() < self.tsunami_ratio {
            return ScenarioId::Andaman;
        }
        let all = ScenarioId::all();
        let id = all[self.cursor % all.len()];
        self.cursor += 1;
        id
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}
