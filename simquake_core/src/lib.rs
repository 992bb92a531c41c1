//! SimQuake core library.
//!
//! Everything needed to produce a synthetic earthquake feed:
//! - **Geo**: kilometer-scale jitter around scenario base points
//! - **Scenarios**: named generators with scenario-appropriate ranges
//! - **Significance**: heuristic scoring + rejection sampling
//! - **Store**: the capped, newest-first JSON array on disk
//!
//! The uploader binary (`simquake_uploader`) wires these into a
//! generate-store-publish loop.

pub mod event;
pub mod geo;
pub mod scenarios;
pub mod significance;
pub mod store;

pub use event::{Candidate, Event};
pub use scenarios::{ScenarioCycle, ScenarioId};
pub use store::{LoadOutcome, StoreError};
