//! `cs-core` — foundational types for the `crowdsense` crowd-sensing
//! simulation framework.
//!
//! This crate is a dependency of every other `cs-*` crate. It intentionally
//! has no `cs-*` dependencies and minimal external ones (`rand`,
//! `ordered-float`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `RegionId`, `TaskId`, `TimeSlotId`, …          |
//! | [`geo`]    | `Point`, `Area`, `Region`, Euclidean/Manhattan distance   |
//! | [`time`]   | `SimTime`, `TimeRange`, `TimeSlot`, cyclic containment    |
//! | [`rng`]    | `AgentRng` (per-agent), `SimRng` (scenario-level)         |
//! | [`sensor`] | `Sensor`, `SensorRegistry` (run-scoped)                   |
//! | [`config`] | `ScenarioConfig`, `UtilityWeights`                        |
//!
//! Fallible boundaries live in the downstream crates that actually have
//! them (`cs-agent::AgentError`, `cs-alloc::AllocError`, …) — every type
//! here is infallible by construction, so there is no core-level error type.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types,     |
//! |         | required by `cs-sensemap`'s prior-map dump/load.        |

pub mod config;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod sensor;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ScenarioConfig, UtilityWeights};
pub use geo::{euclidean_distance, manhattan_distance, Area, Point, Region};
pub use ids::{AgentId, CategoryId, RegionId, SensorId, TaskId, TimeSlotId};
pub use rng::{AgentRng, SimRng};
pub use sensor::{Sensor, SensorRegistry};
pub use time::{slot_containing, SimTime, TimeRange, TimeSlot};
