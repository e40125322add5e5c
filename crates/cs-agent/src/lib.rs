//! `cs-agent` — the agent state machine, category descriptors, and task
//! model for the crowdsense framework.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-------------------------------------------------------------|
//! | [`agent`]    | `Agent` — state machine, plan, guarded operations         |
//! | [`state`]    | `AgentState`, `StepRecord`                                |
//! | [`category`] | `AgentCategory`, `MotionMode`, `MotionProfile`, `CategoryTable` |
//! | [`task`]     | `Task`, region decomposition, begin/commit/rollback        |
//! | [`builder`]  | `AgentBuilder` (fluent construction)                       |
//! | [`error`]    | `AgentError`, `AgentResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.   |

pub mod agent;
pub mod builder;
pub mod category;
pub mod error;
pub mod state;
pub mod task;

#[cfg(test)]
mod tests;

pub use agent::Agent;
pub use builder::AgentBuilder;
pub use category::{AgentCategory, CategoryTable, MotionMode, MotionProfile};
pub use error::{AgentError, AgentResult};
pub use state::{AgentState, StepRecord};
pub use task::{SensorCandidate, Task};
