//! The agent state machine and its per-step plan record.
//!
//! Redesigned from `original_source/RobotState.py`'s cyclic
//! state-object-with-back-pointer pattern into a plain tagged enum: the
//! state no longer owns behavior, `Agent` does, guarded by a match on
//! `self.state`. `StepRecord` replaces the source's seven parallel lists
//! (`planned_path`, `finish_time`, `task_in_reg`, …) with one sequence of
//! records indexed by cursor position.

use cs_core::{RegionId, SensorId, TaskId};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    Idle,
    Moving,
    Sensing,
    Broken,
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentState::Idle => "Idle",
            AgentState::Moving => "Moving",
            AgentState::Sensing => "Sensing",
            AgentState::Broken => "Broken",
        };
        write!(f, "{s}")
    }
}

/// One planned (or completed) stop in an agent's path.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord {
    pub planned_region: RegionId,
    /// Subtasks sampled concurrently at this step.
    pub tasks: Vec<TaskId>,
    /// Sensors used in parallel at this step, aligned with `tasks` by index
    /// when assigned together, but tracked as a set of in-use sensors.
    pub sensors: Vec<SensorId>,
    /// Planned completion time; mutated to the real submit time on submit.
    pub finish_time: f64,
    pub ideal_time_used: f64,
    pub ideal_moving_time: f64,
    pub ideal_sensing_time: f64,
    /// Cumulative travel distance through this step.
    pub planned_distance: f64,
}

impl StepRecord {
    pub fn initial(region: RegionId) -> Self {
        Self {
            planned_region: region,
            tasks: Vec::new(),
            sensors: Vec::new(),
            finish_time: 0.0,
            ideal_time_used: 0.0,
            ideal_moving_time: 0.0,
            ideal_sensing_time: 0.0,
            planned_distance: 0.0,
        }
    }
}
