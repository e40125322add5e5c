//! Per-crate error type, following the teacher's per-crate `thiserror` split.

use cs_core::RegionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("state machine violation: {0}")]
    StateViolation(String),

    #[error("unknown region {0}")]
    UnknownRegion(RegionId),

    #[error("operation not valid in current agent state: {0}")]
    WrongState(&'static str),

    #[error("submit at {submit_time} is past task window, overtime discarded")]
    Overtime { submit_time: f64 },
}

pub type AgentResult<T> = Result<T, AgentError>;
