//! Allocator error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllocError {
    #[error("arrival time {0} does not fall within any time slot of the cyclic horizon")]
    ArrivalTime(f64),

    #[error(transparent)]
    SenseMap(#[from] cs_sensemap::SenseMapError),

    #[error(transparent)]
    Agent(#[from] cs_agent::AgentError),
}

pub type AllocResult<T> = Result<T, AllocError>;
