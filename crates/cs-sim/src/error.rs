use cs_agent::AgentError;
use cs_alloc::AllocError;
use cs_sensemap::SenseMapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("agent {0:?} is not registered with the simulator")]
    UnknownAgent(cs_core::AgentId),

    #[error("task {0:?} is not registered with the controller")]
    UnknownTask(cs_core::TaskId),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error(transparent)]
    SenseMap(#[from] SenseMapError),
}

pub type SimResult<T> = Result<T, SimError>;
