//! Sense-map error type.

use cs_core::{CategoryId, RegionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SenseMapError {
    #[error("region {0} not found in the sense-map's grid")]
    UnknownRegion(RegionId),

    #[error("category {0} not found in the category table")]
    UnknownCategory(CategoryId),

    #[error("real time {0} does not fall within any time slot of the cyclic horizon")]
    TimeOutOfRange(f64),

    #[error("prior snapshot is malformed: {0}")]
    Snapshot(String),
}

pub type SenseMapResult<T> = Result<T, SenseMapError>;
