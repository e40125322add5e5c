//! World-oracle error type.

use cs_core::{CategoryId, RegionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("region {0} has no registered condition")]
    UnknownRegion(RegionId),

    #[error("category {0} has no registered sensing parameters")]
    UnknownCategory(CategoryId),
}

pub type WorldResult<T> = Result<T, WorldError>;
