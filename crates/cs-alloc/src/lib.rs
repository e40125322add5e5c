//! `cs-alloc` — greedy utility-driven task allocators for the crowdsense
//! framework.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                 |
//! |-------------------|----------------------------------------------------------|
//! | [`model`]         | `Allocator` trait, `AllocationBook` bookkeeping           |
//! | [`utility`]       | `delta_utility` — the shared greedy objective             |
//! | [`task_oriented`] | `TaskOriented` — region-first, per-task argmax             |
//! | [`robot_oriented`]| `RobotOriented` — global greedy with incremental rescoring |
//! | [`random`]        | `Random` — shuffled-agent baseline                         |
//! | [`error`]         | `AllocError`, `AllocResult<T>`                             |

pub mod error;
pub mod model;
pub mod random;
pub mod robot_oriented;
pub mod task_oriented;
pub mod utility;


pub use error::{AllocError, AllocResult};
pub use model::{Allocator, AllocationBook};
pub use random::Random;
pub use robot_oriented::RobotOriented;
pub use task_oriented::TaskOriented;
pub use utility::delta_utility;
