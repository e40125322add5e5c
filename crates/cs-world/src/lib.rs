//! `cs-world` — the world-oracle interface the simulator consults for
//! ground truth: whether an agent's current region is actually sensable,
//! and how long its current leg actually takes.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|------------------------------------------------------------|
//! | [`oracle`]  | `WorldOracle` trait                                        |
//! | [`params`]  | `CategoryParams`, `CategoryParamsTable`                    |
//! | [`reference`] | `ReferenceWorld` — a deterministic default implementation |
//! | [`error`]   | `WorldError`, `WorldResult<T>`                             |

pub mod error;
pub mod oracle;
pub mod params;
pub mod reference;


pub use error::{WorldError, WorldResult};
pub use oracle::WorldOracle;
pub use params::{CategoryParams, CategoryParamsTable};
pub use reference::ReferenceWorld;
