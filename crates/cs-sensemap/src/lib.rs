//! `cs-sensemap` — the Gaussian-process sense-map: Matern-5/2 kernel over a
//! normalized composite distance, online posterior update, and cycle
//! rollover for the crowdsense framework.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|---------------------------------------------------------------|
//! | [`kernel`] | `MapPoint`, `MaternKernel` (memoized composite distance)     |
//! | [`gp`]     | `nalgebra`-backed Gaussian-process posterior computation     |
//! | [`map`]    | `SenseMap` — the materialized belief tensor + update cycle   |
//! | [`error`]  | `SenseMapError`, `SenseMapResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod gp;
pub mod kernel;
pub mod map;


pub use error::{SenseMapError, SenseMapResult};
pub use kernel::{MapPoint, MaternKernel};
pub use map::SenseMap;
