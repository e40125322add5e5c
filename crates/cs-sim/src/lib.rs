//! `cs-sim` — the discrete-event simulator and self-repair controller for
//! the crowdsense framework.
//!
//! # Event loop
//!
//! ```text
//! pop the earliest (time, agent) event from the heap:
//!   isDamaged?    → yes: broken(), Message::Damaged → controller → feedback
//!   init          → execute() the agent's first step, schedule its next event
//!   Moving        → canSense? yes: sense(), schedule next
//!                            no:  Message::CannotSense → controller → feedback
//!   Sensing       → commit subtasks, submitTask(), Message::{SubmitOk,PlanInfeasible}
//!                   → controller → feedback
//! feedback:
//!   Continue      → schedule the agent's next event via the world oracle's duration
//!   Repair        → purge + reseed events for the repaired agents (not currently sensing)
//!   SkipSample    → roll back the in-progress subtasks, advance past them uncredited
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|------------------------------------------------------------|
//! | [`event`]     | `Event`, `EventQueue` — the time-ordered heap            |
//! | [`message`]   | `Message`, `Feedback`                                     |
//! | [`controller`]| `Controller` — sense-map, tasks, allocator, self-repair   |
//! | [`simulator`] | `Simulator` — owns the agents and drives the event loop   |
//! | [`observer`]  | `SimObserver`, `NoopObserver`                              |
//! | [`error`]     | `SimError`, `SimResult<T>`                                 |

pub mod controller;
pub mod error;
pub mod event;
pub mod message;
pub mod observer;
pub mod simulator;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use error::{SimError, SimResult};
pub use event::{Event, EventQueue};
pub use message::{Feedback, Message};
pub use observer::{NoopObserver, SimObserver};
pub use simulator::Simulator;
