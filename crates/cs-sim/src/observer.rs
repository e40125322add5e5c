//! Simulation observer trait for progress reporting and data collection.

use cs_agent::Agent;

use crate::event::Event;

/// Callbacks invoked by [`Simulator::run`][crate::Simulator::run] at key
/// points in the event loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called for every event popped off the heap, before it is handled.
    fn on_event(&mut self, _event: &Event) {}

    /// Called once after the heap empties or the horizon is exceeded.
    fn on_sim_end(&mut self, _agents: &[Agent]) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
