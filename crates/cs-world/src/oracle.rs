//! The `WorldOracle` interface: the environment's opinion on whether an
//! agent's current region is actually sensable, and how long its current
//! leg actually takes once real-world conditions are applied to the ideal
//! plan.
//!
//! Grounded on `original_source/realWorld.py`'s `RealWorld`.

use cs_agent::Agent;
use cs_core::RegionId;

/// External collaborator interface: a pluggable model of ground truth that
/// the simulator consults while executing an agent's plan. The agent and
/// allocator only ever see *ideal* durations; the oracle is where reality
/// deviates from them.
pub trait WorldOracle {
    /// Does `region` actually satisfy `agent`'s category's sensing
    /// threshold right now?
    fn can_sense(&self, agent: &Agent, region: RegionId) -> bool;

    /// The real duration of the leg `agent` is currently executing,
    /// interpreted from its state (`Sensing` uses the in-region dwell,
    /// anything else uses the travel leg).
    fn compute_duration(&self, agent: &Agent) -> f64;

    /// Does the world now report `agent` as broken? Consulted once per
    /// event-loop step; an already-broken agent is never reported again.
    fn is_damaged(&self, agent: &Agent) -> bool;
}
