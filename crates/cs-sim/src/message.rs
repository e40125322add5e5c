//! The outcome messages the simulator reports to the controller, and the
//! feedback the controller hands back.
//!
//! Grounded on `original_source/message.py`'s `Message` class, collapsed
//! from a numeric `status_code` into a tagged enum.

use cs_core::{AgentId, RegionId};

/// An outcome reported by the simulator as it drives an agent through its
/// plan. Carries enough context for the controller to update the sense-map
/// and decide whether self-repair is warranted.
#[derive(Clone, Copy, Debug)]
pub enum Message {
    /// The agent submitted a sample and every subtask at that step
    /// committed within its task's time window. `duration` is the real
    /// elapsed sensing time the world reported for this leg.
    SubmitOk {
        agent: AgentId,
        region: RegionId,
        time: f64,
        duration: f64,
    },
    /// The agent submitted a sample but at least one subtask rolled back
    /// because the submission fell outside its task's time window.
    PlanInfeasible {
        agent: AgentId,
        region: RegionId,
        time: f64,
        duration: f64,
    },
    /// The agent arrived at its targeted region but the world reports the
    /// region is not currently sensable for its category.
    CannotSense {
        agent: AgentId,
        region: RegionId,
        time: f64,
    },
    /// The world reports the agent is now broken. No observation occurred;
    /// the agent is removed from further allocation and its unfinished
    /// subtasks fold into the repair pool.
    Damaged {
        agent: AgentId,
        region: RegionId,
        time: f64,
    },
}

impl Message {
    pub fn agent(&self) -> AgentId {
        match *self {
            Message::SubmitOk { agent, .. }
            | Message::PlanInfeasible { agent, .. }
            | Message::CannotSense { agent, .. }
            | Message::Damaged { agent, .. } => agent,
        }
    }

    pub fn region(&self) -> RegionId {
        match *self {
            Message::SubmitOk { region, .. }
            | Message::PlanInfeasible { region, .. }
            | Message::CannotSense { region, .. }
            | Message::Damaged { region, .. } => region,
        }
    }

    pub fn time(&self) -> f64 {
        match *self {
            Message::SubmitOk { time, .. }
            | Message::PlanInfeasible { time, .. }
            | Message::CannotSense { time, .. }
            | Message::Damaged { time, .. } => time,
        }
    }

    /// Real elapsed sensing duration, `0.0` for `CannotSense`/`Damaged`
    /// (nothing was sensed).
    pub fn duration(&self) -> f64 {
        match *self {
            Message::SubmitOk { duration, .. } | Message::PlanInfeasible { duration, .. } => duration,
            Message::CannotSense { .. } | Message::Damaged { .. } => 0.0,
        }
    }

    pub fn is_submit_ok(&self) -> bool {
        matches!(self, Message::SubmitOk { .. })
    }

    pub fn is_fatal_sense(&self) -> bool {
        matches!(self, Message::CannotSense { .. })
    }

    pub fn is_damaged(&self) -> bool {
        matches!(self, Message::Damaged { .. })
    }
}

/// The controller's reply, interpreted by the simulator's event loop.
#[derive(Clone, Debug)]
pub enum Feedback {
    /// Schedule the agent's next event as usual.
    Continue,
    /// Self-repair triggered: cancel and reschedule every listed agent that
    /// is not currently sensing.
    Repair { agents: Vec<AgentId> },
    /// Advance the reporting agent past its current sensing target without
    /// crediting a sample (self-repair disabled, fatal sense failure).
    SkipSample,
}
