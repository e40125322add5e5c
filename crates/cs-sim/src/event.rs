//! The time-ordered event queue.
//!
//! Grounded on `original_source/simulation.py`'s `Simulator`, which drives a
//! `queue.PriorityQueue` of `Event(time, robot, action)` namedtuples and a
//! `physicalRobot` coroutine that yields alternating move/sense events.
//! Re-architected as a `BinaryHeap` keyed on `(time, insertion order)`, the
//! same min-heap-via-`Reverse` idiom the teacher's Dijkstra router uses, with
//! an explicit sequence counter standing in for the coroutine's implicit
//! FIFO-per-time ordering.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use cs_core::AgentId;
use ordered_float::OrderedFloat;

/// A scheduled wake-up for an agent.
///
/// `duration` is the real elapsed time that produced this event — the value
/// the world oracle returned when the event was scheduled — carried along so
/// the handler doesn't need to re-derive it from agent state.
#[derive(Clone, Copy, Debug)]
pub struct Event {
    pub time: f64,
    pub agent: AgentId,
    pub duration: f64,
    pub init: bool,
}

#[derive(Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<(OrderedFloat<f64>, u64, AgentId, OrderedFloat<f64>, bool)>>,
    seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse((
            OrderedFloat(event.time),
            seq,
            event.agent,
            OrderedFloat(event.duration),
            event.init,
        )));
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse((time, _, agent, duration, init))| Event {
            time: time.0,
            agent,
            duration: duration.0,
            init,
        })
    }

    /// Removes every queued event belonging to the given agents. Callers
    /// must exclude agents currently sensing before calling this — hot
    /// repair does not preempt an active sample.
    pub fn purge(&mut self, agents: &[AgentId]) {
        self.heap = self
            .heap
            .drain()
            .filter(|Reverse((_, _, agent, _, _))| !agents.contains(agent))
            .collect();
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
