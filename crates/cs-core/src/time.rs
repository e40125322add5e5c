//! Cyclic, continuous-valued time model.
//!
//! # Design
//!
//! Simulated time is a real number (`SimTime`, wrapping `f64`) rather than an
//! integer tick counter — the event heap in `cs-sim` is keyed by exact
//! event-completion times computed from travel/sensing durations, which do
//! not fall on any fixed grid. This departs from the teacher's `Tick(u64)`
//! fixed-resolution model; `OrderedFloat` supplies the total `Ord` a
//! `BinaryHeap` key needs that raw `f64` lacks.
//!
//! A `TimeRange` is the active window of a task; it can be discretized into
//! a sequence of `TimeSlot`s, each a half-open interval whose containment
//! test is modular over the horizon length (`TimeCycle`), so "time slot 0"
//! recurs every cycle.

use ordered_float::OrderedFloat;
use std::fmt;

use crate::ids::TimeSlotId;

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute point in simulated real time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub OrderedFloat<f64>);

impl SimTime {
    pub const ZERO: SimTime = SimTime(OrderedFloat(0.0));

    #[inline]
    pub fn new(t: f64) -> Self {
        SimTime(OrderedFloat(t))
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0.into_inner()
    }

    /// Position of this time within a cyclic horizon of length `cycle_len`.
    #[inline]
    pub fn modulo(self, cycle_len: f64) -> f64 {
        self.get().rem_euclid(cycle_len)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime::new(self.get() + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.get() - rhs.get()
    }
}

impl From<f64> for SimTime {
    fn from(t: f64) -> Self {
        SimTime::new(t)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.4}", self.get())
    }
}

// ── TimeRange / TimeSlot ─────────────────────────────────────────────────────

/// A half-open real interval `[s, e)`, non-cyclic.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeRange {
    pub s: f64,
    pub e: f64,
}

impl TimeRange {
    pub fn new(s: f64, e: f64) -> Self {
        assert!(s < e, "time range must be non-empty");
        Self { s, e }
    }

    #[inline]
    pub fn len(&self) -> f64 {
        self.e - self.s
    }

    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        self.s <= t && t < self.e
    }

    /// Split `self` into consecutive `TimeSlot`s of width `granularity`.
    ///
    /// # Panics
    /// Panics if `granularity` does not evenly divide the range length.
    pub fn discretize(&self, granularity: f64) -> Vec<TimeSlot> {
        assert!(
            (self.len() / granularity).fract().abs() < 1e-9,
            "granularity must evenly divide the time range"
        );
        let n = (self.len() / granularity).round() as u16;
        (0..n)
            .map(|i| {
                TimeSlot::new(
                    TimeSlotId(i),
                    self.s + i as f64 * granularity,
                    self.s + (i + 1) as f64 * granularity,
                )
            })
            .collect()
    }
}

/// A named half-open interval within a cyclic horizon.
///
/// Containment is modular: `contains(t, cycle_len)` tests
/// `s <= (t mod cycle_len) < e`, so the same slot recurs every cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub s: f64,
    pub e: f64,
}

impl TimeSlot {
    pub fn new(id: TimeSlotId, s: f64, e: f64) -> Self {
        Self { id, s, e }
    }

    #[inline]
    pub fn len(&self) -> f64 {
        self.e - self.s
    }

    /// Cyclic containment of a real time `t` within a horizon of `cycle_len`.
    #[inline]
    pub fn contains_cyclic(&self, t: f64, cycle_len: f64) -> bool {
        let tm = t.rem_euclid(cycle_len);
        self.s <= tm && tm < self.e
    }

    /// Cyclic minimum distance between two slot ids out of `n` total slots.
    pub fn cyclic_dist(self_id: TimeSlotId, other_id: TimeSlotId, n: u16) -> u16 {
        let diff = (self_id.0 as i32 - other_id.0 as i32).unsigned_abs() as u16;
        diff.min(n - diff)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeSlot({}, [{}, {}))", self.id, self.s, self.e)
    }
}

/// Finds the slot (among `slots`, covering one cycle) containing real time
/// `t`, modulo the horizon length.
pub fn slot_containing(slots: &[TimeSlot], t: f64, cycle_len: f64) -> Option<&TimeSlot> {
    slots.iter().find(|ts| ts.contains_cyclic(t, cycle_len))
}
