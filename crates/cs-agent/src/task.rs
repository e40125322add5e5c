//! Tasks, their region decomposition, and the begin/commit/rollback
//! transaction protocol guarding subtask sample counters.
//!
//! Grounded on `original_source/task.py`'s `Task` and `MASys.py`'s
//! `__decomposeTask`/`__execMissions`.

use std::collections::HashMap;

use cs_core::{Region, RegionId, Sensor, SensorId, TaskId, TimeRange};

use crate::error::{AgentError, AgentResult};

/// A sensing job published over an area and time window, decomposed at
/// publish time into per-region subtasks each requiring `gamma` samples.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub id: TaskId,
    /// Sensor category tag required to sample this task (e.g. `"camera"`),
    /// matched against `Sensor::category`.
    pub required_category: String,
    pub required_accuracy: f64,
    pub time_range: TimeRange,

    /// Ordered set of regions covered by this task — `region.center ∈ area`.
    tr: Vec<RegionId>,
    /// Remaining samples required per region, initialized to `gamma`.
    remaining: HashMap<RegionId, u32>,
    alive: bool,
}

impl Task {
    /// Constructs an undecomposed task; call [`Task::decompose`] before use.
    pub fn new(
        id: TaskId,
        required_category: impl Into<String>,
        required_accuracy: f64,
        time_range: TimeRange,
    ) -> Self {
        Self {
            id,
            required_category: required_category.into(),
            required_accuracy,
            time_range,
            tr: Vec::new(),
            remaining: HashMap::new(),
            alive: true,
        }
    }

    /// Decomposes into TR = regions whose center lies inside the task area,
    /// sorted by region id, each counter initialized to `gamma`.
    ///
    /// # Panics
    /// Panics if called more than once (mirrors the source's `assert not
    /// task.TR`).
    pub fn decompose(&mut self, regions_in_area: &[Region], gamma: u32) {
        assert!(self.tr.is_empty(), "task already decomposed");
        let mut ids: Vec<RegionId> = regions_in_area.iter().map(|r| r.id).collect();
        ids.sort();
        self.remaining = ids.iter().map(|&id| (id, gamma)).collect();
        self.tr = ids;
    }

    pub fn regions(&self) -> &[RegionId] {
        &self.tr
    }

    pub fn remaining(&self, reg: RegionId) -> u32 {
        self.remaining.get(&reg).copied().unwrap_or(0)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_finished(&self) -> bool {
        self.remaining.values().all(|&c| c == 0)
    }

    /// Fraction of required samples collected, in `[0, 1]`.
    pub fn coverage(&self, gamma: u32) -> f64 {
        if self.tr.is_empty() {
            return 0.0;
        }
        let collected: u32 = self
            .remaining
            .values()
            .map(|&rem| gamma.saturating_sub(rem))
            .sum();
        collected as f64 / (self.tr.len() as f64 * gamma as f64)
    }

    pub fn sensor_adequate(&self, sensor: &Sensor) -> bool {
        sensor.adequate_for(&self.required_category, self.required_accuracy)
    }

    /// *begin* — decrements `remaining[reg]`. Fatal protocol violation if the
    /// subtask was already fully satisfied.
    pub fn begin(&mut self, reg: RegionId) -> AgentResult<()> {
        let counter = self
            .remaining
            .get_mut(&reg)
            .ok_or(AgentError::UnknownRegion(reg))?;
        if *counter == 0 {
            return Err(AgentError::StateViolation(format!(
                "task {:?} region {:?} already fully satisfied",
                self.id, reg
            )));
        }
        *counter -= 1;
        Ok(())
    }

    /// *commit* — if `submit_time` falls outside the time range, rolls back
    /// the decrement (discarding the sample) and marks `alive=false` if the
    /// time has passed the task's end; the caller should log this as
    /// overtime.
    pub fn commit(&mut self, reg: RegionId, submit_time: f64) -> AgentResult<bool> {
        if self.time_range.contains(submit_time) {
            Ok(true)
        } else {
            self.rollback(reg)?;
            if submit_time >= self.time_range.e {
                self.alive = false;
            }
            Ok(false)
        }
    }

    /// *rollback* — undoes a pending decrement without crediting the sample.
    pub fn rollback(&mut self, reg: RegionId) -> AgentResult<()> {
        let counter = self
            .remaining
            .get_mut(&reg)
            .ok_or(AgentError::UnknownRegion(reg))?;
        *counter += 1;
        Ok(())
    }

    pub fn expire_if_past(&mut self, now: f64) {
        if now >= self.time_range.e {
            self.alive = false;
        }
    }
}

/// An adequate-sensor candidate used by allocators: the sensor id plus the
/// time it would finish the sample if assigned.
#[derive(Clone, Copy, Debug)]
pub struct SensorCandidate {
    pub sensor: SensorId,
    pub finish_time: f64,
}
