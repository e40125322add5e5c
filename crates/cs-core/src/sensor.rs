//! Sensor descriptors and the run-scoped sensor registry.
//!
//! The source keeps sensor ids in a process-wide class variable
//! (`Sensor.SC`), so two unrelated scenarios built in the same process could
//! collide. Per the redesign note in §9, ids are instead handed out by a
//! `SensorRegistry` owned by whichever scenario builder constructs the run.

use std::collections::HashSet;

use crate::ids::SensorId;

/// An immutable sensor descriptor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sensor {
    pub id: SensorId,
    pub category: String,
    pub accuracy: f64,
    pub range: f64,
}

impl Sensor {
    /// Does this sensor satisfy a task's required-sensor template?
    pub fn adequate_for(&self, required_category: &str, required_accuracy: f64) -> bool {
        self.category == required_category && self.accuracy >= required_accuracy
    }
}

/// Hands out sensor ids scoped to one simulation run.
#[derive(Default)]
pub struct SensorRegistry {
    next_id: u32,
    issued: HashSet<SensorId>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new sensor, assigning it the next unused id in this run.
    pub fn register(&mut self, category: impl Into<String>, accuracy: f64, range: f64) -> Sensor {
        let id = SensorId(self.next_id);
        self.next_id += 1;
        self.issued.insert(id);
        Sensor {
            id,
            category: category.into(),
            accuracy,
            range,
        }
    }

    pub fn contains(&self, id: SensorId) -> bool {
        self.issued.contains(&id)
    }
}
