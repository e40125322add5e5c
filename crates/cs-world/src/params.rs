//! Per-category sensing parameters, replacing `realWorld.py`'s
//! `isinstance(robot.C, cls)` dispatch over a fixed `SIM_ROB` class list
//! with a lookup keyed directly on `CategoryId`.

use std::collections::HashMap;

use cs_core::CategoryId;

/// A category's sensing threshold and duration-scaling factor.
#[derive(Clone, Copy, Debug)]
pub struct CategoryParams {
    /// Minimum region condition rate this category can sense through.
    pub threshold: f64,
    /// Scales the ideal sensing duration once the condition rate is known.
    pub theta: f64,
}

/// Looks up [`CategoryParams`] by category, with an explicit registration
/// step instead of a hardcoded class enumeration.
#[derive(Default)]
pub struct CategoryParamsTable {
    params: HashMap<CategoryId, CategoryParams>,
}

impl CategoryParamsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: CategoryId, params: CategoryParams) {
        self.params.insert(category, params);
    }

    pub fn get(&self, category: CategoryId) -> Option<CategoryParams> {
        self.params.get(&category).copied()
    }
}
