//! Shared allocator bookkeeping and the `Allocator` trait.
//!
//! Grounded on `original_source/MASys.py`'s `BaseAlgorithm`.

use std::collections::HashMap;

use cs_agent::{Agent, CategoryTable, Task};
use cs_core::{AgentId, Region, RegionId, Sensor, TaskId};
use cs_sensemap::SenseMap;

use crate::error::AllocResult;

/// Per-run allocation bookkeeping shared by every allocator variant.
///
/// `allocation_plan` and `sample_record` mirror the source's
/// `allocationPlan`/`sampleRecord`; `sample_record` is the one the γ-cap
/// invariant is checked against.
pub struct AllocationBook {
    pub allocation_plan: HashMap<(TaskId, RegionId, AgentId), u32>,
    pub sample_record: HashMap<(TaskId, RegionId), u32>,
    pub gamma: u32,
    pub kappa: f64,
    pub thetas: [f64; 3],
    pub lambdas: [f64; 3],
}

impl AllocationBook {
    /// `thetas` are normalized to sum to 1; `lambdas` is fixed to
    /// `(1, area_diagonal, 1)` per the utility's normalizer contract.
    pub fn new(gamma: u32, kappa: f64, thetas: [f64; 3], area_diagonal: f64) -> Self {
        let sum: f64 = thetas.iter().sum();
        Self {
            allocation_plan: HashMap::new(),
            sample_record: HashMap::new(),
            gamma,
            kappa,
            thetas: thetas.map(|t| t / sum),
            lambdas: [1.0, area_diagonal, 1.0],
        }
    }

    pub fn sampled(&self, task: TaskId, reg: RegionId) -> u32 {
        self.sample_record.get(&(task, reg)).copied().unwrap_or(0)
    }

    pub fn record(&mut self, task: TaskId, reg: RegionId, agent: AgentId) {
        *self.allocation_plan.entry((task, reg, agent)).or_insert(0) += 1;
        *self.sample_record.entry((task, reg)).or_insert(0) += 1;
    }

    /// Mean, over every task, of the fraction of required samples committed.
    pub fn total_coverage(&self, tasks: &[Task]) -> f64 {
        if tasks.is_empty() {
            return 0.0;
        }
        let sum: f64 = tasks
            .iter()
            .map(|task| {
                let regions = task.regions();
                if regions.is_empty() {
                    return 0.0;
                }
                let s: u32 = regions.iter().map(|&reg| self.sampled(task.id, reg)).sum();
                s as f64 / (regions.len() as f64 * self.gamma as f64)
            })
            .sum();
        sum / tasks.len() as f64
    }
}

/// Total planned travel distance summed over every agent.
pub fn robot_dis(agents: &[Agent], categories: &CategoryTable, regions: &[Region]) -> f64 {
    agents
        .iter()
        .map(|a| {
            let cat = categories
                .get(a.category)
                .expect("agent category must be registered");
            a.move_distance(cat, regions)
        })
        .sum()
}

/// Pluggable task-allocation strategy.
///
/// Implementations greedily assign subtasks to agents by `ΔUtility`
/// (weighing acquisition gain against travel cost), subject to sensor
/// adequacy, the arrival-time window, and the γ-sample cap per `(task,
/// reg)`.
pub trait Allocator {
    fn allocate(
        &self,
        tasks: &mut [Task],
        agents: &mut [Agent],
        sense_map: &SenseMap,
        categories: &CategoryTable,
        sensors: &[Sensor],
        regions: &[Region],
        book: &mut AllocationBook,
    ) -> AllocResult<()>;
}

pub(crate) fn region_by_id(regions: &[Region], id: RegionId) -> &Region {
    regions.iter().find(|r| r.id == id).expect("region id must exist in the grid")
}
