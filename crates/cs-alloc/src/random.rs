//! Baseline allocator: picks a residual subtask uniformly, shuffles the
//! agent list, and commits the first feasible candidate.
//!
//! Grounded on `original_source/MASys.py`'s `RandomAlgorithm`.

use std::cell::RefCell;
use std::collections::HashMap;

use cs_agent::{Agent, CategoryTable, Task};
use cs_core::{Region, RegionId, Sensor, SimRng};
use cs_sensemap::SenseMap;

use crate::error::AllocResult;
use crate::model::{region_by_id, Allocator, AllocationBook};

pub struct Random {
    rng: RefCell<SimRng>,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(SimRng::new(seed)),
        }
    }
}

impl Allocator for Random {
    fn allocate(
        &self,
        tasks: &mut [Task],
        agents: &mut [Agent],
        _sense_map: &SenseMap,
        categories: &CategoryTable,
        sensors: &[Sensor],
        regions: &[Region],
        book: &mut AllocationBook,
    ) -> AllocResult<()> {
        let mut subtasks: HashMap<(usize, RegionId), u32> = HashMap::new();
        for (ti, task) in tasks.iter().enumerate() {
            if task.is_finished() || !task.is_alive() {
                continue;
            }
            for &reg in task.regions() {
                let residual = book.gamma.saturating_sub(book.sampled(task.id, reg));
                if residual > 0 {
                    subtasks.insert((ti, reg), residual);
                }
            }
        }

        let mut rng = self.rng.borrow_mut();
        while !subtasks.is_empty() {
            let keys: Vec<(usize, RegionId)> = subtasks.keys().copied().collect();
            let key = keys[rng.gen_range(0..keys.len())];
            let count = *subtasks.get(&key).expect("key just sampled from this map");

            if count == 0 {
                subtasks.remove(&key);
                continue;
            }
            subtasks.insert(key, count - 1);
            let (ti, reg_id) = key;

            let mut order: Vec<usize> = (0..agents.len()).collect();
            rng.shuffle(&mut order);

            let mut assigned = false;
            for &ai in &order {
                let category = categories
                    .get(agents[ai].category)
                    .expect("agent category must be registered");
                let region = region_by_id(regions, reg_id);
                let plan = agents[ai].possible_plan(region, &tasks[ti], category, sensors, regions);
                let Some(&(finish_time, sensor)) =
                    plan.iter().min_by(|a, b| a.0.partial_cmp(&b.0).unwrap())
                else {
                    continue;
                };
                if !tasks[ti].time_range.contains(finish_time) {
                    continue;
                }
                agents[ai].assign_task(region, tasks[ti].id, sensor, category, regions)?;
                tasks[ti].begin(reg_id)?;
                book.record(tasks[ti].id, reg_id, agents[ai].id);
                assigned = true;
                break;
            }
            if !assigned {
                log::warn!(
                    "no agent can serve task {:?} region {:?}, dropping the subtask",
                    tasks[ti].id,
                    reg_id
                );
                subtasks.remove(&key);
            }
        }
        Ok(())
    }
}
