//! Region-first greedy allocation: for every region, assign each subtask
//! present there to the agent maximizing `ΔUtility` among feasible
//! candidates.
//!
//! Grounded on `original_source/MASys.py`'s `TaskOrientAlgorithm`.

use std::collections::HashMap;

use cs_agent::{Agent, CategoryTable, Task};
use cs_core::{Region, RegionId, Sensor, SensorId, TimeSlot};
use cs_sensemap::SenseMap;

use crate::error::AllocResult;
use crate::model::{region_by_id, Allocator, AllocationBook};
use crate::utility::delta_utility;

pub struct TaskOriented {
    pub time_slots: Vec<TimeSlot>,
    pub time_cycle_length: f64,
}

impl Allocator for TaskOriented {
    fn allocate(
        &self,
        tasks: &mut [Task],
        agents: &mut [Agent],
        sense_map: &SenseMap,
        categories: &CategoryTable,
        sensors: &[Sensor],
        regions: &[Region],
        book: &mut AllocationBook,
    ) -> AllocResult<()> {
        let mut task_in_reg: HashMap<RegionId, Vec<usize>> = HashMap::new();
        for (ti, task) in tasks.iter().enumerate() {
            if task.is_finished() || !task.is_alive() {
                continue;
            }
            for &reg in task.regions() {
                if task.remaining(reg) > 0 {
                    task_in_reg.entry(reg).or_default().push(ti);
                }
            }
        }

        for (reg_id, task_idxs) in task_in_reg {
            let region = region_by_id(regions, reg_id);
            for ti in task_idxs {
                if book.sampled(tasks[ti].id, reg_id) >= book.gamma {
                    continue;
                }

                let mut best: Option<(f64, usize, SensorId)> = None;
                for (ai, agent) in agents.iter().enumerate() {
                    let category = categories
                        .get(agent.category)
                        .expect("agent category must be registered");
                    let plan = agent.possible_plan(region, &tasks[ti], category, sensors, regions);
                    let Some(&(finish_time, sensor)) =
                        plan.iter().min_by(|a, b| a.0.partial_cmp(&b.0).unwrap())
                    else {
                        continue;
                    };
                    if !tasks[ti].time_range.contains(finish_time) {
                        continue;
                    }
                    let u = delta_utility(
                        book,
                        agent,
                        category,
                        region,
                        regions,
                        finish_time,
                        &self.time_slots,
                        self.time_cycle_length,
                        sense_map,
                    )?;
                    if best.map_or(true, |(best_u, ..)| u > best_u) {
                        best = Some((u, ai, sensor));
                    }
                }

                if let Some((_, ai, sensor)) = best {
                    let category = categories
                        .get(agents[ai].category)
                        .expect("agent category must be registered");
                    agents[ai].assign_task(region, tasks[ti].id, sensor, category, regions)?;
                    tasks[ti].begin(reg_id)?;
                    book.record(tasks[ti].id, reg_id, agents[ai].id);
                } else {
                    log::warn!(
                        "no agent can serve task {:?} region {:?} this round",
                        tasks[ti].id,
                        reg_id
                    );
                }
            }
        }
        Ok(())
    }
}
