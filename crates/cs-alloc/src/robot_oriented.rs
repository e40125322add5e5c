//! Global greedy allocation over the full `(task, reg, agent)` feasibility
//! table, re-scoring the winning agent's remaining candidates after each
//! commit since its trailing plan just changed.
//!
//! Grounded on `original_source/MASys.py`'s `RobotOrientAlgorithm`.

use cs_agent::{Agent, CategoryTable, Task};
use cs_core::{Region, RegionId, Sensor, SensorId, TimeSlot};
use cs_sensemap::SenseMap;

use crate::error::AllocResult;
use crate::model::{region_by_id, Allocator, AllocationBook};
use crate::utility::delta_utility;

pub struct RobotOriented {
    pub time_slots: Vec<TimeSlot>,
    pub time_cycle_length: f64,
}

struct Entry {
    task_idx: usize,
    reg: RegionId,
    agent_idx: usize,
    utility: f64,
    sensor: SensorId,
}

#[allow(clippy::too_many_arguments)]
fn feasible_entry(
    task_idx: usize,
    reg_id: RegionId,
    agent_idx: usize,
    task: &Task,
    agent: &Agent,
    region: &Region,
    regions: &[Region],
    categories: &CategoryTable,
    sensors: &[Sensor],
    book: &AllocationBook,
    time_slots: &[TimeSlot],
    time_cycle_length: f64,
    sense_map: &SenseMap,
) -> AllocResult<Option<Entry>> {
    let category = categories
        .get(agent.category)
        .expect("agent category must be registered");
    let plan = agent.possible_plan(region, task, category, sensors, regions);
    let Some(&(finish_time, sensor)) = plan.iter().min_by(|a, b| a.0.partial_cmp(&b.0).unwrap())
    else {
        return Ok(None);
    };
    if !task.time_range.contains(finish_time) {
        return Ok(None);
    }
    let u = delta_utility(
        book,
        agent,
        category,
        region,
        regions,
        finish_time,
        time_slots,
        time_cycle_length,
        sense_map,
    )?;
    Ok(Some(Entry {
        task_idx,
        reg: reg_id,
        agent_idx,
        utility: u,
        sensor,
    }))
}

impl Allocator for RobotOriented {
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
        let mut entries: Vec<Entry> = Vec::new();
        for (ti, task) in tasks.iter().enumerate() {
            if task.is_finished() || !task.is_alive() {
                continue;
            }
            for &reg_id in task.regions() {
                if task.remaining(reg_id) == 0 {
                    continue;
                }
                let region = region_by_id(regions, reg_id);
                let before = entries.len();
                for (ai, agent) in agents.iter().enumerate() {
                    if let Some(entry) = feasible_entry(
                        ti,
                        reg_id,
                        ai,
                        task,
                        agent,
                        region,
                        regions,
                        categories,
                        sensors,
                        book,
                        &self.time_slots,
                        self.time_cycle_length,
                        sense_map,
                    )? {
                        entries.push(entry);
                    }
                }
                if entries.len() == before {
                    log::warn!("no agent can serve task {:?} region {:?} this round", task.id, reg_id);
                }
            }
        }

        loop {
            let mut best_idx = None;
            let mut best_u = f64::MIN;
            for (i, e) in entries.iter().enumerate() {
                if book.sampled(tasks[e.task_idx].id, e.reg) >= book.gamma {
                    continue;
                }
                if e.utility > best_u {
                    best_u = e.utility;
                    best_idx = Some(i);
                }
            }
            let Some(i) = best_idx else { break };
            let winner = entries.remove(i);

            let region = region_by_id(regions, winner.reg);
            let category = categories
                .get(agents[winner.agent_idx].category)
                .expect("agent category must be registered");
            agents[winner.agent_idx].assign_task(
                region,
                tasks[winner.task_idx].id,
                winner.sensor,
                category,
                regions,
            )?;
            tasks[winner.task_idx].begin(winner.reg)?;
            book.record(tasks[winner.task_idx].id, winner.reg, agents[winner.agent_idx].id);

            let agent_idx = winner.agent_idx;
            let reopen: Vec<(usize, RegionId)> = entries
                .iter()
                .filter(|en| en.agent_idx == agent_idx)
                .map(|en| (en.task_idx, en.reg))
                .collect();
            entries.retain(|en| en.agent_idx != agent_idx);

            for (ti, reg_id) in reopen {
                let task = &tasks[ti];
                if task.is_finished() || !task.is_alive() || task.remaining(reg_id) == 0 {
                    continue;
                }
                let region = region_by_id(regions, reg_id);
                let agent = &agents[agent_idx];
                if let Some(entry) = feasible_entry(
                    ti,
                    reg_id,
                    agent_idx,
                    task,
                    agent,
                    region,
                    regions,
                    categories,
                    sensors,
                    book,
                    &self.time_slots,
                    self.time_cycle_length,
                    sense_map,
                )? {
                    entries.push(entry);
                }
            }
        }
        Ok(())
    }
}
