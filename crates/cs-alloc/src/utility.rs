//! `ΔUtility` — the greedy allocator's objective function.
//!
//! Grounded on `original_source/MASys.py`'s `GreedyBaseAlgorithm.DeltaUtility`.

use cs_agent::{Agent, AgentCategory};
use cs_core::{Region, TimeSlot};
use cs_sensemap::{MapPoint, SenseMap};

use crate::error::{AllocError, AllocResult};
use crate::model::AllocationBook;

/// `θ1/λ1 - θ2·(planned_distance.last + taskDistance(reg))/λ2 + θ3·acq(reg, ts, category)/λ3`.
pub fn delta_utility(
    book: &AllocationBook,
    agent: &Agent,
    category: &AgentCategory,
    reg: &Region,
    regions: &[Region],
    arrive_time: f64,
    time_slots: &[TimeSlot],
    time_cycle_length: f64,
    sense_map: &SenseMap,
) -> AllocResult<f64> {
    let f1 = book.thetas[0] / book.lambdas[0];

    let f2 = book.thetas[1]
        * (agent.last_step().planned_distance + agent.task_distance(reg, category, regions))
        / book.lambdas[1];

    let ts = cs_core::slot_containing(time_slots, arrive_time, time_cycle_length)
        .ok_or(AllocError::ArrivalTime(arrive_time))?;
    let point = MapPoint::new(reg.id, ts.id, category.id);
    let f3 = book.thetas[2] * sense_map.acquire(point, book.kappa) / book.lambdas[2];

    Ok(f1 - f2 + f3)
}
