//! Unit tests for cs-agent.

#[cfg(test)]
mod fixtures {
    use std::collections::BTreeMap;

    use cs_core::{AgentRng, Area, CategoryId, Point, Region, RegionId, Sensor};

    use crate::category::{AgentCategory, MotionMode};

    pub fn grid(side: f64, n: u32) -> Vec<Region> {
        let mut rng = AgentRng::new(1, cs_core::AgentId(0));
        Area::new(Point::new(0.0, 0.0), Point::new(side * n as f64, side * n as f64))
            .grid(side, &mut rng)
    }

    pub fn air_category(id: u16, sensors: Vec<cs_core::SensorId>) -> AgentCategory {
        AgentCategory {
            id: CategoryId(id),
            name: "uav".into(),
            sensors,
            motion_mode: MotionMode::Air,
            speed: 5.0,
            intra_factor: 0.9,
            properties: BTreeMap::new(),
        }
    }

    pub fn sensor(id: u32, category: &str, accuracy: f64) -> Sensor {
        Sensor {
            id: cs_core::SensorId(id),
            category: category.to_string(),
            accuracy,
            range: 50.0,
        }
    }

    pub fn region_at(regions: &[Region], id: u32) -> &Region {
        regions.iter().find(|r| r.id == RegionId(id)).unwrap()
    }
}

#[cfg(test)]
mod category_tests {
    use super::fixtures::air_category;
    use crate::category::{CategoryTable, MotionMode};

    #[test]
    fn dissimilarity_is_zero_for_identical_categories() {
        let mut table = CategoryTable::new();
        let a = table.insert(air_category(0, vec![]));
        let b = table.insert(air_category(1, vec![]));
        assert_eq!(table.dissimilarity(a, b), 0.0);
    }

    #[test]
    fn dissimilarity_reflects_mode_mismatch() {
        let mut table = CategoryTable::new();
        let air = air_category(0, vec![]);
        let mut land = air_category(1, vec![]);
        land.motion_mode = MotionMode::Land;
        let a = table.insert(air);
        let b = table.insert(land);
        let d = table.dissimilarity(a, b);
        assert!(d > 0.0 && d <= 1.0);
    }

    #[test]
    fn dissimilarity_is_memoized_symmetrically() {
        let mut table = CategoryTable::new();
        let mut land = air_category(1, vec![]);
        land.motion_mode = MotionMode::Land;
        let a = table.insert(air_category(0, vec![]));
        let b = table.insert(land);
        assert_eq!(table.dissimilarity(a, b), table.dissimilarity(b, a));
    }
}

#[cfg(test)]
mod task_tests {
    use cs_core::{RegionId, TimeRange};

    use super::fixtures::{grid, sensor};
    use crate::task::Task;

    #[test]
    fn decompose_selects_regions_and_sorts_by_id() {
        let regions = grid(10.0, 3);
        let mut task = Task::new(cs_core::TaskId(0), "camera", 0.5, TimeRange::new(0.0, 100.0));
        task.decompose(&regions, 2);
        assert_eq!(task.regions().len(), regions.len());
        let ids: Vec<u32> = task.regions().iter().map(|r| r.0).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        for r in task.regions() {
            assert_eq!(task.remaining(*r), 2);
        }
    }

    #[test]
    fn begin_decrements_and_errors_when_exhausted() {
        let regions = grid(10.0, 1);
        let mut task = Task::new(cs_core::TaskId(0), "camera", 0.5, TimeRange::new(0.0, 100.0));
        task.decompose(&regions, 1);
        let reg = task.regions()[0];
        task.begin(reg).unwrap();
        assert_eq!(task.remaining(reg), 0);
        assert!(task.begin(reg).is_err());
    }

    #[test]
    fn commit_outside_window_rolls_back_and_expires() {
        let regions = grid(10.0, 1);
        let mut task = Task::new(cs_core::TaskId(0), "camera", 0.5, TimeRange::new(0.0, 10.0));
        task.decompose(&regions, 1);
        let reg = task.regions()[0];
        task.begin(reg).unwrap();
        let credited = task.commit(reg, 15.0).unwrap();
        assert!(!credited);
        assert_eq!(task.remaining(reg), 1, "overtime sample must not be credited");
        assert!(!task.is_alive());
    }

    #[test]
    fn commit_inside_window_credits_sample() {
        let regions = grid(10.0, 1);
        let mut task = Task::new(cs_core::TaskId(0), "camera", 0.5, TimeRange::new(0.0, 10.0));
        task.decompose(&regions, 1);
        let reg = task.regions()[0];
        task.begin(reg).unwrap();
        let credited = task.commit(reg, 5.0).unwrap();
        assert!(credited);
        assert_eq!(task.remaining(reg), 0);
        assert!(task.is_finished());
    }

    #[test]
    fn sensor_adequate_checks_category_and_accuracy() {
        let task = Task::new(cs_core::TaskId(0), "camera", 0.7, TimeRange::new(0.0, 10.0));
        assert!(task.sensor_adequate(&sensor(0, "camera", 0.8)));
        assert!(!task.sensor_adequate(&sensor(1, "camera", 0.5)));
        assert!(!task.sensor_adequate(&sensor(2, "gas", 0.9)));
        let _ = RegionId(0);
    }
}

#[cfg(test)]
mod agent_tests {
    use cs_core::{AgentId, AgentRng, CategoryId, Point, RegionId, SensorId, TaskId};

    use super::fixtures::{air_category, grid, region_at};
    use crate::agent::Agent;
    use crate::state::AgentState;

    fn new_agent(init: u32) -> Agent {
        let rng = AgentRng::new(0, AgentId(0));
        Agent::new(
            AgentId(0),
            CategoryId(0),
            RegionId(init),
            Point::new(0.0, 0.0),
            rng,
        )
    }

    #[test]
    fn starts_idle_at_init_region() {
        let agent = new_agent(0);
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(agent.current_region(), RegionId(0));
        assert!(!agent.is_finish_missions());
    }

    #[test]
    fn assign_task_pushes_a_new_step_then_execute_moves() {
        let regions = grid(10.0, 2);
        let cat = air_category(0, vec![SensorId(0)]);
        let mut agent = new_agent(0);
        let target = region_at(&regions, 1);

        agent
            .assign_task(target, TaskId(0), SensorId(0), &cat, &regions)
            .unwrap();
        assert_eq!(agent.state(), AgentState::Idle, "assignTask does not transition state");

        agent.execute().unwrap();
        assert_eq!(agent.state(), AgentState::Moving);
    }

    #[test]
    fn assign_task_in_sensing_always_pushes_new_step() {
        let regions = grid(10.0, 2);
        let cat = air_category(0, vec![SensorId(0), SensorId(1)]);
        let mut agent = new_agent(0);
        let r1 = region_at(&regions, 1);

        agent
            .assign_task(r1, TaskId(0), SensorId(0), &cat, &regions)
            .unwrap();
        agent.execute().unwrap();
        agent.sense(&regions).unwrap();
        assert_eq!(agent.state(), AgentState::Sensing);

        let before = agent.cursor();
        agent
            .assign_task(r1, TaskId(1), SensorId(1), &cat, &regions)
            .unwrap();
        assert!(agent.cursor() >= before, "sensing assign never merges into the live step");
    }

    #[test]
    fn assign_task_merges_into_same_step_when_ideal_finish_matches() {
        let regions = grid(10.0, 2);
        let cat = air_category(0, vec![SensorId(0), SensorId(1)]);
        let mut agent = new_agent(0);
        let target = region_at(&regions, 1);

        agent
            .assign_task(target, TaskId(0), SensorId(0), &cat, &regions)
            .unwrap();
        assert_eq!(agent.last_step().tasks.len(), 1);

        // Same region, a second adequate sensor not yet in use there: the
        // ideal finish time matches the live step exactly, so this merges
        // into it instead of pushing a new one.
        agent
            .assign_task(target, TaskId(1), SensorId(1), &cat, &regions)
            .unwrap();

        assert_eq!(agent.state(), AgentState::Idle, "merging a concurrent sample never leaves Idle");
        assert_eq!(agent.last_step().tasks, vec![TaskId(0), TaskId(1)]);
        assert_eq!(agent.last_step().sensors, vec![SensorId(0), SensorId(1)]);
    }

    #[test]
    fn sense_requires_moving_state() {
        let regions = grid(10.0, 2);
        let mut agent = new_agent(0);
        assert!(agent.sense(&regions).is_err());
    }

    #[test]
    fn submit_advances_to_idle_when_no_more_steps() {
        let regions = grid(10.0, 2);
        let cat = air_category(0, vec![SensorId(0)]);
        let mut agent = new_agent(0);
        let target = region_at(&regions, 1);

        agent
            .assign_task(target, TaskId(0), SensorId(0), &cat, &regions)
            .unwrap();
        agent.execute().unwrap();
        agent.sense(&regions).unwrap();
        agent.submit_task(100.0).unwrap();

        assert_eq!(agent.state(), AgentState::Idle);
        assert!(agent.is_finish_missions());
    }

    #[test]
    fn broken_agent_rejects_every_operation() {
        let regions = grid(10.0, 2);
        let cat = air_category(0, vec![SensorId(0)]);
        let mut agent = new_agent(0);
        agent.broken().unwrap();
        assert!(agent.is_broken());

        let target = region_at(&regions, 1);
        assert!(agent
            .assign_task(target, TaskId(0), SensorId(0), &cat, &regions)
            .is_err());
        assert!(agent.execute().is_err());
        assert!(agent.sense(&regions).is_err());
        assert!(agent.submit_task(0.0).is_err());
        assert!(agent.cancel_plan(0.0, &cat, &regions).is_err());
    }

    #[test]
    fn cancel_plan_while_moving_relocates_and_returns_to_idle() {
        let regions = grid(10.0, 2);
        let cat = air_category(0, vec![SensorId(0)]);
        let mut agent = new_agent(0);
        let target = region_at(&regions, 1);

        agent
            .assign_task(target, TaskId(0), SensorId(0), &cat, &regions)
            .unwrap();
        agent.execute().unwrap();
        assert_eq!(agent.state(), AgentState::Moving);

        let midpoint = agent.last_step().finish_time / 2.0;
        agent.cancel_plan(midpoint, &cat, &regions).unwrap();
        assert_eq!(agent.state(), AgentState::Idle);
    }
}
