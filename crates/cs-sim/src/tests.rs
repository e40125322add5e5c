//! Unit and end-to-end tests for cs-sim.

#[cfg(test)]
mod event_queue_tests {
    use cs_core::AgentId;

    use crate::event::{Event, EventQueue};

    #[test]
    fn pops_in_time_order_then_insertion_order() {
        let mut q = EventQueue::new();
        q.push(Event { time: 5.0, agent: AgentId(0), duration: 0.0, init: false });
        q.push(Event { time: 1.0, agent: AgentId(1), duration: 0.0, init: false });
        q.push(Event { time: 1.0, agent: AgentId(2), duration: 0.0, init: false });

        assert_eq!(q.pop().unwrap().agent, AgentId(1));
        assert_eq!(q.pop().unwrap().agent, AgentId(2));
        assert_eq!(q.pop().unwrap().agent, AgentId(0));
        assert!(q.pop().is_none());
    }

    #[test]
    fn purge_removes_only_named_agents() {
        let mut q = EventQueue::new();
        q.push(Event { time: 1.0, agent: AgentId(0), duration: 0.0, init: false });
        q.push(Event { time: 2.0, agent: AgentId(1), duration: 0.0, init: false });
        q.purge(&[AgentId(0)]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop().unwrap().agent, AgentId(1));
    }
}

#[cfg(test)]
mod fixtures {
    use std::collections::BTreeMap;

    use cs_agent::{Agent, AgentBuilder, AgentCategory, CategoryTable, MotionMode, Task};
    use cs_alloc::TaskOriented;
    use cs_core::{Area, CategoryId, Point, Region, ScenarioConfig, Sensor, SensorRegistry, TaskId, TimeRange};
    use cs_sensemap::SenseMap;
    use cs_world::{CategoryParams, CategoryParamsTable, ReferenceWorld};

    use crate::controller::Controller;
    use crate::simulator::Simulator;

    pub fn grid() -> Vec<Region> {
        let mut rng = cs_core::AgentRng::new(1, cs_core::AgentId(0));
        Area::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).grid(10.0, &mut rng)
    }

    pub fn category_and_sensor() -> (CategoryTable, Sensor) {
        let mut registry = SensorRegistry::new();
        let sensor = registry.register("camera", 0.9, 5.0);
        let mut table = CategoryTable::new();
        table.insert(AgentCategory {
            id: CategoryId(0),
            name: "uav".into(),
            sensors: vec![sensor.id],
            motion_mode: MotionMode::Air,
            speed: 1.0,
            intra_factor: 1.0,
            properties: BTreeMap::new(),
        });
        (table, sensor)
    }

    pub fn agent(id: u32, seed: u64, region: &Region) -> Agent {
        AgentBuilder::new(cs_core::AgentId(id), seed)
            .category(CategoryId(0))
            .init_region(region.id, region.center())
            .build()
    }

    pub fn task(id: u32, time_range: TimeRange) -> Task {
        Task::new(TaskId(id), "camera", 0.5, time_range)
    }

    /// A single-region, single-agent, single-task scenario wired end to end:
    /// 10x10 area -> 1 region, horizon 100 with 1 slot, gamma 1.
    pub fn single_agent_single_task() -> (Simulator<TaskOriented, ReferenceWorld>, Vec<Region>, TaskId) {
        let regions = grid();
        let slots = TimeRange::new(0.0, 100.0).discretize(100.0);
        let (categories, sensor) = category_and_sensor();

        let mut map = SenseMap::new(regions.clone(), slots.clone(), 1, 10.0, 100.0, 0.05, 0.03, 0.3, 10);
        map.begin_updating(&categories).unwrap();

        let mut params = CategoryParamsTable::new();
        params.insert(CategoryId(0), CategoryParams { threshold: 0.0, theta: 1.0 });
        let world = ReferenceWorld::new(
            &regions.iter().map(|r| r.id).collect::<Vec<_>>(),
            &[CategoryId(0)],
            params,
            0.0,
            0.0,
            7,
        );

        let allocator = TaskOriented { time_slots: slots.clone(), time_cycle_length: 100.0 };
        let config = ScenarioConfig::default();
        let mut controller = Controller::new(
            allocator,
            map,
            categories,
            vec![sensor],
            regions.clone(),
            config,
            10.0,
        );

        let t = task(0, TimeRange::new(0.0, 100.0));
        let task_id = t.id;
        let area = Area::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        controller.publish_task(t, &area);

        let agents = vec![agent(0, 1, &regions[0])];
        (Simulator::new(agents, controller, world), regions, task_id)
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use cs_agent::AgentBuilder;
    use cs_alloc::TaskOriented;
    use cs_core::{Area, AgentId, CategoryId, Point, ScenarioConfig, TimeRange};
    use cs_sensemap::SenseMap;
    use cs_world::{CategoryParams, CategoryParamsTable, ReferenceWorld};

    use crate::controller::Controller;
    use crate::observer::NoopObserver;
    use crate::simulator::Simulator;

    use super::fixtures::{category_and_sensor, grid, single_agent_single_task, task};

    #[test]
    fn single_agent_single_task_completes_and_covers() {
        let (mut sim, regions, task_id) = single_agent_single_task();
        sim.start().unwrap();
        sim.run(1000.0, &mut NoopObserver).unwrap();

        let book = sim.controller().book();
        assert_eq!(book.sampled(task_id, regions[0].id), 1);

        let task = sim.controller().tasks().iter().find(|t| t.id == task_id).unwrap();
        assert!(task.is_finished());
    }

    /// Three agents feasible for the same `(task, region)` under `gamma=2`:
    /// exactly two get sampled, the third's candidacy is rejected by the cap.
    #[test]
    fn gamma_cap_rejects_the_third_feasible_agent() {
        let regions = grid();
        let slots = TimeRange::new(0.0, 100.0).discretize(100.0);
        let (categories, sensor) = category_and_sensor();

        let mut map = SenseMap::new(regions.clone(), slots.clone(), 1, 10.0, 100.0, 0.05, 0.03, 0.3, 10);
        map.begin_updating(&categories).unwrap();

        let mut params = CategoryParamsTable::new();
        params.insert(CategoryId(0), CategoryParams { threshold: 0.0, theta: 1.0 });
        let world = ReferenceWorld::new(
            &regions.iter().map(|r| r.id).collect::<Vec<_>>(),
            &[CategoryId(0)],
            params,
            0.0,
            0.0,
            7,
        );

        let allocator = TaskOriented { time_slots: slots.clone(), time_cycle_length: 100.0 };
        let mut config = ScenarioConfig::default();
        config.gamma = 2;
        let mut controller = Controller::new(allocator, map, categories, vec![sensor], regions.clone(), config, 10.0);

        let t = task(0, TimeRange::new(0.0, 100.0));
        let task_id = t.id;
        let area = Area::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        controller.publish_task(t, &area);

        let agents = vec![
            AgentBuilder::new(AgentId(0), 1)
                .category(CategoryId(0))
                .init_region(regions[0].id, regions[0].center())
                .build(),
            AgentBuilder::new(AgentId(1), 2)
                .category(CategoryId(0))
                .init_region(regions[0].id, regions[0].center())
                .build(),
            AgentBuilder::new(AgentId(2), 3)
                .category(CategoryId(0))
                .init_region(regions[0].id, regions[0].center())
                .build(),
        ];

        let mut sim = Simulator::new(agents, controller, world);
        sim.start().unwrap();
        sim.run(1000.0, &mut NoopObserver).unwrap();

        let book = sim.controller().book();
        assert_eq!(book.sampled(task_id, regions[0].id), 2);
        let assigned = book
            .allocation_plan
            .keys()
            .filter(|(t, r, _)| *t == task_id && *r == regions[0].id)
            .count();
        assert_eq!(assigned, 2, "the third feasible candidate must never be recorded");
    }
}

#[cfg(test)]
mod repair_scenarios {
    use cs_agent::{Agent, AgentBuilder, AgentState};
    use cs_core::{Area, AgentId, CategoryId, Point, RegionId, ScenarioConfig, TimeRange};
    use cs_sensemap::SenseMap;
    use cs_world::WorldOracle;

    use crate::controller::Controller;
    use crate::message::{Feedback, Message};
    use crate::observer::NoopObserver;
    use crate::simulator::Simulator;

    use super::fixtures::{category_and_sensor, grid, task};

    /// A world whose only deviation from the ideal plan is a fixed, oversized
    /// in-region dwell time — travel legs and sensability are left alone.
    struct OvertimeWorld {
        sensing_duration: f64,
    }

    impl WorldOracle for OvertimeWorld {
        fn can_sense(&self, _agent: &Agent, _region: RegionId) -> bool {
            true
        }

        fn compute_duration(&self, agent: &Agent) -> f64 {
            if agent.state() == AgentState::Sensing {
                self.sensing_duration
            } else {
                0.0
            }
        }

        fn is_damaged(&self, _agent: &Agent) -> bool {
            false
        }
    }

    /// Scenario 3: the real sensing duration pushes the submit past the
    /// task's window end, so the commit rolls back and the task expires.
    #[test]
    fn overtime_submit_rolls_back_and_expires_the_task() {
        let regions = grid();
        let slots = TimeRange::new(0.0, 1000.0).discretize(1000.0);
        let (categories, sensor) = category_and_sensor();

        let mut map = SenseMap::new(regions.clone(), slots.clone(), 1, 10.0, 1000.0, 0.05, 0.03, 0.3, 10);
        map.begin_updating(&categories).unwrap();

        let mut config = ScenarioConfig::default();
        config.self_repair = false;

        let allocator = cs_alloc::TaskOriented { time_slots: slots.clone(), time_cycle_length: 1000.0 };
        let mut controller = Controller::new(allocator, map, categories, vec![sensor], regions.clone(), config, 10.0);

        let t = task(0, TimeRange::new(0.0, 1000.0));
        let task_id = t.id;
        let area = Area::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        controller.publish_task(t, &area);

        let agents = vec![AgentBuilder::new(AgentId(0), 1)
            .category(CategoryId(0))
            .init_region(regions[0].id, regions[0].center())
            .build()];

        let world = OvertimeWorld { sensing_duration: 2000.0 };
        let mut sim = Simulator::new(agents, controller, world);
        sim.start().unwrap();
        sim.run(5000.0, &mut NoopObserver).unwrap();

        let task = sim.controller().tasks().iter().find(|t| t.id == task_id).unwrap();
        assert_eq!(task.remaining(regions[0].id), 1, "the late sample must be rolled back");
        assert!(!task.is_alive(), "the task must expire once its window has passed");
    }

    /// Scenario 4: ten agents on a line, reporter in the middle, `repair_k =
    /// 0.3` over ten agents floors to `k = 3` — the reporter plus its two
    /// nearest neighbors by Euclidean distance.
    #[test]
    fn cannot_sense_repair_scope_is_k_nearest_by_distance() {
        let regions = grid();
        let slots = TimeRange::new(0.0, 100.0).discretize(100.0);
        let (categories, sensor) = category_and_sensor();

        let mut map = SenseMap::new(regions.clone(), slots.clone(), 1, 10.0, 100.0, 0.05, 0.03, 0.3, 10);
        map.begin_updating(&categories).unwrap();

        let mut config = ScenarioConfig::default();
        config.repair_k = 0.3;

        let allocator = cs_alloc::TaskOriented { time_slots: slots.clone(), time_cycle_length: 100.0 };
        let mut controller = Controller::new(allocator, map, categories, vec![sensor], regions.clone(), config, 10.0);

        let mut agents: Vec<Agent> = (0..10u32)
            .map(|i| {
                AgentBuilder::new(AgentId(i), u64::from(i) + 1)
                    .category(CategoryId(0))
                    .init_region(regions[0].id, Point::new(f64::from(i), 0.0))
                    .build()
            })
            .collect();

        let msg = Message::CannotSense { agent: AgentId(3), region: regions[0].id, time: 0.0 };
        let feedback = controller.on_message(&mut agents, msg).unwrap();

        let mut scope = match feedback {
            Feedback::Repair { agents } => agents,
            other => panic!("expected Repair feedback, got {other:?}"),
        };
        scope.sort();
        assert_eq!(scope, vec![AgentId(2), AgentId(3), AgentId(4)]);
    }

    /// Scenario 5: feeding successful observations past `update_ratio >
    /// 0.8` triggers self-repair on the next message even though nothing
    /// failed, and the bounded history rolls the prior over once it grows
    /// past `history_len`, dropping the ratio back down.
    #[test]
    fn update_ratio_threshold_triggers_repair_then_rolls_over() {
        let regions = grid();
        let slots = TimeRange::new(0.0, 100.0).discretize(100.0);
        let (categories, sensor) = category_and_sensor();

        // num_categories=5 with a single region/slot gives cell_num=5, so
        // update_ratio climbs in steps of 0.2 per observation.
        let mut map = SenseMap::new(regions.clone(), slots.clone(), 5, 10.0, 100.0, 0.05, 0.03, 0.3, 10);
        map.begin_updating(&categories).unwrap();

        let config = ScenarioConfig::default();
        assert_eq!(config.history_len, 10);
        assert_eq!(config.update_ratio_threshold, 0.8);

        let allocator = cs_alloc::TaskOriented { time_slots: slots.clone(), time_cycle_length: 100.0 };
        let mut controller = Controller::new(allocator, map, categories, vec![sensor], regions.clone(), config, 10.0);

        let mut agents = vec![AgentBuilder::new(AgentId(0), 1)
            .category(CategoryId(0))
            .init_region(regions[0].id, regions[0].center())
            .build()];

        let mut is_repair = Vec::new();
        for _ in 0..12 {
            let msg = Message::SubmitOk { agent: AgentId(0), region: regions[0].id, time: 1.0, duration: 1.0 };
            let feedback = controller.on_message(&mut agents, msg).unwrap();
            is_repair.push(matches!(feedback, Feedback::Repair { .. }));
        }

        assert!(!is_repair[3], "ratio == threshold (0.8) must not yet trigger repair");
        assert!(is_repair[4], "the 5th observation pushes ratio to 1.0, past the threshold");
        assert!(is_repair[10], "ratio stays above threshold until the history rolls over");
        assert!(!is_repair[11], "history_len=10 rollover resets update_times, dropping the ratio");
    }
}
