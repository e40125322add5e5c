//! Integration tests for cs-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AllocationRow, CoverageRow, EventLogRow, PriorSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("event_log.csv").exists());
        assert!(dir.path().join("allocation_ledger.csv").exists());
        assert!(dir.path().join("coverage_summary.csv").exists());
        assert!(dir.path().join("prior_snapshot.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("allocation_ledger.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["task_id", "region_id", "agent_id", "count"]);
    }

    #[test]
    fn csv_event_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![
            EventLogRow { time: 0.0, agent_id: 0, duration: 0.0, init: true },
            EventLogRow { time: 1.5, agent_id: 0, duration: 1.5, init: false },
        ];
        w.write_events(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("event_log.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 2);
        assert_eq!(&read_rows[1][0], "1.5");
    }

    #[test]
    fn csv_allocation_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_allocations(&[AllocationRow { task_id: 0, region_id: 3, agent_id: 1, count: 2 }]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("allocation_ledger.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 1);
        assert_eq!(&read_rows[0][3], "2");
    }

    #[test]
    fn csv_coverage_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_coverage(&CoverageRow { total_coverage: 0.75, num_tasks: 4, num_finished_tasks: 3 }).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("coverage_summary.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&read_rows[0][0], "0.75");
        assert_eq!(&read_rows[0][2], "3");
    }

    #[test]
    fn csv_prior_snapshot_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_prior_snapshot(&[PriorSnapshotRow { region_id: 2, slot_id: 1, category_id: 0, prior: 0.4 }])
            .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("prior_snapshot.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&read_rows[0][3], "0.4");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_events(&[]).unwrap();
        w.write_allocations(&[]).unwrap();
        w.write_prior_snapshot(&[]).unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use std::collections::BTreeMap;

    use cs_agent::{Agent, AgentBuilder, AgentCategory, CategoryTable, MotionMode, Task};
    use cs_alloc::TaskOriented;
    use cs_core::{Area, CategoryId, Point, Region, ScenarioConfig, Sensor, SensorRegistry, TaskId, TimeRange};
    use cs_sensemap::SenseMap;
    use cs_sim::{Controller, Simulator};
    use cs_world::{CategoryParams, CategoryParamsTable, ReferenceWorld};
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::observer::write_summary;
    use crate::writer::OutputWriter;
    use crate::SimOutputObserver;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn grid() -> Vec<Region> {
        let mut rng = cs_core::AgentRng::new(1, cs_core::AgentId(0));
        Area::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).grid(10.0, &mut rng)
    }

    fn scenario() -> (Simulator<TaskOriented, ReferenceWorld>, TaskId) {
        let regions = grid();
        let slots = TimeRange::new(0.0, 100.0).discretize(100.0);

        let mut registry = SensorRegistry::new();
        let sensor = registry.register("camera", 0.9, 5.0);
        let mut categories = CategoryTable::new();
        categories.insert(AgentCategory {
            id: CategoryId(0),
            name: "uav".into(),
            sensors: vec![sensor.id],
            motion_mode: MotionMode::Air,
            speed: 1.0,
            intra_factor: 1.0,
            properties: BTreeMap::new(),
        });

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
        let mut controller =
            Controller::new(allocator, map, categories, vec![sensor], regions.clone(), config, 10.0);

        let t = Task::new(TaskId(0), "camera", 0.5, TimeRange::new(0.0, 100.0));
        let task_id = t.id;
        let area = Area::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        controller.publish_task(t, &area);

        let agent: Agent = AgentBuilder::new(cs_core::AgentId(0), 1)
            .category(CategoryId(0))
            .init_region(regions[0].id, regions[0].center())
            .build();

        (Simulator::new(vec![agent], controller, world), task_id)
    }

    #[test]
    fn observer_streams_events_and_summary_reports_coverage() {
        let (mut sim, task_id) = scenario();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);

        sim.start().unwrap();
        sim.run(1000.0, &mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        write_summary(obs.writer_mut(), sim.controller()).unwrap();
        obs.into_writer().finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("event_log.csv")).unwrap();
        let events: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert!(!events.is_empty(), "at least one event should have been logged");

        let mut rdr = csv::Reader::from_path(dir.path().join("allocation_ledger.csv")).unwrap();
        let allocations: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(allocations.len(), 1);
        assert_eq!(&allocations[0][0], task_id.0.to_string());
        assert_eq!(&allocations[0][3], "1");

        let mut rdr = csv::Reader::from_path(dir.path().join("coverage_summary.csv")).unwrap();
        let coverage: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&coverage[0][0], "1");
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::AllocationRow;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_allocation_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows = vec![
            AllocationRow { task_id: 0, region_id: 0, agent_id: 0, count: 1 },
            AllocationRow { task_id: 0, region_id: 1, agent_id: 0, count: 1 },
        ];
        w.write_allocations(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM allocation_ledger", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn sqlite_finish_idempotent() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}
