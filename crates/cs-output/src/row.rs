//! Plain data row types written by output backends.

/// One entry in the allocation ledger: `agent` has been assigned `count`
/// samples of `task` at `region` over the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRow {
    pub task_id:   u32,
    pub region_id: u32,
    pub agent_id:  u32,
    pub count:     u32,
}

/// A timestamped event from the simulator's heap, for timeline reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventLogRow {
    pub time:     f64,
    pub agent_id: u32,
    pub duration: f64,
    pub init:     bool,
}

/// A single end-of-run coverage summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageRow {
    pub total_coverage:    f64,
    pub num_tasks:         u32,
    pub num_finished_tasks: u32,
}

/// One cell of a sense-map prior-belief snapshot dump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorSnapshotRow {
    pub region_id:   u32,
    pub slot_id:     u16,
    pub category_id: u16,
    pub prior:       f64,
}
