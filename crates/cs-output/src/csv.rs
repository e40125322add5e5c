//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `event_log.csv`
//! - `allocation_ledger.csv`
//! - `coverage_summary.csv`
//! - `prior_snapshot.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AllocationRow, CoverageRow, EventLogRow, OutputResult, PriorSnapshotRow};

/// Writes simulation output to four CSV files.
pub struct CsvWriter {
    events:      Writer<File>,
    allocations: Writer<File>,
    coverage:    Writer<File>,
    prior:       Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the four CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("event_log.csv"))?;
        events.write_record(["time", "agent_id", "duration", "init"])?;

        let mut allocations = Writer::from_path(dir.join("allocation_ledger.csv"))?;
        allocations.write_record(["task_id", "region_id", "agent_id", "count"])?;

        let mut coverage = Writer::from_path(dir.join("coverage_summary.csv"))?;
        coverage.write_record(["total_coverage", "num_tasks", "num_finished_tasks"])?;

        let mut prior = Writer::from_path(dir.join("prior_snapshot.csv"))?;
        prior.write_record(["region_id", "slot_id", "category_id", "prior"])?;

        Ok(Self {
            events,
            allocations,
            coverage,
            prior,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventLogRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.time.to_string(),
                row.agent_id.to_string(),
                row.duration.to_string(),
                (row.init as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_allocations(&mut self, rows: &[AllocationRow]) -> OutputResult<()> {
        for row in rows {
            self.allocations.write_record(&[
                row.task_id.to_string(),
                row.region_id.to_string(),
                row.agent_id.to_string(),
                row.count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_coverage(&mut self, row: &CoverageRow) -> OutputResult<()> {
        self.coverage.write_record(&[
            row.total_coverage.to_string(),
            row.num_tasks.to_string(),
            row.num_finished_tasks.to_string(),
        ])?;
        Ok(())
    }

    fn write_prior_snapshot(&mut self, rows: &[PriorSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.prior.write_record(&[
                row.region_id.to_string(),
                row.slot_id.to_string(),
                row.category_id.to_string(),
                row.prior.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.allocations.flush()?;
        self.coverage.flush()?;
        self.prior.flush()?;
        Ok(())
    }
}
