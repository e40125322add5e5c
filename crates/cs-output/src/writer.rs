//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AllocationRow, CoverageRow, EventLogRow, OutputResult, PriorSnapshotRow};

/// Trait implemented by every output backend (CSV, SQLite, …).
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with [`crate::SimOutputObserver::take_error`].
pub trait OutputWriter {
    /// Append a batch of timeline events.
    fn write_events(&mut self, rows: &[EventLogRow]) -> OutputResult<()>;

    /// Append a batch of allocation-ledger rows.
    fn write_allocations(&mut self, rows: &[AllocationRow]) -> OutputResult<()>;

    /// Write the end-of-run coverage summary.
    fn write_coverage(&mut self, row: &CoverageRow) -> OutputResult<()>;

    /// Append a batch of sense-map prior snapshot rows.
    fn write_prior_snapshot(&mut self, rows: &[PriorSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
