//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! four tables: `event_log`, `allocation_ledger`, `coverage_summary`,
//! `prior_snapshot`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AllocationRow, CoverageRow, EventLogRow, OutputResult, PriorSnapshotRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS event_log (
                 time     REAL NOT NULL,
                 agent_id INTEGER NOT NULL,
                 duration REAL NOT NULL,
                 init     INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS allocation_ledger (
                 task_id   INTEGER NOT NULL,
                 region_id INTEGER NOT NULL,
                 agent_id  INTEGER NOT NULL,
                 count     INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS coverage_summary (
                 total_coverage     REAL NOT NULL,
                 num_tasks          INTEGER NOT NULL,
                 num_finished_tasks INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS prior_snapshot (
                 region_id   INTEGER NOT NULL,
                 slot_id     INTEGER NOT NULL,
                 category_id INTEGER NOT NULL,
                 prior       REAL NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_events(&mut self, rows: &[EventLogRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO event_log (time, agent_id, duration, init) VALUES (?1, ?2, ?3, ?4)")?;
            for row in rows {
                stmt.execute(rusqlite::params![row.time, row.agent_id, row.duration, row.init as i64])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_allocations(&mut self, rows: &[AllocationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO allocation_ledger (task_id, region_id, agent_id, count) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.task_id, row.region_id, row.agent_id, row.count])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_coverage(&mut self, row: &CoverageRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO coverage_summary (total_coverage, num_tasks, num_finished_tasks) VALUES (?1, ?2, ?3)",
            rusqlite::params![row.total_coverage, row.num_tasks, row.num_finished_tasks],
        )?;
        Ok(())
    }

    fn write_prior_snapshot(&mut self, rows: &[PriorSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO prior_snapshot (region_id, slot_id, category_id, prior) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.region_id, row.slot_id, row.category_id, row.prior])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
