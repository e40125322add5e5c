//! `cs-output` — run-result writers for the crowdsense simulator.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature  | Backend | Files created                                                               |
//! |----------|---------|------------------------------------------------------------------------------|
//! | *(none)* | CSV     | `event_log.csv`, `allocation_ledger.csv`, `coverage_summary.csv`, `prior_snapshot.csv` |
//! | `sqlite` | SQLite  | `output.db`                                                                   |
//!
//! All backends implement [`OutputWriter`] and are driven two ways:
//! [`SimOutputObserver`] streams the event timeline live (it implements
//! `cs_sim::SimObserver`), and [`write_summary`] writes the allocation
//! ledger, coverage, and sense-map prior once the run has finished.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cs_output::{CsvWriter, SimOutputObserver, write_summary};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.start()?;
//! sim.run(1000.0, &mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! write_summary(obs.writer_mut(), sim.controller())?;
//! obs.into_writer().finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{write_summary, SimOutputObserver};
pub use row::{AllocationRow, CoverageRow, EventLogRow, PriorSnapshotRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
