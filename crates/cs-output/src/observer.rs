//! `SimOutputObserver<W>` — bridges `cs_sim::SimObserver` to an
//! `OutputWriter`, plus `write_summary`, the end-of-run report that pulls
//! the allocation ledger, coverage, and sense-map prior out of a finished
//! controller.

use cs_agent::Agent;
use cs_alloc::Allocator;
use cs_sim::{Controller, Event, SimObserver};

use crate::row::{AllocationRow, CoverageRow, EventLogRow, PriorSnapshotRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that streams every popped event to an [`OutputWriter`]
/// backend (CSV, SQLite, …).
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value. After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to call [`write_summary`] or inspect
    /// files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Borrow the inner writer without consuming the observer.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_event(&mut self, event: &Event) {
        let row = EventLogRow {
            time:     event.time,
            agent_id: event.agent.0,
            duration: event.duration,
            init:     event.init,
        };
        let result = self.writer.write_events(&[row]);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _agents: &[Agent]) {}
}

/// Writes the allocation ledger, coverage summary, and sense-map prior
/// snapshot from a finished (or in-progress) controller.
///
/// Separate from [`SimOutputObserver`] because `SimObserver::on_sim_end`
/// only sees the agent slice, not the controller the simulator owns
/// alongside it — call this once after `sim.run()` returns, using
/// `sim.controller()`.
pub fn write_summary<W: OutputWriter, A: Allocator>(
    writer: &mut W,
    controller: &Controller<A>,
) -> crate::OutputResult<()> {
    let allocations: Vec<AllocationRow> = controller
        .book()
        .allocation_plan
        .iter()
        .map(|(&(task_id, region_id, agent_id), &count)| AllocationRow {
            task_id:   task_id.0,
            region_id: region_id.0,
            agent_id:  agent_id.0,
            count,
        })
        .collect();
    writer.write_allocations(&allocations)?;

    let tasks = controller.tasks();
    let coverage = CoverageRow {
        total_coverage:     controller.book().total_coverage(tasks),
        num_tasks:          tasks.len() as u32,
        num_finished_tasks: tasks.iter().filter(|t| t.is_finished()).count() as u32,
    };
    writer.write_coverage(&coverage)?;

    let prior: Vec<PriorSnapshotRow> = controller
        .sense_map()
        .dump_prior()
        .into_iter()
        .map(|(point, value)| PriorSnapshotRow {
            region_id:   point.reg.0,
            slot_id:     point.ts.0,
            category_id: point.rc.0,
            prior:       value,
        })
        .collect();
    writer.write_prior_snapshot(&prior)?;

    Ok(())
}
