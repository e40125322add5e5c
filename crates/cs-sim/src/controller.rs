//! The self-repair controller: owns the sense-map, the task set, and the
//! allocator, and answers the simulator's messages with feedback.
//!
//! Grounded on `original_source/MASys.py`'s `MACrowdSystem`
//! (`__execMissions`/`__needRepairing`/`__constructNewPlan`/
//! `__decomposeTask`), re-architected per the explicit call/return contract
//! in place of the source's generator-based coroutine: `start`,
//! `on_message`, `on_repair_complete` replace `yield`/`send`.
//!
//! Agents are owned by the [`crate::simulator::Simulator`], not by this
//! controller — every method that needs to read or mutate them is handed a
//! `&mut [Agent]` explicitly, matching the ownership split in the design's
//! concurrency model.

use std::collections::HashSet;

use cs_agent::{Agent, CategoryTable, Task};
use cs_alloc::{Allocator, AllocationBook};
use cs_core::{Area, ScenarioConfig, Sensor, TaskId};
use cs_sensemap::SenseMap;

use crate::error::SimResult;
use crate::message::{Feedback, Message};

pub struct Controller<A: Allocator> {
    tasks: Vec<Task>,
    sense_map: SenseMap,
    categories: CategoryTable,
    sensors: Vec<Sensor>,
    regions: Vec<cs_core::Region>,
    config: ScenarioConfig,
    book: AllocationBook,
    allocator: A,
}

impl<A: Allocator> Controller<A> {
    pub fn new(
        allocator: A,
        sense_map: SenseMap,
        categories: CategoryTable,
        sensors: Vec<Sensor>,
        regions: Vec<cs_core::Region>,
        config: ScenarioConfig,
        area_diagonal: f64,
    ) -> Self {
        let book = AllocationBook::new(config.gamma, config.kappa, config.utility.thetas, area_diagonal);
        Self {
            tasks: Vec::new(),
            sense_map,
            categories,
            sensors,
            regions,
            config,
            book,
            allocator,
        }
    }

    pub fn sense_map(&self) -> &SenseMap {
        &self.sense_map
    }

    pub fn book(&self) -> &AllocationBook {
        &self.book
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn regions(&self) -> &[cs_core::Region] {
        &self.regions
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Decomposes `task` over every region whose center lies inside `area`,
    /// sorted by region id, and registers it.
    pub fn publish_task(&mut self, mut task: Task, area: &Area) {
        let matching: Vec<cs_core::Region> = self
            .regions
            .iter()
            .filter(|r| area.contains(r.center()))
            .copied()
            .collect();
        task.decompose(&matching, self.config.gamma);
        self.tasks.push(task);
    }

    /// Runs initial allocation over every agent and task, per `start()`'s
    /// contract, returning the first feedback if one was already warranted.
    pub fn start(&mut self, agents: &mut [Agent]) -> SimResult<Option<Feedback>> {
        self.allocator.allocate(
            &mut self.tasks,
            agents,
            &self.sense_map,
            &self.categories,
            &self.sensors,
            &self.regions,
            &mut self.book,
        )?;
        Ok(None)
    }

    /// Updates the sense-map from `msg`, then decides whether self-repair is
    /// warranted: `needRepairing = (msg.status ≠ submit-ok) ∨ (update_ratio >
    /// threshold)`. Uses `or`, not `and` — the resolved reading of the
    /// source's two competing revisions.
    ///
    /// A `Damaged` message is handled before any of that: no observation
    /// happened, so the sense-map is left untouched, and the reporting
    /// agent is unconditionally removed from the replan set regardless of
    /// `self_repair` — its unfinished subtasks must still be redistributed.
    pub fn on_message(&mut self, agents: &mut [Agent], msg: Message) -> SimResult<Feedback> {
        if msg.is_damaged() {
            return self.on_damaged(agents, msg);
        }

        let category = agents
            .iter()
            .find(|a| a.id == msg.agent())
            .map(|a| a.category)
            .ok_or(crate::error::SimError::UnknownAgent(msg.agent()))?;

        self.sense_map.update(
            msg.region(),
            msg.time(),
            msg.duration(),
            category,
            msg.is_fatal_sense(),
            &self.categories,
        )?;

        let needs_repair =
            !msg.is_submit_ok() || self.sense_map.update_ratio() > self.config.update_ratio_threshold;

        if !needs_repair {
            return Ok(Feedback::Continue);
        }

        if self.config.self_repair {
            let scope = self.repair_scope(agents, msg.agent());
            for &id in &scope {
                if let Some(agent) = agents.iter_mut().find(|a| a.id == id) {
                    if agent.state() != cs_agent::AgentState::Sensing {
                        let cat = self
                            .categories
                            .get(agent.category)
                            .expect("agent category must be registered");
                        agent.cancel_plan(msg.time(), cat, &self.regions)?;
                    }
                }
            }
            self.allocate_scoped(agents, &scope, &scope)?;
            Ok(Feedback::Repair { agents: scope })
        } else if msg.is_fatal_sense() {
            Ok(Feedback::SkipSample)
        } else {
            Ok(Feedback::Continue)
        }
    }

    /// `Damaged`: the reporter (already transitioned to `Broken` by the
    /// caller) is dropped from the agent scope that gets re-planned, but its
    /// unfinished subtasks still join the repair pool via the task scope.
    fn on_damaged(&mut self, agents: &mut [Agent], msg: Message) -> SimResult<Feedback> {
        log::warn!(
            "agent {:?} damaged at region {:?} (t={:.3}), removing from allocation",
            msg.agent(),
            msg.region(),
            msg.time()
        );

        let task_scope = self.repair_scope(agents, msg.agent());
        let agent_scope: Vec<cs_core::AgentId> = task_scope
            .iter()
            .copied()
            .filter(|&id| agents.iter().find(|a| a.id == id).map(|a| !a.is_broken()).unwrap_or(false))
            .collect();

        for &id in &agent_scope {
            if let Some(agent) = agents.iter_mut().find(|a| a.id == id) {
                if agent.state() != cs_agent::AgentState::Sensing {
                    let cat = self
                        .categories
                        .get(agent.category)
                        .expect("agent category must be registered");
                    agent.cancel_plan(msg.time(), cat, &self.regions)?;
                }
            }
        }
        self.allocate_scoped(agents, &task_scope, &agent_scope)?;
        Ok(Feedback::Repair { agents: agent_scope })
    }

    pub fn on_repair_complete(&mut self) {}

    /// `S` = the k nearest agents (by current-location Euclidean distance,
    /// reporter included) to the incident reporter, where `k =
    /// floor(repair_k * num_agents)`; `k == num_agents` takes every
    /// non-broken agent instead.
    fn repair_scope(&self, agents: &[Agent], reporter: cs_core::AgentId) -> Vec<cs_core::AgentId> {
        let k = ((self.config.repair_k * agents.len() as f64).floor() as usize).clamp(1, agents.len());
        if k >= agents.len() {
            return agents.iter().filter(|a| !a.is_broken()).map(|a| a.id).collect();
        }
        let target = agents.iter().find(|a| a.id == reporter).expect("reporter must be registered");
        let mut by_distance: Vec<(f64, cs_core::AgentId)> =
            agents.iter().map(|a| (target.distance_between(a), a.id)).collect();
        by_distance.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        by_distance.into_iter().take(k).map(|(_, id)| id).collect()
    }

    /// T' = union of the unfinished tasks of every agent in `scope`.
    fn scoped_task_ids(&self, agents: &[Agent], scope: &[cs_core::AgentId]) -> HashSet<TaskId> {
        agents
            .iter()
            .filter(|a| scope.contains(&a.id))
            .flat_map(|a| a.unfinished_tasks())
            .collect()
    }

    /// Runs allocation restricted to `agent_scope` over the unfinished tasks
    /// of `task_scope`, by stably partitioning the agent and task vectors so
    /// the scoped members land in a contiguous mutable prefix.
    ///
    /// `task_scope` and `agent_scope` differ only for a damaged reporter: its
    /// unfinished tasks still need redistributing even though it is excluded
    /// from the agents actually offered the re-allocation.
    fn allocate_scoped(
        &mut self,
        agents: &mut [Agent],
        task_scope: &[cs_core::AgentId],
        agent_scope: &[cs_core::AgentId],
    ) -> SimResult<()> {
        let task_ids = self.scoped_task_ids(agents, task_scope);

        agents.sort_by_key(|a| !agent_scope.contains(&a.id));
        let k = agent_scope.len();

        self.tasks.sort_by_key(|t| !task_ids.contains(&t.id));
        let m = task_ids.len();

        self.allocator.allocate(
            &mut self.tasks[..m],
            &mut agents[..k],
            &self.sense_map,
            &self.categories,
            &self.sensors,
            &self.regions,
            &mut self.book,
        )?;
        Ok(())
    }
}
