//! The event-loop driver.
//!
//! Grounded on `original_source/simulation.py`'s `Simulator.run` for the
//! pop-dispatch-reschedule shape, and on the teacher's `dt-sim/src/sim.rs`
//! for how a Rust tick loop structures its phases — here there is one phase
//! per popped event rather than a fixed tick, since the horizon is
//! continuous real time.

use cs_agent::{Agent, AgentState};
use cs_alloc::Allocator;
use cs_core::AgentId;
use cs_world::WorldOracle;

use crate::error::{SimError, SimResult};
use crate::event::{Event, EventQueue};
use crate::message::{Feedback, Message};
use crate::observer::SimObserver;
use crate::Controller;

fn find<'a>(agents: &'a [Agent], id: AgentId) -> SimResult<&'a Agent> {
    agents.iter().find(|a| a.id == id).ok_or(SimError::UnknownAgent(id))
}

fn find_mut<'a>(agents: &'a mut [Agent], id: AgentId) -> SimResult<&'a mut Agent> {
    agents.iter_mut().find(|a| a.id == id).ok_or(SimError::UnknownAgent(id))
}

pub struct Simulator<A: Allocator, W: WorldOracle> {
    agents: Vec<Agent>,
    controller: Controller<A>,
    world: W,
    queue: EventQueue,
}

impl<A: Allocator, W: WorldOracle> Simulator<A, W> {
    pub fn new(agents: Vec<Agent>, controller: Controller<A>, world: W) -> Self {
        Self {
            agents,
            controller,
            world,
            queue: EventQueue::new(),
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn controller(&self) -> &Controller<A> {
        &self.controller
    }

    /// Runs initial allocation and seeds every agent's first event at `t=0`.
    pub fn start(&mut self) -> SimResult<()> {
        log::info!("running initial allocation over {} agents", self.agents.len());
        self.controller.start(&mut self.agents)?;
        for agent in &self.agents {
            self.queue.push(Event {
                time: 0.0,
                agent: agent.id,
                duration: 0.0,
                init: true,
            });
        }
        Ok(())
    }

    /// Drains the event heap until empty or `horizon` is exceeded, or every
    /// agent has finished its missions.
    pub fn run<O: SimObserver>(&mut self, horizon: f64, observer: &mut O) -> SimResult<()> {
        while let Some(event) = self.queue.pop() {
            if event.time > horizon {
                break;
            }
            observer.on_event(&event);
            self.step(event)?;
            if self.queue.is_empty() {
                break;
            }
        }
        observer.on_sim_end(&self.agents);
        Ok(())
    }

    fn step(&mut self, event: Event) -> SimResult<()> {
        log::debug!(
            "popped event t={:.3} agent={:?} init={}",
            event.time,
            event.agent,
            event.init
        );
        if event.init {
            return self.handle_init(event);
        }
        let agent = find(&self.agents, event.agent)?;
        let state = agent.state();
        if state != AgentState::Broken && self.world.is_damaged(agent) {
            return self.handle_damaged(event);
        }
        match state {
            AgentState::Moving => self.handle_moving(event),
            AgentState::Sensing => self.handle_sensing(event),
            AgentState::Idle | AgentState::Broken => Ok(()),
        }
    }

    /// The world reports `event.agent` newly broken: marks it `Broken` and
    /// reports a `Damaged` message instead of dispatching its usual leg.
    fn handle_damaged(&mut self, event: Event) -> SimResult<()> {
        let region = find(&self.agents, event.agent)?.current_region();
        log::warn!("agent {:?} damaged at region {:?} (t={:.3})", event.agent, region, event.time);
        find_mut(&mut self.agents, event.agent)?.broken()?;
        let msg = Message::Damaged { agent: event.agent, region, time: event.time };
        let feedback = self.controller.on_message(&mut self.agents, msg)?;
        self.apply_feedback(event.time, event.agent, feedback)
    }

    fn handle_init(&mut self, event: Event) -> SimResult<()> {
        let agent = find_mut(&mut self.agents, event.agent)?;
        agent.execute()?;
        self.schedule_next(event.time, event.agent)
    }

    fn handle_moving(&mut self, event: Event) -> SimResult<()> {
        let region = find(&self.agents, event.agent)?.current_step().planned_region;
        let can_sense = self.world.can_sense(find(&self.agents, event.agent)?, region);

        if can_sense {
            let regions = self.controller.regions().to_vec();
            let agent = find_mut(&mut self.agents, event.agent)?;
            agent.sense(&regions)?;
            self.schedule_next(event.time, event.agent)
        } else {
            log::warn!("agent {:?} cannot sense region {:?} (t={:.3})", event.agent, region, event.time);
            let msg = Message::CannotSense {
                agent: event.agent,
                region,
                time: event.time,
            };
            let feedback = self.controller.on_message(&mut self.agents, msg)?;
            self.apply_feedback(event.time, event.agent, feedback)
        }
    }

    fn handle_sensing(&mut self, event: Event) -> SimResult<()> {
        let region = find(&self.agents, event.agent)?.current_step().planned_region;
        let task_ids: Vec<_> = find(&self.agents, event.agent)?.current_step().tasks.clone();

        let mut all_ok = true;
        for task_id in task_ids {
            if let Some(task) = self.controller.task_mut(task_id) {
                let ok = task.commit(region, event.time)?;
                if !ok {
                    log::warn!(
                        "task {:?} submit at t={:.3} fell outside its window, rolled back",
                        task_id,
                        event.time
                    );
                }
                all_ok &= ok;
            }
        }

        let agent = find_mut(&mut self.agents, event.agent)?;
        agent.submit_task(event.time)?;

        let msg = if all_ok {
            Message::SubmitOk {
                agent: event.agent,
                region,
                time: event.time,
                duration: event.duration,
            }
        } else {
            Message::PlanInfeasible {
                agent: event.agent,
                region,
                time: event.time,
                duration: event.duration,
            }
        };
        let feedback = self.controller.on_message(&mut self.agents, msg)?;
        self.apply_feedback(event.time, event.agent, feedback)
    }

    fn apply_feedback(&mut self, time: f64, agent_id: AgentId, feedback: Feedback) -> SimResult<()> {
        match feedback {
            Feedback::Continue => self.schedule_next(time, agent_id),
            Feedback::Repair { agents: scope } => {
                log::info!("self-repair triggered at t={:.3}, scope={:?}", time, scope);
                let not_sensing: Vec<AgentId> = scope
                    .iter()
                    .copied()
                    .filter(|&id| {
                        find(&self.agents, id).map(|a| a.state() != AgentState::Sensing).unwrap_or(false)
                    })
                    .collect();
                self.queue.purge(&not_sensing);
                for id in &not_sensing {
                    self.queue.push(Event {
                        time,
                        agent: *id,
                        duration: 0.0,
                        init: true,
                    });
                }
                self.controller.on_repair_complete();
                Ok(())
            }
            Feedback::SkipSample => {
                log::warn!("skipping sample for agent {:?} at t={:.3}, no credit given", agent_id, time);
                self.skip_sample(time, agent_id)
            }
        }
    }

    /// Advances the agent past its current sensing target without
    /// crediting a sample: rolls back every subtask at the current step,
    /// then fast-forwards through sense/submit so `finish_time = time`.
    fn skip_sample(&mut self, time: f64, agent_id: AgentId) -> SimResult<()> {
        let region = find(&self.agents, agent_id)?.current_step().planned_region;
        let task_ids: Vec<_> = find(&self.agents, agent_id)?.current_step().tasks.clone();
        for task_id in task_ids {
            if let Some(task) = self.controller.task_mut(task_id) {
                task.rollback(region)?;
            }
        }
        let regions = self.controller.regions().to_vec();
        let agent = find_mut(&mut self.agents, agent_id)?;
        if agent.state() == AgentState::Moving {
            agent.sense(&regions)?;
        }
        agent.submit_task(time)?;
        self.schedule_next(time, agent_id)
    }

    fn schedule_next(&mut self, time: f64, agent_id: AgentId) -> SimResult<()> {
        let agent = find(&self.agents, agent_id)?;
        if agent.is_finish_missions() {
            return Ok(());
        }
        let duration = self.world.compute_duration(agent);
        self.queue.push(Event {
            time: time + duration,
            agent: agent_id,
            duration,
            init: false,
        });
        Ok(())
    }
}
