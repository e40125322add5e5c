//! The `Agent`: a mobile sensor platform guarded by its state machine.
//!
//! Grounded on `original_source/robot.py`'s `Robot` for the operation
//! contracts (`assignTask`, `cancelPlan`, `executeMissions`, `submitTasks`,
//! `sense`, `idealFinishTime`, `moveDistance`, `arrivalTime`,
//! `distBetweenRobot`) and on `original_source/RobotState.py` for the guard
//! table, re-expressed as a match on a tagged [`AgentState`] instead of a
//! cyclic state-object back-pointer.

use std::collections::HashSet;

use cs_core::{AgentId, AgentRng, Point, Region, RegionId, Sensor, SensorId, TaskId};

use crate::category::AgentCategory;
use crate::error::{AgentError, AgentResult};
use crate::state::{AgentState, StepRecord};
use crate::task::Task;

pub struct Agent {
    pub id: AgentId,
    pub category: cs_core::CategoryId,
    pub init_region: RegionId,
    current_region: RegionId,
    location: Point,
    state: AgentState,
    cursor: usize,
    steps: Vec<StepRecord>,
    finished_missions: bool,
    rng: AgentRng,
}

impl Agent {
    pub fn new(
        id: AgentId,
        category: cs_core::CategoryId,
        init_region: RegionId,
        location: Point,
        rng: AgentRng,
    ) -> Self {
        Self {
            id,
            category,
            init_region,
            current_region: init_region,
            location,
            state: AgentState::Idle,
            cursor: 0,
            steps: vec![StepRecord::initial(init_region)],
            finished_missions: false,
            rng,
        }
    }

    // ── read-only accessors ────────────────────────────────────────────────

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_broken(&self) -> bool {
        self.state == AgentState::Broken
    }

    pub fn is_finish_missions(&self) -> bool {
        self.finished_missions
    }

    pub fn current_region(&self) -> RegionId {
        self.current_region
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn current_tasks(&self) -> &[TaskId] {
        &self.steps[self.cursor].tasks
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_step(&self) -> &StepRecord {
        self.steps.last().expect("steps always has the init step")
    }

    /// The step record at the cursor — the leg currently in progress (or
    /// just completed, if idle).
    pub fn current_step(&self) -> &StepRecord {
        &self.steps[self.cursor]
    }

    /// The union of subtasks assigned at or after the current cursor.
    pub fn unfinished_tasks(&self) -> HashSet<TaskId> {
        self.steps[self.cursor..]
            .iter()
            .flat_map(|s| s.tasks.iter().copied())
            .collect()
    }

    pub fn distance_between(&self, other: &Agent) -> f64 {
        cs_core::euclidean_distance(self.location, other.location)
    }

    pub fn arrival_time(&self, reg: &Region, category: &AgentCategory, regions: &[Region]) -> f64 {
        let last_region = self.region_by_id(self.last_step().planned_region, regions);
        let move_time = category.inter_d(last_region, reg) / category.speed;
        self.last_step().finish_time + move_time
    }

    /// Additional distance incurred by appending `reg` to the plan tail:
    /// the leg from the last planned region plus the in-region sensing leg.
    pub fn task_distance(&self, reg: &Region, category: &AgentCategory, regions: &[Region]) -> f64 {
        let last_region = self.region_by_id(self.last_step().planned_region, regions);
        category.inter_d(last_region, reg) + category.intra_d(reg)
    }

    /// Cumulative planned travel distance — sum of `intraD + interD` over
    /// every step beyond the init/first real step.
    pub fn move_distance(&self, category: &AgentCategory, regions: &[Region]) -> f64 {
        let mut dist = 0.0;
        let mut prev = self.init_region;
        for step in self.steps.iter().skip(1) {
            let prev_region = self.region_by_id(prev, regions);
            let reg = self.region_by_id(step.planned_region, regions);
            dist += category.intra_d(reg) + category.inter_d(prev_region, reg);
            prev = step.planned_region;
        }
        dist
    }

    fn region_by_id<'a>(&self, id: RegionId, regions: &'a [Region]) -> &'a Region {
        regions
            .iter()
            .find(|r| r.id == id)
            .expect("region id must exist in the grid")
    }

    /// The ideal completion time at `reg` using `sensor`, given this agent's
    /// current plan tail and state.
    pub fn ideal_finish_time(
        &self,
        reg: &Region,
        sensor: SensorId,
        category: &AgentCategory,
        regions: &[Region],
    ) -> f64 {
        let last = self.last_step();
        let last_region = self.region_by_id(last.planned_region, regions);
        let move_time = category.inter_d(last_region, reg) / category.speed;

        let can_overlap = self.state != AgentState::Sensing
            && self.steps.len() > 1
            && move_time == 0.0
            && !last.sensors.contains(&sensor);
        if can_overlap {
            return last.finish_time;
        }
        last.finish_time + category.intra_d(reg) / category.speed + move_time
    }

    /// Feasible (finish_time, sensor) pairs over sensors adequate for `task`.
    pub fn possible_plan(
        &self,
        reg: &Region,
        task: &Task,
        category: &AgentCategory,
        sensors: &[Sensor],
        regions: &[Region],
    ) -> Vec<(f64, SensorId)> {
        sensors
            .iter()
            .filter(|s| category.sensors.contains(&s.id) && task.sensor_adequate(s))
            .map(|s| (self.ideal_finish_time(reg, s.id, category, regions), s.id))
            .collect()
    }

    // ── guarded operations ──────────────────────────────────────────────────

    /// Assigns a subtask to this agent at `reg` using `sensor`.
    ///
    /// Idle: concurrent-merges into the trailing step when the computed
    /// finish time matches it exactly and the sensor is not already in use
    /// there; otherwise pushes a new step. Sensing: always pushes a new
    /// step — concurrent sampling is never allowed once sensing has begun.
    pub fn assign_task(
        &mut self,
        reg: &Region,
        task: TaskId,
        sensor: SensorId,
        category: &AgentCategory,
        regions: &[Region],
    ) -> AgentResult<()> {
        match self.state {
            AgentState::Idle => {
                let ideal = self.ideal_finish_time(reg, sensor, category, regions);
                let last = self.steps.last().expect("init step always present");
                if self.steps.len() > 1 && ideal == last.finish_time && !last.sensors.contains(&sensor) {
                    let last = self.steps.last_mut().unwrap();
                    last.tasks.push(task);
                    last.sensors.push(sensor);
                } else {
                    self.push_step(reg.id, task, sensor, ideal, category, regions);
                }
                Ok(())
            }
            AgentState::Sensing => {
                let ideal = self.ideal_finish_time(reg, sensor, category, regions);
                self.push_step(reg.id, task, sensor, ideal, category, regions);
                Ok(())
            }
            other => Err(AgentError::StateViolation(format!(
                "assignTask invalid in state {other}"
            ))),
        }
    }

    fn push_step(
        &mut self,
        reg: RegionId,
        task: TaskId,
        sensor: SensorId,
        ideal_finish: f64,
        category: &AgentCategory,
        regions: &[Region],
    ) {
        let last = self.steps.last().expect("init step always present");
        let last_region_id = last.planned_region;
        let last_finish = last.finish_time;
        let last_dist = last.planned_distance;

        let ideal_time_used = ideal_finish - last_finish;
        let reg_ref = self.region_by_id(reg, regions);
        let ideal_sensing_time = category.intra_d(reg_ref) / category.speed;
        let ideal_moving_time = ideal_time_used - ideal_sensing_time;

        let last_region_ref = self.region_by_id(last_region_id, regions);
        let planned_distance =
            last_dist + category.inter_d(last_region_ref, reg_ref) + category.intra_d(reg_ref);

        self.steps.push(StepRecord {
            planned_region: reg,
            tasks: vec![task],
            sensors: vec![sensor],
            finish_time: ideal_finish,
            ideal_time_used,
            ideal_moving_time,
            ideal_sensing_time,
            planned_distance,
        });
    }

    /// Interrupts the current plan at `time`, relocating the agent along its
    /// in-flight leg and discarding everything beyond the cursor.
    pub fn cancel_plan(
        &mut self,
        time: f64,
        category: &AgentCategory,
        regions: &[Region],
    ) -> AgentResult<()> {
        match self.state {
            AgentState::Idle => {
                self.steps.truncate(self.cursor + 1);
                Ok(())
            }
            AgentState::Moving => {
                let start_id = self.steps[self.cursor - 1].planned_region;
                let end_id = self.steps[self.cursor].planned_region;
                let start = *self.region_by_id(start_id, regions);
                let end = *self.region_by_id(end_id, regions);

                let elapsed = time - self.steps[self.cursor - 1].finish_time;
                let budget = self.steps[self.cursor].ideal_time_used;
                let p = if budget > 0.0 { elapsed / budget } else { 0.0 };

                let new_region_id = category
                    .locate(&start, &end, p, regions, &mut self.rng)
                    .unwrap_or(start_id);
                let new_region = self.region_by_id(new_region_id, regions);

                self.location = new_region.random_point(&mut self.rng);
                self.current_region = new_region_id;

                self.steps.truncate(self.cursor);
                let resting = StepRecord {
                    finish_time: time,
                    ..StepRecord::initial(new_region_id)
                };
                self.steps.push(resting);
                self.cursor = self.steps.len() - 1;
                self.state = AgentState::Idle;
                Ok(())
            }
            AgentState::Sensing => {
                self.steps.truncate(self.cursor + 1);
                Ok(())
            }
            AgentState::Broken => Err(AgentError::WrongState("Broken cannot cancelPlan")),
        }
    }

    /// Advances the cursor and transitions into `Moving`, or into `Idle`
    /// with the finished-missions flag set if no next step exists.
    pub fn execute(&mut self) -> AgentResult<()> {
        match self.state {
            AgentState::Idle => {
                let next = self.cursor + 1;
                if next < self.steps.len() {
                    self.cursor = next;
                    self.state = AgentState::Moving;
                } else {
                    self.state = AgentState::Idle;
                    self.finished_missions = true;
                }
                Ok(())
            }
            AgentState::Sensing => Ok(()), // no-op
            other => Err(AgentError::StateViolation(format!(
                "execute invalid in state {other}"
            ))),
        }
    }

    /// Arrives at the targeted region and begins sensing.
    pub fn sense(&mut self, regions: &[Region]) -> AgentResult<()> {
        match self.state {
            AgentState::Moving => {
                let target = self.steps[self.cursor].planned_region;
                self.current_region = target;
                self.location = self.region_by_id(target, regions).random_point(&mut self.rng);
                self.state = AgentState::Sensing;
                Ok(())
            }
            other => Err(AgentError::StateViolation(format!(
                "sense invalid in state {other}"
            ))),
        }
    }

    /// Submits the in-progress sample at `time`, mutating its planned
    /// finish time to the real completion time and advancing the cursor.
    pub fn submit_task(&mut self, time: f64) -> AgentResult<()> {
        match self.state {
            AgentState::Sensing => {
                self.steps[self.cursor].finish_time = time;
                self.cursor += 1;
                if self.cursor < self.steps.len() {
                    self.state = AgentState::Moving;
                } else {
                    self.state = AgentState::Idle;
                    self.finished_missions = true;
                }
                Ok(())
            }
            other => Err(AgentError::StateViolation(format!(
                "submitTask invalid in state {other}"
            ))),
        }
    }

    pub fn broken(&mut self) -> AgentResult<()> {
        if self.state == AgentState::Broken {
            return Err(AgentError::WrongState("already Broken"));
        }
        self.state = AgentState::Broken;
        Ok(())
    }
}
