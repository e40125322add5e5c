//! A deterministic reference [`WorldOracle`] useful for tests and as a
//! default in the absence of a real sensor feed.
//!
//! Grounded on `original_source/realWorld.py`'s `RealWorld`: a per-region,
//! per-category condition rate sampled once at construction, a sensing
//! threshold and duration-scaling factor per category, a uniform
//! travel-time jitter, and a per-step damage probability (the source's
//! `robot.broken()` hook was never wired to anything; this gives the
//! simulator a concrete trigger for it).

use std::cell::RefCell;
use std::collections::HashMap;

use cs_agent::{Agent, AgentState};
use cs_core::{CategoryId, RegionId, SimRng};

use crate::oracle::WorldOracle;
use crate::params::CategoryParamsTable;

pub struct ReferenceWorld {
    /// Condition rate in `[0, 1)` per `(region, category)`, sampled once.
    condition: HashMap<(RegionId, CategoryId), f64>,
    params: CategoryParamsTable,
    /// Travel-time jitter is drawn uniformly from `[1, moving_affect]`.
    moving_affect: f64,
    /// Per-step probability of reporting an agent as newly broken.
    damage_rate: f64,
    rng: RefCell<SimRng>,
}

impl ReferenceWorld {
    pub fn new(
        regions: &[RegionId],
        categories: &[CategoryId],
        params: CategoryParamsTable,
        moving_affect: f64,
        damage_rate: f64,
        seed: u64,
    ) -> Self {
        let mut rng = SimRng::new(seed);
        let mut condition = HashMap::new();
        for &reg in regions {
            for &cat in categories {
                condition.insert((reg, cat), rng.gen_range(0.0..1.0));
            }
        }
        Self {
            condition,
            params,
            moving_affect: 1.0 + moving_affect,
            damage_rate,
            rng: RefCell::new(rng),
        }
    }

    fn rate(&self, region: RegionId, category: CategoryId) -> f64 {
        self.condition.get(&(region, category)).copied().unwrap_or(0.0)
    }
}

impl WorldOracle for ReferenceWorld {
    fn can_sense(&self, agent: &Agent, region: RegionId) -> bool {
        let Some(params) = self.params.get(agent.category) else {
            return false;
        };
        self.rate(region, agent.category) >= params.threshold
    }

    fn compute_duration(&self, agent: &Agent) -> f64 {
        let step = agent.current_step();
        if agent.state() == AgentState::Sensing {
            let rate = self.rate(agent.current_region(), agent.category);
            let theta = self.params.get(agent.category).map(|p| p.theta).unwrap_or(1.0);
            step.ideal_sensing_time * (1.0 - rate) * theta
        } else {
            let mut rng = self.rng.borrow_mut();
            step.ideal_moving_time * rng.gen_range(1.0..self.moving_affect)
        }
    }

    fn is_damaged(&self, agent: &Agent) -> bool {
        if self.damage_rate <= 0.0 || agent.is_broken() {
            return false;
        }
        self.rng.borrow_mut().gen_range(0.0..1.0) < self.damage_rate
    }
}
