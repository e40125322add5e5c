//! Fluent builder for constructing a single [`Agent`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use cs_agent::AgentBuilder;
//!
//! let agent = AgentBuilder::new(agent_id, global_seed)
//!     .category(category_id)
//!     .init_region(region_id, location)
//!     .build();
//! ```

use cs_core::{AgentId, AgentRng, CategoryId, Point, RegionId};

use crate::agent::Agent;

/// Fluent builder for one [`Agent`], deriving its per-agent RNG from the
/// scenario's global seed at build time.
pub struct AgentBuilder {
    id: AgentId,
    seed: u64,
    category: Option<CategoryId>,
    init_region: Option<(RegionId, Point)>,
}

impl AgentBuilder {
    pub fn new(id: AgentId, seed: u64) -> Self {
        Self {
            id,
            seed,
            category: None,
            init_region: None,
        }
    }

    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn init_region(mut self, region: RegionId, location: Point) -> Self {
        self.init_region = Some((region, location));
        self
    }

    /// # Panics
    /// Panics if `category` or `init_region` were never set.
    pub fn build(self) -> Agent {
        let category = self.category.expect("AgentBuilder: category not set");
        let (region, location) = self
            .init_region
            .expect("AgentBuilder: init_region not set");
        let rng = AgentRng::new(self.seed, self.id);
        Agent::new(self.id, category, region, location, rng)
    }
}
