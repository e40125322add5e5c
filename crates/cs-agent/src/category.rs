//! Agent category descriptors.
//!
//! Per-category motion distance is named as an interface only (it is an
//! external collaborator per the scope note) — `MotionProfile` is the seam;
//! `AirMotion`/`LandMotion` are reference implementations grounded on
//! `original_source/concreteRobot.py`'s `UAV`/`UV`, not a claim of physical
//! fidelity.

use std::cell::RefCell;
use std::collections::HashMap;

use cs_core::{AgentRng, CategoryId, Region, RegionId, SensorId};

/// How a category moves between regions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionMode {
    Air,
    Land,
}

/// The seam between a category's declared `MotionMode` and the actual
/// distance/location arithmetic. Named as an interface per scope — this
/// crate ships one reference implementation per mode.
pub trait MotionProfile {
    fn inter_d(&self, from: &Region, to: &Region) -> f64;
    fn intra_d(&self, region: &Region, intra_factor: f64) -> f64;
    /// The region containing the point `(1-p)*r1 + p*r2` along this
    /// profile's motion path, searched among `candidates`.
    fn locate(
        &self,
        r1: &Region,
        r2: &Region,
        percentage: f64,
        candidates: &[Region],
        rng: &mut AgentRng,
    ) -> Option<RegionId>;
}

pub struct AirMotion;

impl MotionProfile for AirMotion {
    fn inter_d(&self, from: &Region, to: &Region) -> f64 {
        cs_core::euclidean_distance(from.represent_loc(), to.represent_loc())
    }

    fn intra_d(&self, region: &Region, intra_factor: f64) -> f64 {
        2.0 * (region.side() + region.side()) * intra_factor
    }

    fn locate(
        &self,
        r1: &Region,
        r2: &Region,
        percentage: f64,
        candidates: &[Region],
        _rng: &mut AgentRng,
    ) -> Option<RegionId> {
        let c1 = r1.center();
        let c2 = r2.center();
        let x = (1.0 - percentage) * c1.x + percentage * c2.x;
        let y = (1.0 - percentage) * c1.y + percentage * c2.y;
        let p = cs_core::Point::new(x, y);
        candidates.iter().find(|r| r.contains(p)).map(|r| r.id)
    }
}

pub struct LandMotion;

impl MotionProfile for LandMotion {
    fn inter_d(&self, from: &Region, to: &Region) -> f64 {
        cs_core::manhattan_distance(from.represent_loc(), to.represent_loc())
    }

    fn intra_d(&self, region: &Region, intra_factor: f64) -> f64 {
        2.0 * (region.side() + region.side()) * intra_factor
    }

    fn locate(
        &self,
        r1: &Region,
        r2: &Region,
        percentage: f64,
        candidates: &[Region],
        rng: &mut AgentRng,
    ) -> Option<RegionId> {
        let l1 = r1.random_point(rng);
        let l2 = r2.random_point(rng);
        let length = cs_core::manhattan_distance(l1, l2);
        if length == 0.0 {
            return candidates.iter().find(|r| r.contains(l1)).map(|r| r.id);
        }
        let x_p = (l1.x - l2.x).abs() / length;
        let (x, y) = if percentage < x_p {
            ((1.0 - percentage) * l1.x + percentage * l2.x, l1.y)
        } else {
            let pct = percentage - x_p;
            (l2.x, (1.0 - pct) * l1.y + pct * l2.y)
        };
        let p = cs_core::Point::new(x, y);
        candidates.iter().find(|r| r.contains(p)).map(|r| r.id)
    }
}

pub fn motion_profile(mode: MotionMode) -> Box<dyn MotionProfile> {
    match mode {
        MotionMode::Air => Box::new(AirMotion),
        MotionMode::Land => Box::new(LandMotion),
    }
}

/// An immutable agent category descriptor.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentCategory {
    pub id: CategoryId,
    pub name: String,
    pub sensors: Vec<SensorId>,
    pub motion_mode: MotionMode,
    pub speed: f64,
    /// `2 * (side + side) * intra_factor` scales the in-region sampling
    /// travel distance; default 0.9 for air, 1.1 for land (concreteRobot.py).
    pub intra_factor: f64,
    pub properties: std::collections::BTreeMap<String, f64>,
}

impl AgentCategory {
    pub fn inter_d(&self, from: &Region, to: &Region) -> f64 {
        motion_profile(self.motion_mode).inter_d(from, to)
    }

    pub fn intra_d(&self, region: &Region) -> f64 {
        motion_profile(self.motion_mode).intra_d(region, self.intra_factor)
    }

    pub fn locate(
        &self,
        r1: &Region,
        r2: &Region,
        percentage: f64,
        candidates: &[Region],
        rng: &mut AgentRng,
    ) -> Option<RegionId> {
        motion_profile(self.motion_mode).locate(r1, r2, percentage, candidates, rng)
    }

    /// Normalized, bounded dissimilarity in `[0, 1]` — averages a mode
    /// mismatch indicator, a normalized speed delta, and normalized
    /// property-map deltas. Use [`CategoryTable::dissimilarity`] for the
    /// memoized form.
    fn raw_dissimilarity(&self, other: &AgentCategory) -> f64 {
        let mut terms = Vec::with_capacity(2 + self.properties.len());

        terms.push(if self.motion_mode == other.motion_mode {
            0.0
        } else {
            1.0
        });

        let speed_scale = self.speed.abs().max(other.speed.abs()).max(1.0);
        terms.push(((self.speed - other.speed).abs() / speed_scale).min(1.0));

        for (key, val) in &self.properties {
            let other_val = *other.properties.get(key).unwrap_or(&0.0);
            let scale = val.abs().max(other_val.abs()).max(1.0);
            terms.push(((val - other_val).abs() / scale).min(1.0));
        }

        terms.iter().sum::<f64>() / terms.len() as f64
    }
}

/// A category-id → descriptor table, owning a memoized pairwise
/// dissimilarity cache keyed by the unordered category-id pair.
#[derive(Default)]
pub struct CategoryTable {
    categories: Vec<AgentCategory>,
    dissimilarity_cache: RefCell<HashMap<(CategoryId, CategoryId), f64>>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: AgentCategory) -> CategoryId {
        let id = category.id;
        self.categories.push(category);
        id
    }

    pub fn get(&self, id: CategoryId) -> Option<&AgentCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.categories.iter().map(|c| c.id)
    }

    /// Memoized dissimilarity lookup between two categories by id.
    pub fn dissimilarity(&self, a: CategoryId, b: CategoryId) -> f64 {
        if a == b {
            return 0.0;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(v) = self.dissimilarity_cache.borrow().get(&key) {
            return *v;
        }
        let cat_a = self.get(a).expect("unknown category id");
        let cat_b = self.get(b).expect("unknown category id");
        let v = cat_a.raw_dissimilarity(cat_b);
        self.dissimilarity_cache.borrow_mut().insert(key, v);
        v
    }
}
