//! The composite distance metric and Matern-5/2 kernel over map points.
//!
//! Grounded on `original_source/senseMap.py`'s `dist`/`matern` methods. The
//! source's `dist` computes `reg1.dist(reg1)` (comparing a region to
//! itself) — almost certainly a copy-paste slip, since `reg2` is otherwise
//! unused. This crate uses the composite distance actually documented for
//! the kernel: region distance normalized by the area diagonal, cyclic
//! time-slot distance normalized by slot count, and category dissimilarity,
//! averaged in equal thirds.

use std::cell::RefCell;
use std::collections::HashMap;

use cs_agent::CategoryTable;
use cs_core::{CategoryId, Region, RegionId, TimeSlot, TimeSlotId};

/// A point in the sense-map's 3D (region, time-slot, category) domain.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapPoint {
    pub reg: RegionId,
    pub ts: TimeSlotId,
    pub rc: CategoryId,
}

impl MapPoint {
    pub fn new(reg: RegionId, ts: TimeSlotId, rc: CategoryId) -> Self {
        Self { reg, ts, rc }
    }
}

/// Matern-5/2 kernel over the composite distance, with memoization keyed by
/// the unordered `(MapPoint, MapPoint)` pair (the kernel is symmetric).
pub struct MaternKernel {
    rho: f64,
    cache: RefCell<HashMap<(MapPoint, MapPoint), f64>>,
}

impl MaternKernel {
    pub fn new(rho: f64) -> Self {
        Self {
            rho,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// `d = (1/3)*d_reg/D_max + (1/3)*d_ts/N + (1/3)*d_rc`, each term in
    /// `[0, 1]`, so `d` itself is bounded by `[0, 1]`.
    pub fn composite_distance(
        &self,
        p1: MapPoint,
        p2: MapPoint,
        regions: &[Region],
        time_slots: &[TimeSlot],
        categories: &CategoryTable,
        area_diagonal: f64,
    ) -> f64 {
        let r1 = regions.iter().find(|r| r.id == p1.reg).expect("region id");
        let r2 = regions.iter().find(|r| r.id == p2.reg).expect("region id");
        let d_reg = if area_diagonal > 0.0 {
            r1.dist(r2) / area_diagonal
        } else {
            0.0
        };

        let n = time_slots.len() as u16;
        let d_ts = if n > 0 {
            TimeSlot::cyclic_dist(p1.ts, p2.ts, n) as f64 / n as f64
        } else {
            0.0
        };

        let d_rc = categories.dissimilarity(p1.rc, p2.rc);

        (d_reg + d_ts + d_rc) / 3.0
    }

    /// `k(d) = (1 + sqrt(5)*d/rho + 5*d^2/(3*rho^2)) * exp(-sqrt(5)*d/rho)`.
    fn matern(&self, d: f64) -> f64 {
        let sqrt5 = 5f64.sqrt();
        let ratio = sqrt5 * d / self.rho;
        (1.0 + ratio + 5.0 * d * d / (3.0 * self.rho * self.rho)) * (-ratio).exp()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn k(
        &self,
        p1: MapPoint,
        p2: MapPoint,
        regions: &[Region],
        time_slots: &[TimeSlot],
        categories: &CategoryTable,
        area_diagonal: f64,
    ) -> f64 {
        let key = if p1 == p2 || key_order(p1, p2) {
            (p1, p2)
        } else {
            (p2, p1)
        };
        if let Some(v) = self.cache.borrow().get(&key) {
            return *v;
        }
        let d = self.composite_distance(p1, p2, regions, time_slots, categories, area_diagonal);
        let v = self.matern(d);
        self.cache.borrow_mut().insert(key, v);
        v
    }
}

fn key_order(a: MapPoint, b: MapPoint) -> bool {
    (a.reg, a.ts, a.rc) <= (b.reg, b.ts, b.rc)
}
