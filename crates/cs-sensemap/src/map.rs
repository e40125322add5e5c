//! `SenseMap` — the 3D (region, time-slot, category) Gaussian-process
//! belief tensor, sparsely materialized over a hash map.
//!
//! Grounded on `original_source/senseMap.py`'s `SenseMap` class.

use std::collections::{HashMap, VecDeque};

use cs_agent::CategoryTable;
use cs_core::{CategoryId, Region, RegionId, TimeSlot, TimeSlotId};
use nalgebra::DMatrix;

use crate::error::{SenseMapError, SenseMapResult};
use crate::gp;
use crate::kernel::{MapPoint, MaternKernel};

/// One entry in the bounded observation history: the preference residual
/// paired with the map point it was observed at.
type HistoryEntry = (f64, MapPoint);

pub struct SenseMap {
    regions: Vec<Region>,
    time_slots: Vec<TimeSlot>,
    area_diagonal: f64,
    time_cycle_length: f64,

    kernel: MaternKernel,
    sigma_noise: f64,
    map_cycle_kappa: f64,
    history_len: usize,

    cells: HashMap<MapPoint, (f64, f64)>,
    prior: HashMap<MapPoint, f64>,
    history: VecDeque<HistoryEntry>,
    update_times: usize,
    cell_num: usize,
}

impl SenseMap {
    pub fn new(
        regions: Vec<Region>,
        time_slots: Vec<TimeSlot>,
        num_categories: usize,
        area_diagonal: f64,
        time_cycle_length: f64,
        rho: f64,
        sigma_noise: f64,
        map_cycle_kappa: f64,
        history_len: usize,
    ) -> Self {
        let cell_num = regions.len() * time_slots.len() * num_categories;
        Self {
            regions,
            time_slots,
            area_diagonal,
            time_cycle_length,
            kernel: MaternKernel::new(rho),
            sigma_noise,
            map_cycle_kappa,
            history_len,
            cells: HashMap::new(),
            prior: HashMap::new(),
            history: VecDeque::new(),
            update_times: 0,
            cell_num,
        }
    }

    pub fn update_ratio(&self) -> f64 {
        if self.cell_num == 0 {
            0.0
        } else {
            self.update_times as f64 / self.cell_num as f64
        }
    }

    pub fn cell(&self, p: MapPoint) -> Option<(f64, f64)> {
        self.cells.get(&p).copied()
    }

    fn region_by_id(&self, id: RegionId) -> SenseMapResult<&Region> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .ok_or(SenseMapError::UnknownRegion(id))
    }

    fn prior_of(&self, key: MapPoint) -> f64 {
        self.prior.get(&key).copied().unwrap_or(1.0)
    }

    /// Initializes every cell: `mu = prior/range * intraD(region)/v`,
    /// `sigma = k(p, p)`. A uniform prior (range == 0) falls back to a
    /// denominator of 1.
    pub fn begin_updating(&mut self, categories: &CategoryTable) -> SenseMapResult<()> {
        let values: Vec<f64> = self.prior.values().copied().collect();
        let range = if values.is_empty() {
            1.0
        } else {
            let max = values.iter().cloned().fold(f64::MIN, f64::max);
            let min = values.iter().cloned().fold(f64::MAX, f64::min);
            let r = max - min;
            if r == 0.0 {
                1.0
            } else {
                r
            }
        };

        let region_ids: Vec<RegionId> = self.regions.iter().map(|r| r.id).collect();
        let ts_ids: Vec<TimeSlotId> = self.time_slots.iter().map(|t| t.id).collect();
        let cat_ids: Vec<CategoryId> = categories.ids().collect();

        for &reg_id in &region_ids {
            for &ts_id in &ts_ids {
                for &rc_id in &cat_ids {
                    let key = MapPoint::new(reg_id, ts_id, rc_id);
                    let cat = categories
                        .get(rc_id)
                        .ok_or(SenseMapError::UnknownCategory(rc_id))?;
                    let region = self.region_by_id(reg_id)?;
                    let p = self.prior_of(key);
                    let mu = p / range * cat.intra_d(region) / cat.speed;
                    let sigma = self.kernel.k(
                        key,
                        key,
                        &self.regions,
                        &self.time_slots,
                        categories,
                        self.area_diagonal,
                    );
                    self.cells.insert(key, (mu, sigma));
                }
            }
        }
        Ok(())
    }

    /// Records an observation and recomputes the GP posterior over every
    /// materialized cell. `real_used_time` is the actual elapsed in-region
    /// sensing duration; a `fatal` sense failure contributes a zero
    /// preference instead of being skipped entirely.
    pub fn update(
        &mut self,
        reg: RegionId,
        real_time: f64,
        real_used_time: f64,
        category: CategoryId,
        fatal: bool,
        categories: &CategoryTable,
    ) -> SenseMapResult<()> {
        let ts = cs_core::slot_containing(&self.time_slots, real_time, self.time_cycle_length)
            .ok_or(SenseMapError::TimeOutOfRange(real_time))?;
        let cat = categories
            .get(category)
            .ok_or(SenseMapError::UnknownCategory(category))?;
        let region = self.region_by_id(reg)?;
        let ideal_intra_time = cat.intra_d(region) / cat.speed;

        let r_perf = if fatal {
            0.0
        } else if real_used_time > 0.0 {
            (ideal_intra_time / real_used_time).clamp(0.0, 1.1)
        } else {
            1.1
        };

        let key = MapPoint::new(reg, ts.id, category);

        if self.history.len() > self.history_len {
            self.cycle_rollover();
        }
        self.history.push_back((r_perf, key));
        self.recompute_gp(categories);
        self.update_times += 1;
        Ok(())
    }

    fn cycle_rollover(&mut self) {
        for &(_, key) in &self.history {
            let acq = self.acquire(key, self.map_cycle_kappa);
            self.prior.insert(key, acq);
        }
        self.history.clear();
        self.update_times = 0;
    }

    pub fn acquire(&self, key: MapPoint, kappa: f64) -> f64 {
        let (mu, sigma) = self.cell(key).unwrap_or((0.0, 0.0));
        mu + kappa * sigma
    }

    fn recompute_gp(&mut self, categories: &CategoryTable) {
        if self.history.is_empty() {
            return;
        }
        let n = self.history.len();
        let p_diff: Vec<f64> = self
            .history
            .iter()
            .map(|&(perf, key)| perf - self.prior_of(key))
            .collect();

        let mut cov = DMatrix::<f64>::zeros(n, n);
        for (i, &(_, ki)) in self.history.iter().enumerate() {
            for (j, &(_, kj)) in self.history.iter().enumerate() {
                let mut v = self.kernel.k(
                    ki,
                    kj,
                    &self.regions,
                    &self.time_slots,
                    categories,
                    self.area_diagonal,
                );
                if i == j {
                    v += self.sigma_noise;
                }
                cov[(i, j)] = v;
            }
        }

        let keys: Vec<MapPoint> = self.cells.keys().copied().collect();
        let queries_cov: Vec<Vec<f64>> = keys
            .iter()
            .map(|&q| {
                self.history
                    .iter()
                    .map(|&(_, hk)| {
                        self.kernel.k(
                            q,
                            hk,
                            &self.regions,
                            &self.time_slots,
                            categories,
                            self.area_diagonal,
                        )
                    })
                    .collect()
            })
            .collect();
        let k_self: Vec<f64> = keys
            .iter()
            .map(|&q| {
                self.kernel.k(
                    q,
                    q,
                    &self.regions,
                    &self.time_slots,
                    categories,
                    self.area_diagonal,
                )
            })
            .collect();

        let posterior = gp::posterior(&cov, &p_diff, &queries_cov, &k_self);
        for (key, (mu_offset, sigma)) in keys.into_iter().zip(posterior) {
            let mu = self.prior_of(key) + mu_offset;
            self.cells.insert(key, (mu, sigma));
        }
    }

    /// A JSON/serde-friendly snapshot of the prior map — the serialization
    /// boundary named (but not detailed) by the scope note.
    pub fn dump_prior(&self) -> Vec<(MapPoint, f64)> {
        self.prior.iter().map(|(&k, &v)| (k, v)).collect()
    }

    pub fn load_prior(&mut self, snapshot: Vec<(MapPoint, f64)>) {
        self.prior = snapshot.into_iter().collect();
    }
}
