//! Scenario-wide configuration, aggregating every knob from the design's §6.
//!
//! Mirrors the teacher's `SimConfig`: one plain data struct, constructible
//! directly or populated by an external driver (out of scope for this
//! crate), carrying a master RNG seed alongside the numerical knobs.

/// Utility weights and their normalizers for `ΔUtility` (design §4.3).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtilityWeights {
    pub thetas: [f64; 3],
    pub lambdas: [f64; 3],
}

impl UtilityWeights {
    /// `thetas` are normalized to sum to 1, matching the source's
    /// `[t / sum(thetas) for t in thetas]`.
    pub fn new(thetas: [f64; 3], lambdas: [f64; 3]) -> Self {
        let sum: f64 = thetas.iter().sum();
        Self {
            thetas: thetas.map(|t| t / sum),
            lambdas,
        }
    }
}

/// Every configuration knob enumerated in the design's §6, aggregated into
/// one value so a scenario run is fully described by a single struct.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioConfig {
    /// Side length of a grid region, in the sense area's coordinate units.
    pub grid_granularity: f64,
    /// Width of one time slot.
    pub time_granularity: f64,
    /// Length of the cyclic time horizon.
    pub time_cycle_length: f64,

    /// Multiplier in `[0, 1]` on agent count that sizes the self-repair
    /// locality scope (`k = (repair_k * num_agents).floor()`).
    pub repair_k: f64,
    /// Required sample count per subtask.
    pub gamma: u32,

    /// Allocator exploration weight in the acquisition function.
    pub kappa: f64,
    /// Exploration weight used when folding acquisition into the prior at
    /// cycle rollover.
    pub map_cycle_kappa: f64,

    /// Matérn kernel length-scale.
    pub rho: f64,
    /// Observation noise added to the GP covariance diagonal.
    pub sigma_noise: f64,

    /// History window length before a cycle rollover.
    pub history_len: usize,
    /// `update_ratio` threshold above which self-repair is triggered even
    /// absent a failure message.
    pub update_ratio_threshold: f64,

    pub utility: UtilityWeights,

    /// Master RNG seed; the same seed reproduces an identical run.
    pub seed: u64,

    /// Whether the self-repair loop is active at all.
    pub self_repair: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            grid_granularity: 10.0,
            time_granularity: 10.0,
            time_cycle_length: 100.0,
            repair_k: 1.0,
            gamma: 1,
            kappa: 0.03,
            map_cycle_kappa: 0.3,
            rho: 0.05,
            sigma_noise: 0.03,
            history_len: 10,
            update_ratio_threshold: 0.8,
            utility: UtilityWeights::new([1.0, 1.0, 3.0], [1.0, 1.0, 1.0]),
            seed: 0,
            self_repair: true,
        }
    }
}
