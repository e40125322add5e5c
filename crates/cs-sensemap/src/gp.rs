//! Gaussian-process posterior update, translated from
//! `original_source/senseMap.py`'s `__update_gaussian_process` (`numpy`) to
//! `nalgebra`.

use nalgebra::{DMatrix, DVector};

/// Computes the posterior mean offset and variance for every query point,
/// given a fixed history of observations and a covariance function.
///
/// `cov_hist` is the |H|x|H| covariance matrix between history points (plus
/// `sigma_noise` on the diagonal, already added by the caller).
/// `cov_query_hist[q]` is the length-|H| covariance vector between query
/// point `q` and every history point. `k_self[q]` is `k(q, q)`.
///
/// Returns, per query point, `(mu_offset, sigma)`.
pub fn posterior(
    cov_hist: &DMatrix<f64>,
    residuals: &[f64],
    queries_cov: &[Vec<f64>],
    k_self: &[f64],
) -> Vec<(f64, f64)> {
    if residuals.is_empty() {
        return k_self.iter().map(|&k| (0.0, k)).collect();
    }

    let cov_inv = cov_hist
        .clone()
        .try_inverse()
        .expect("history covariance matrix must be invertible (sigma_noise regularizes it)");
    let p_diff = DVector::from_row_slice(residuals);

    queries_cov
        .iter()
        .zip(k_self.iter())
        .map(|(k_row, &k_qq)| {
            let k = DVector::from_row_slice(k_row);
            let alpha = &cov_inv * &p_diff;
            let mu = k.dot(&alpha);
            let beta = &cov_inv * &k;
            let sigma = (k_qq - k.dot(&beta)).max(0.0);
            (mu, sigma)
        })
        .collect()
}
