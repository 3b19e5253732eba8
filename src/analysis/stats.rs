//! Statistical helpers for the aggregate tables.

use once_cell::sync::Lazy;
use statrs::distribution::{ChiSquared, ContinuousCDF};

static CHI_SQUARED_1DF: Lazy<ChiSquared> =
    Lazy::new(|| ChiSquared::new(1.0).expect("chi-squared with 1 df"));

/// 95% Wilson score interval for a binomial proportion (z = 1.96).
///
/// Returns `(low, high)` clamped to `[0, 1]`; `n = 0` yields `(0.0, 0.0)`.
pub fn wilson_interval(successes: u64, n: u64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }
    let z = 1.96_f64;
    let n = n as f64;
    let p = successes as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = (z / denom) * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();
    ((center - margin).max(0.0), (center + margin).min(1.0))
}

/// McNemar's test on discordant pair counts, with continuity correction:
/// `statistic = (|b - c| - 1)^2 / (b + c)`, referred to chi-square with one
/// degree of freedom.
///
/// Returns `(statistic, p_value)`; `b + c = 0` yields p exactly 1.0.
pub fn mcnemar_test(b: u64, c: u64) -> (f64, f64) {
    if b + c == 0 {
        return (0.0, 1.0);
    }
    let diff = (b as f64 - c as f64).abs() - 1.0;
    let statistic = diff * diff / (b + c) as f64;
    let p = 1.0 - CHI_SQUARED_1DF.cdf(statistic);
    (statistic, p)
}

/// Cohen's h effect size between two proportions:
/// `h = 2 (arcsin sqrt(p1) - arcsin sqrt(p2))`.
pub fn cohen_h(p1: f64, p2: f64) -> f64 {
    2.0 * (p1.sqrt().asin() - p2.sqrt().asin())
}
