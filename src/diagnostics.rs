//! Convergence diagnostics for cold-chain traces.

/// Fewest post-warmup samples for which the diagnostics are meaningful;
/// below this the sampler facade returns sentinel values instead.
pub const MIN_DIAGNOSTIC_SAMPLES: usize = 100;

const MAX_AUTOCORRELATION_LAG: usize = 100;

/// Split-R-hat from the two contiguous halves of a single scalar trace.
///
/// The first half has length `n / 2`, the second the remainder. Degenerate
/// within-chain variance yields the converged value `1`.
#[must_use]
pub fn split_rhat(series: &[f64]) -> f64 {
    let half = series.len() / 2;
    if half < 2 {
        return 1.0;
    }
    let (first, second) = series.split_at(half);

    let mean_first = mean(first);
    let mean_second = mean(second);
    let within =
        (sample_variance(first, mean_first) + sample_variance(second, mean_second)) / 2.0;
    if !(within.is_finite() && within > 0.0) {
        return 1.0;
    }

    let overall = (mean_first + mean_second) / 2.0;
    let half_len = usize_to_f64(half);
    let deviation_first = mean_first - overall;
    let deviation_second = mean_second - overall;
    let between = half_len
        * deviation_first.mul_add(deviation_first, deviation_second * deviation_second);
    let marginal = ((half_len - 1.0) / half_len).mul_add(within, between / half_len);
    (marginal / within).sqrt()
}

/// Lag-`lag` autocorrelation normalized by `(n - lag)` times the sample
/// variance.
#[must_use]
pub fn autocorrelation(series: &[f64], lag: usize) -> f64 {
    if lag == 0 || lag >= series.len() {
        return 0.0;
    }
    let mean_value = mean(series);
    let variance = sample_variance(series, mean_value);
    if !(variance.is_finite() && variance > 0.0) {
        return 0.0;
    }

    let mut accumulated = 0.0;
    for index in lag..series.len() {
        accumulated += (series[index] - mean_value) * (series[index - lag] - mean_value);
    }
    accumulated / (usize_to_f64(series.len() - lag) * variance)
}

/// Effective sample size from truncated autocorrelation.
///
/// Lags run from 1 up to `min(100, n / 2) - 1`; the first negative
/// autocorrelation ends the scan but still enters the sum. A zero-variance
/// trace carries no information and reports `0`.
#[must_use]
pub fn effective_sample_size(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }
    let mean_value = mean(series);
    let variance = sample_variance(series, mean_value);
    if !(variance.is_finite() && variance > 0.0) {
        return 0.0;
    }

    let max_lag = MAX_AUTOCORRELATION_LAG.min(n / 2);
    let mut rho_sum = 0.0;
    for lag in 1..max_lag {
        let rho = autocorrelation(series, lag);
        rho_sum += rho;
        if rho < 0.0 {
            break;
        }
    }
    usize_to_f64(n) / 2.0f64.mul_add(rho_sum, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / usize_to_f64(values.len())
}

fn sample_variance(values: &[f64], mean_value: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values
        .iter()
        .map(|value| {
            let centered = value - mean_value;
            centered * centered
        })
        .sum::<f64>()
        / usize_to_f64(values.len() - 1)
}

fn usize_to_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}
