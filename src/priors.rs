//! Prior specification and log-density helpers for the protection curve.

use statrs::function::erf::erf;

use crate::types::CurveParams;

const EPS_PROBABILITY: f64 = 1.0e-12;

/// Hyperparameters of the four independent parameter priors.
///
/// `floor` and `ceiling` carry Beta priors, `ec50` a Normal prior, and
/// `slope` a Normal prior truncated below at zero.
#[derive(Debug, Clone, Copy)]
pub struct PriorConfig {
    /// Shape `alpha` of the Beta prior on `floor`.
    pub floor_alpha: f64,
    /// Shape `beta` of the Beta prior on `floor`.
    pub floor_beta: f64,
    /// Shape `alpha` of the Beta prior on `ceiling`.
    pub ceiling_alpha: f64,
    /// Shape `beta` of the Beta prior on `ceiling`.
    pub ceiling_beta: f64,
    /// Mean of the Normal prior on `ec50`.
    pub ec50_mean: f64,
    /// Standard deviation of the Normal prior on `ec50`.
    pub ec50_sd: f64,
    /// Location of the truncated Normal prior on `slope`.
    pub slope_mean: f64,
    /// Scale of the truncated Normal prior on `slope`.
    pub slope_sd: f64,
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            floor_alpha: 1.0,
            floor_beta: 1.0,
            ceiling_alpha: 1.0,
            ceiling_beta: 1.0,
            ec50_mean: 0.0,
            ec50_sd: 1.0,
            slope_mean: 1.0,
            slope_sd: 1.0,
        }
    }
}

impl PriorConfig {
    /// Whether all prior hyperparameters are numerically valid.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.floor_alpha > 0.0
            && self.floor_beta > 0.0
            && self.ceiling_alpha > 0.0
            && self.ceiling_beta > 0.0
            && self.ec50_mean.is_finite()
            && self.ec50_sd > 0.0
            && self.slope_mean.is_finite()
            && self.slope_sd > 0.0
    }
}

/// Log-density of `Beta(alpha, beta)`, without its normalizing constant.
///
/// The normalizer depends only on the hyperparameters, which are fixed for a
/// run, so it must be omitted consistently wherever the prior enters an
/// acceptance ratio.
#[must_use]
pub fn log_beta_pdf(value: f64, alpha: f64, beta: f64) -> f64 {
    if value <= 0.0 || value >= 1.0 {
        return f64::NEG_INFINITY;
    }
    (alpha - 1.0).mul_add(value.ln(), (beta - 1.0) * (-value).ln_1p())
}

/// Log-density of `Normal(mean, sd)`.
#[must_use]
pub fn log_normal_pdf(value: f64, mean: f64, sd: f64) -> f64 {
    let z = (value - mean) / sd;
    -0.5 * z.mul_add(z, std::f64::consts::TAU.ln()) - sd.ln()
}

/// Log-CDF of the standard normal with finite clipping.
#[must_use]
pub fn log_standard_normal_cdf(value: f64) -> f64 {
    let cdf = 0.5 * (1.0 + erf(value / std::f64::consts::SQRT_2));
    cdf.clamp(EPS_PROBABILITY, 1.0 - EPS_PROBABILITY).ln()
}

/// Log-density of `Normal(mean, sd)` truncated below at zero.
///
/// The truncation mass above zero is `1 - Phi(-mean/sd) = Phi(mean/sd)`.
#[must_use]
pub fn log_truncated_normal_pdf(value: f64, mean: f64, sd: f64) -> f64 {
    if value <= 0.0 {
        return f64::NEG_INFINITY;
    }
    log_normal_pdf(value, mean, sd) - log_standard_normal_cdf(mean / sd)
}

/// Joint log-prior over all four curve parameters.
#[must_use]
pub fn log_prior(params: CurveParams, priors: PriorConfig) -> f64 {
    log_beta_pdf(params.floor, priors.floor_alpha, priors.floor_beta)
        + log_beta_pdf(params.ceiling, priors.ceiling_alpha, priors.ceiling_beta)
        + log_normal_pdf(params.ec50, priors.ec50_mean, priors.ec50_sd)
        + log_truncated_normal_pdf(params.slope, priors.slope_mean, priors.slope_sd)
}
