//! Likelihood of the four-parameter logistic protection model.

use crate::input::CohortData;
use crate::priors::{PriorConfig, log_prior};
use crate::types::CurveParams;

/// Numerically stable logistic transform.
#[must_use]
pub fn logistic_stable(value: f64) -> f64 {
    if value >= 0.0 {
        let z = (-value).exp();
        1.0 / (1.0 + z)
    } else {
        let z = value.exp();
        z / (1.0 + z)
    }
}

/// Infection probability at a single titre under the protection curve.
///
/// `ceiling` scales the whole curve, `floor` is the residual risk fraction
/// that survives at high titre, `ec50` centres the transition, and `slope`
/// sets its steepness.
#[must_use]
pub fn infection_probability(params: CurveParams, titre: f64) -> f64 {
    let unprotected = logistic_stable(-params.slope * (titre - params.ec50));
    params.ceiling * unprotected.mul_add(1.0 - params.floor, params.floor)
}

/// Bernoulli log-probability mass; `-inf` for degenerate probabilities.
#[must_use]
pub fn log_bernoulli_pmf(infected: bool, probability: f64) -> f64 {
    if !(probability > 0.0 && probability < 1.0) {
        return f64::NEG_INFINITY;
    }
    if infected {
        probability.ln()
    } else {
        (-probability).ln_1p()
    }
}

/// Cohort log-likelihood; short-circuits to `-inf` on the first degenerate
/// observation.
#[must_use]
pub fn log_likelihood(params: CurveParams, data: &CohortData) -> f64 {
    let mut total = 0.0;
    for (&titre, &infected) in data.titre.iter().zip(&data.infected) {
        total += log_bernoulli_pmf(infected, infection_probability(params, titre));
        if !total.is_finite() {
            return f64::NEG_INFINITY;
        }
    }
    total
}

/// Tempered log-posterior `log prior + log likelihood / temperature`.
///
/// `-inf` whenever either addend is non-finite, which downstream acceptance
/// tests treat as automatic rejection.
#[must_use]
pub fn log_posterior_tempered(
    params: CurveParams,
    data: &CohortData,
    priors: PriorConfig,
    temperature: f64,
) -> f64 {
    let prior = log_prior(params, priors);
    if !prior.is_finite() {
        return f64::NEG_INFINITY;
    }
    let likelihood = log_likelihood(params, data);
    if !likelihood.is_finite() {
        return f64::NEG_INFINITY;
    }
    prior + likelihood / temperature
}
