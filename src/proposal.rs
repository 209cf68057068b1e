//! Adaptive Gaussian random-walk proposals with boundary reflection.

use rand::RngExt;
use rand::rngs::StdRng;

use crate::types::{CurveParams, ProposalTuning};

/// Per-chain random-walk proposer with one step size per curve parameter.
#[derive(Debug, Clone)]
pub struct AdaptiveProposal {
    step_sizes: [f64; CurveParams::N_PARAMS],
    tuning: ProposalTuning,
}

impl AdaptiveProposal {
    #[must_use]
    pub const fn new(tuning: ProposalTuning) -> Self {
        Self {
            step_sizes: [tuning.initial_step; CurveParams::N_PARAMS],
            tuning,
        }
    }

    /// Current step sizes in (floor, ceiling, ec50, slope) order.
    #[must_use]
    pub const fn step_sizes(&self) -> [f64; CurveParams::N_PARAMS] {
        self.step_sizes
    }

    /// Propose a candidate by perturbing each coordinate independently.
    ///
    /// Bounded coordinates are folded back across their boundaries until they
    /// lie strictly inside the domain; the fold is symmetric, so no proposal
    /// density correction enters the acceptance ratio.
    #[must_use]
    pub fn propose(&self, current: CurveParams, rng: &mut StdRng) -> CurveParams {
        let floor = reflect_unit_interval(
            self.step_sizes[0].mul_add(sample_standard_normal(rng), current.floor),
        );
        let ceiling = reflect_unit_interval(
            self.step_sizes[1].mul_add(sample_standard_normal(rng), current.ceiling),
        );
        let ec50 = self.step_sizes[2].mul_add(sample_standard_normal(rng), current.ec50);
        let slope = reflect_positive(
            self.step_sizes[3].mul_add(sample_standard_normal(rng), current.slope),
        );
        CurveParams {
            floor,
            ceiling,
            ec50,
            slope,
        }
    }

    /// Rescale every step size toward the target acceptance rate.
    pub fn adapt(&mut self, acceptance_rate: f64) {
        let factor = if acceptance_rate > self.tuning.target_acceptance {
            self.tuning.increase_factor
        } else {
            self.tuning.decrease_factor
        };
        for step in &mut self.step_sizes {
            *step = (*step * factor).clamp(self.tuning.min_step, self.tuning.max_step);
        }
    }
}

/// Standard normal draw via Box-Muller; consumes two uniforms per call.
fn sample_standard_normal(rng: &mut StdRng) -> f64 {
    let u1 = (1.0_f64 - rng.random::<f64>()).max(f64::MIN_POSITIVE);
    let u2 = rng.random::<f64>();
    (-2.0_f64 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn reflect_unit_interval(mut value: f64) -> f64 {
    while value <= 0.0 || value >= 1.0 {
        if value <= 0.0 {
            value = -value;
        }
        if value >= 1.0 {
            value = 2.0 - value;
        }
    }
    value
}

fn reflect_positive(mut value: f64) -> f64 {
    while value <= 0.0 {
        value = -value;
    }
    value
}
