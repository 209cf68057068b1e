//! Core public types for the protection-curve sampler.

use crate::input::InputError;
use thiserror::Error;

/// Errors returned by sampler construction and configuration validation.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error("at least one chain is required; found {found}")]
    InvalidChainCount { found: usize },
    #[error("invalid prior hyperparameters")]
    InvalidPriorConfig,
    #[error("invalid proposal tuning configuration")]
    InvalidProposalTuning,
    #[error("invalid temperature ladder configuration")]
    InvalidLadderConfig,
}

/// Parameters of the four-parameter logistic protection curve.
///
/// Every vector output of the crate uses the field order
/// (floor, ceiling, ec50, slope).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    /// Fraction of maximal risk retained at high titre, in (0, 1).
    pub floor: f64,
    /// Infection probability at vanishing titre, in (0, 1).
    pub ceiling: f64,
    /// Titre at the inflection point of the curve.
    pub ec50: f64,
    /// Steepness of the protection transition, positive.
    pub slope: f64,
}

impl CurveParams {
    pub const N_PARAMS: usize = 4;

    /// Coordinates in the canonical (floor, ceiling, ec50, slope) order.
    #[must_use]
    pub const fn to_array(self) -> [f64; Self::N_PARAMS] {
        [self.floor, self.ceiling, self.ec50, self.slope]
    }

    /// Whether every coordinate lies strictly inside its domain.
    #[must_use]
    pub fn in_support(self) -> bool {
        self.floor > 0.0
            && self.floor < 1.0
            && self.ceiling > 0.0
            && self.ceiling < 1.0
            && self.ec50.is_finite()
            && self.slope > 0.0
    }
}

/// Temperature-ladder and replica-swap settings.
#[derive(Debug, Clone, Copy)]
pub struct LadderConfig {
    /// Temperature of the hottest chain; the ladder is geometric from 1.
    pub max_temperature: f64,
    /// Attempt one adjacent-pair swap every `swap_interval` iterations.
    pub swap_interval: usize,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            max_temperature: 10.0,
            swap_interval: 10,
        }
    }
}

impl LadderConfig {
    /// Whether the ladder settings are numerically valid.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.max_temperature.is_finite() && self.max_temperature > 1.0 && self.swap_interval > 0
    }
}

/// Random-walk scale and adaptation controls shared by every chain.
#[derive(Debug, Clone, Copy)]
pub struct ProposalTuning {
    /// Starting step size for every curve parameter.
    pub initial_step: f64,
    /// Lower clamp for adapted step sizes.
    pub min_step: f64,
    /// Upper clamp for adapted step sizes.
    pub max_step: f64,
    /// Adapt once every `adaptation_interval` proposals.
    pub adaptation_interval: usize,
    /// Acceptance rate the adaptation steers toward.
    pub target_acceptance: f64,
    /// Multiplicative step growth when acceptance is above target.
    pub increase_factor: f64,
    /// Multiplicative step shrinkage when acceptance is at or below target.
    pub decrease_factor: f64,
}

impl Default for ProposalTuning {
    fn default() -> Self {
        Self {
            initial_step: 0.1,
            min_step: 1.0e-3,
            max_step: 1.0,
            adaptation_interval: 50,
            target_acceptance: 0.234,
            increase_factor: 1.01,
            decrease_factor: 0.99,
        }
    }
}

impl ProposalTuning {
    /// Whether the tuning settings are numerically valid.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.min_step > 0.0
            && self.min_step <= self.initial_step
            && self.initial_step <= self.max_step
            && self.adaptation_interval > 0
            && self.target_acceptance > 0.0
            && self.target_acceptance < 1.0
            && self.increase_factor >= 1.0
            && self.decrease_factor > 0.0
            && self.decrease_factor <= 1.0
    }
}

/// Full sampler configuration.
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    /// RNG seed for reproducibility.
    pub seed: u64,
    pub ladder: LadderConfig,
    pub tuning: ProposalTuning,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ladder: LadderConfig::default(),
            tuning: ProposalTuning::default(),
        }
    }
}

impl SamplerConfig {
    /// # Errors
    ///
    /// Returns `SamplerError` if any configuration block is invalid.
    pub fn validate(self) -> Result<(), SamplerError> {
        if !self.ladder.is_valid() {
            return Err(SamplerError::InvalidLadderConfig);
        }
        if !self.tuning.is_valid() {
            return Err(SamplerError::InvalidProposalTuning);
        }
        Ok(())
    }
}

/// Proposal counters for one Metropolis-Hastings decision stream.
///
/// Used both for per-chain update steps and for ensemble replica swaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProposalStats {
    pub proposed: usize,
    pub accepted: usize,
}

impl ProposalStats {
    /// Record one proposal and whether it was accepted.
    pub const fn record(&mut self, accepted: bool) {
        self.proposed += 1;
        if accepted {
            self.accepted += 1;
        }
    }

    /// Acceptance rate in `[0, 1]`, or `0` if no proposals were made.
    #[must_use]
    pub fn acceptance_rate(self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            usize_to_f64(self.accepted) / usize_to_f64(self.proposed)
        }
    }
}

fn usize_to_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}
