//! Parallel-tempering ensemble over the protection-curve posterior.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::chain::TemperedChain;
use crate::diagnostics::{MIN_DIAGNOSTIC_SAMPLES, effective_sample_size, split_rhat};
use crate::input::CohortData;
use crate::priors::PriorConfig;
use crate::types::{CurveParams, ProposalStats, SamplerConfig, SamplerError};

/// Geometric temperature ladder `T_k = T_max^(k / (K - 1))`.
///
/// A single chain degenerates to the untempered ladder `[1.0]`.
#[must_use]
pub fn temperature_ladder(n_chains: usize, max_temperature: f64) -> Vec<f64> {
    if n_chains == 1 {
        return vec![1.0];
    }
    let exponent_scale = usize_to_f64(n_chains - 1);
    (0..n_chains)
        .map(|rung| max_temperature.powf(usize_to_f64(rung) / exponent_scale))
        .collect()
}

/// Coupled ensemble of tempered Metropolis-Hastings chains.
///
/// Owns the cohort data, the priors, every chain, and the single random
/// source all of them draw from; chain 0 runs at temperature 1 and its trace
/// is the posterior sample.
#[derive(Debug)]
pub struct ParallelTempering {
    chains: Vec<TemperedChain>,
    data: CohortData,
    priors: PriorConfig,
    config: SamplerConfig,
    swap_stats: ProposalStats,
    rng: StdRng,
}

impl ParallelTempering {
    /// Build an ensemble with the reference configuration.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError` if no chains are requested, the cohort is
    /// invalid, or the prior hyperparameters are out of range.
    pub fn new(
        n_chains: usize,
        data: CohortData,
        priors: PriorConfig,
    ) -> Result<Self, SamplerError> {
        Self::with_config(n_chains, data, priors, SamplerConfig::default())
    }

    /// Build an ensemble with explicit ladder, tuning, and seed settings.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError` if any input or configuration block is invalid;
    /// no partial ensemble is constructed.
    pub fn with_config(
        n_chains: usize,
        data: CohortData,
        priors: PriorConfig,
        config: SamplerConfig,
    ) -> Result<Self, SamplerError> {
        if n_chains == 0 {
            return Err(SamplerError::InvalidChainCount { found: n_chains });
        }
        data.validate()?;
        if !priors.is_valid() {
            return Err(SamplerError::InvalidPriorConfig);
        }
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let chains = temperature_ladder(n_chains, config.ladder.max_temperature)
            .into_iter()
            .map(|temperature| {
                let initial = CurveParams {
                    floor: rng.random_range(0.01..0.5),
                    ceiling: rng.random_range(0.1..0.9),
                    ec50: rng.random_range(-2.0..2.0),
                    slope: rng.random_range(0.1..3.0),
                };
                TemperedChain::new(temperature, initial, &data, priors, config.tuning)
            })
            .collect();

        Ok(Self {
            chains,
            data,
            priors,
            config,
            swap_stats: ProposalStats::default(),
            rng,
        })
    }

    /// Reseed the shared generator; affects all subsequent draws.
    pub fn set_random_seed(&mut self, seed: u32) {
        self.rng = StdRng::seed_from_u64(u64::from(seed));
    }

    /// Advance every chain by `n_iterations` steps.
    ///
    /// Chains step in ladder order; on iteration indices divisible by the
    /// swap interval (the first included) one adjacent pair swap is
    /// attempted. The draw order against the shared generator is fixed and
    /// independent of acceptance outcomes.
    pub fn run(&mut self, n_iterations: usize) {
        for chain in &mut self.chains {
            chain.reserve_trace(n_iterations);
        }
        let swap_interval = self.config.ladder.swap_interval;
        for iteration in 0..n_iterations {
            let Self {
                chains,
                data,
                priors,
                rng,
                ..
            } = self;
            for chain in chains.iter_mut() {
                chain.step(data, *priors, rng);
            }
            if iteration.is_multiple_of(swap_interval) && self.chains.len() > 1 {
                self.attempt_swap();
            }
        }
    }

    /// One Metropolis replica-swap attempt between a random adjacent pair.
    ///
    /// Both cached tempered log-posteriors share the same prior term, so the
    /// ratio reduces to the likelihood difference reweighted by the inverse
    /// temperatures.
    fn attempt_swap(&mut self) {
        let lower = self.rng.random_range(0..self.chains.len() - 1);
        let upper = lower + 1;
        let log_ratio = (self.chains[lower].log_posterior() - self.chains[upper].log_posterior())
            * (self.chains[upper].temperature().recip()
                - self.chains[lower].temperature().recip());

        let accepted = self.rng.random::<f64>().ln() < log_ratio;
        if accepted {
            let lower_state = self.chains[lower].current();
            let upper_state = self.chains[upper].current();
            self.chains[lower].set_current(upper_state, &self.data, self.priors);
            self.chains[upper].set_current(lower_state, &self.data, self.priors);
        }
        self.swap_stats.record(accepted);
    }

    /// Cold-chain trace accumulated across all `run` calls so far.
    #[must_use]
    pub fn samples(&self) -> &[CurveParams] {
        self.chains[0].trace()
    }

    /// Split-R-hat per parameter after discarding `warmup` samples.
    ///
    /// Returns the all-converged sentinel `[1.0; 4]` when fewer than
    /// [`MIN_DIAGNOSTIC_SAMPLES`] samples remain.
    #[must_use]
    pub fn compute_rhat(&self, warmup: usize) -> [f64; CurveParams::N_PARAMS] {
        self.diagnostic(warmup, [1.0; CurveParams::N_PARAMS], split_rhat)
    }

    /// Effective sample size per parameter after discarding `warmup` samples.
    ///
    /// Returns `[0.0; 4]` when fewer than [`MIN_DIAGNOSTIC_SAMPLES`] samples
    /// remain.
    #[must_use]
    pub fn compute_ess(&self, warmup: usize) -> [f64; CurveParams::N_PARAMS] {
        self.diagnostic(warmup, [0.0; CurveParams::N_PARAMS], effective_sample_size)
    }

    /// Accepted fraction of replica-swap attempts, `0` before any attempt.
    #[must_use]
    pub fn swap_rate(&self) -> f64 {
        self.swap_stats.acceptance_rate()
    }

    /// Swap counters across all `run` calls.
    #[must_use]
    pub const fn swap_stats(&self) -> ProposalStats {
        self.swap_stats
    }

    /// Per-chain acceptance rates in ladder order.
    #[must_use]
    pub fn acceptance_rates(&self) -> Vec<f64> {
        self.chains.iter().map(TemperedChain::acceptance_rate).collect()
    }

    /// Chain temperatures in ladder order.
    #[must_use]
    pub fn temperatures(&self) -> Vec<f64> {
        self.chains.iter().map(TemperedChain::temperature).collect()
    }

    #[must_use]
    pub const fn n_chains(&self) -> usize {
        self.chains.len()
    }

    fn diagnostic(
        &self,
        warmup: usize,
        sentinel: [f64; CurveParams::N_PARAMS],
        statistic: fn(&[f64]) -> f64,
    ) -> [f64; CurveParams::N_PARAMS] {
        let retained = self.samples().get(warmup..).unwrap_or(&[]);
        if retained.len() < MIN_DIAGNOSTIC_SAMPLES {
            return sentinel;
        }
        std::array::from_fn(|index| {
            let series: Vec<f64> = retained
                .iter()
                .map(|params| params.to_array()[index])
                .collect();
            statistic(&series)
        })
    }
}

fn usize_to_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}
