//! A single Metropolis-Hastings chain at a fixed temperature.

use rand::RngExt;
use rand::rngs::StdRng;

use crate::input::CohortData;
use crate::likelihood::log_posterior_tempered;
use crate::priors::PriorConfig;
use crate::proposal::AdaptiveProposal;
use crate::types::{CurveParams, ProposalStats, ProposalTuning};

/// One tempered chain: current state, cached tempered log-posterior, its own
/// adaptive proposer, acceptance counters, and the ordered sample trace.
#[derive(Debug, Clone)]
pub struct TemperedChain {
    temperature: f64,
    current: CurveParams,
    log_posterior: f64,
    proposal: AdaptiveProposal,
    stats: ProposalStats,
    adaptation_interval: usize,
    trace: Vec<CurveParams>,
}

impl TemperedChain {
    #[must_use]
    pub fn new(
        temperature: f64,
        initial: CurveParams,
        data: &CohortData,
        priors: PriorConfig,
        tuning: ProposalTuning,
    ) -> Self {
        Self {
            temperature,
            current: initial,
            log_posterior: log_posterior_tempered(initial, data, priors, temperature),
            proposal: AdaptiveProposal::new(tuning),
            stats: ProposalStats::default(),
            adaptation_interval: tuning.adaptation_interval,
            trace: Vec::new(),
        }
    }

    /// One Metropolis-Hastings update.
    ///
    /// Always consumes exactly one acceptance uniform and always appends the
    /// resulting state to the trace, accepted or not. A non-finite proposed
    /// log-posterior loses the comparison and is rejected. Every
    /// `adaptation_interval` steps the proposer is rescaled from the running
    /// acceptance rate.
    pub fn step(&mut self, data: &CohortData, priors: PriorConfig, rng: &mut StdRng) {
        let proposed = self.proposal.propose(self.current, rng);
        let proposed_log_posterior = log_posterior_tempered(proposed, data, priors, self.temperature);
        let log_acceptance = proposed_log_posterior - self.log_posterior;

        let accepted = rng.random::<f64>().ln() < log_acceptance;
        if accepted {
            self.current = proposed;
            self.log_posterior = proposed_log_posterior;
        }
        self.stats.record(accepted);
        self.trace.push(self.current);

        if self.stats.proposed.is_multiple_of(self.adaptation_interval) {
            self.proposal.adapt(self.stats.acceptance_rate());
        }
    }

    /// Replace the current state and recompute the cached log-posterior.
    ///
    /// Used by replica swaps, where the incoming state was evaluated at a
    /// different temperature.
    pub fn set_current(&mut self, params: CurveParams, data: &CohortData, priors: PriorConfig) {
        self.current = params;
        self.log_posterior = log_posterior_tempered(params, data, priors, self.temperature);
    }

    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    #[must_use]
    pub const fn current(&self) -> CurveParams {
        self.current
    }

    /// Cached tempered log-posterior of the current state.
    #[must_use]
    pub const fn log_posterior(&self) -> f64 {
        self.log_posterior
    }

    #[must_use]
    pub const fn stats(&self) -> ProposalStats {
        self.stats
    }

    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        self.stats.acceptance_rate()
    }

    /// Ordered sample trace, one entry per `step` call.
    #[must_use]
    pub fn trace(&self) -> &[CurveParams] {
        &self.trace
    }

    pub fn reserve_trace(&mut self, additional: usize) {
        self.trace.reserve(additional);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn cohort() -> CohortData {
        CohortData::new(vec![-2.0, 0.5, 3.0], vec![true, true, false])
    }

    fn initial() -> CurveParams {
        CurveParams {
            floor: 0.2,
            ceiling: 0.6,
            ec50: 0.0,
            slope: 1.0,
        }
    }

    #[test]
    fn construction_caches_the_tempered_log_posterior() {
        let data = cohort();
        let priors = PriorConfig::default();
        let chain = TemperedChain::new(2.0, initial(), &data, priors, ProposalTuning::default());
        assert_relative_eq!(
            chain.log_posterior(),
            log_posterior_tempered(initial(), &data, priors, 2.0),
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn stepping_appends_to_the_trace_and_counts_proposals() {
        let data = cohort();
        let priors = PriorConfig::default();
        let mut chain = TemperedChain::new(1.0, initial(), &data, priors, ProposalTuning::default());
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..250 {
            chain.step(&data, priors, &mut rng);
        }
        assert_eq!(chain.trace().len(), 250);
        assert_eq!(chain.stats().proposed, 250);
        assert!(chain.stats().accepted <= chain.stats().proposed);
        assert!((0.0..=1.0).contains(&chain.acceptance_rate()));
        for params in chain.trace() {
            assert!(params.in_support());
        }
    }

    #[test]
    fn fresh_chain_reports_zero_acceptance() {
        let data = cohort();
        let chain = TemperedChain::new(
            1.0,
            initial(),
            &data,
            PriorConfig::default(),
            ProposalTuning::default(),
        );
        assert!(chain.acceptance_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn set_current_recomputes_the_cache_at_the_chain_temperature() {
        let data = cohort();
        let priors = PriorConfig::default();
        let mut chain = TemperedChain::new(5.0, initial(), &data, priors, ProposalTuning::default());
        let replacement = CurveParams {
            floor: 0.05,
            ceiling: 0.4,
            ec50: 1.0,
            slope: 2.0,
        };
        chain.set_current(replacement, &data, priors);
        assert_eq!(chain.current(), replacement);
        assert_relative_eq!(
            chain.log_posterior(),
            log_posterior_tempered(replacement, &data, priors, 5.0),
            epsilon = 1.0e-12
        );
    }
}
