#![forbid(unsafe_code)]

//! # `protection_models`
//!
//! Bayesian inference for titre-based correlates of protection.
//!
//! The crate fits a four-parameter logistic dose-response curve linking
//! antibody titre to infection risk, using parallel-tempering MCMC: a ladder
//! of Metropolis-Hastings chains at geometrically spaced temperatures with
//! adaptive random-walk proposals and periodic replica swaps between adjacent
//! chains. Cold-chain draws approximate the posterior; split-R-hat and
//! autocorrelation-based effective sample sizes report convergence.

pub mod chain;
pub mod diagnostics;
pub mod input;
pub mod likelihood;
pub mod priors;
pub mod proposal;
pub mod tempering;
pub mod types;

pub use chain::TemperedChain;
pub use diagnostics::{
    MIN_DIAGNOSTIC_SAMPLES, autocorrelation, effective_sample_size, split_rhat,
};
pub use input::{CohortData, InputError};
pub use likelihood::{
    infection_probability, log_bernoulli_pmf, log_likelihood, log_posterior_tempered,
    logistic_stable,
};
pub use priors::{
    PriorConfig, log_beta_pdf, log_normal_pdf, log_prior, log_truncated_normal_pdf,
};
pub use proposal::AdaptiveProposal;
pub use tempering::{ParallelTempering, temperature_ladder};
pub use types::{
    CurveParams, LadderConfig, ProposalStats, ProposalTuning, SamplerConfig, SamplerError,
};
