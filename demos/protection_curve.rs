use protection_models::{
    CohortData, CurveParams, ParallelTempering, PriorConfig, infection_probability,
};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

const N_PARTICIPANTS: usize = 400;
const N_CHAINS: usize = 15;
const ITERATIONS: usize = 20_000;
const WARMUP: usize = 5_000;
const SIMULATION_SEED: u64 = 41;

fn usize_to_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}

fn sample_standard_normal(rng: &mut StdRng) -> f64 {
    let u1 = (1.0_f64 - rng.random::<f64>()).max(f64::MIN_POSITIVE);
    let u2 = rng.random::<f64>();
    (-2.0_f64 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn simulate_cohort(truth: CurveParams, n_participants: usize, seed: u64) -> CohortData {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut titre = Vec::with_capacity(n_participants);
    let mut infected = Vec::with_capacity(n_participants);
    for _ in 0..n_participants {
        let value = 1.5 * sample_standard_normal(&mut rng);
        let risk = infection_probability(truth, value);
        titre.push(value);
        infected.push(rng.random::<f64>() < risk);
    }
    CohortData::new(titre, infected)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let truth = CurveParams {
        floor: 0.05,
        ceiling: 0.7,
        ec50: 0.3,
        slope: 1.8,
    };
    let data = simulate_cohort(truth, N_PARTICIPANTS, SIMULATION_SEED);
    let infection_count = data.infected.iter().filter(|&&outcome| outcome).count();

    let mut sampler = ParallelTempering::new(N_CHAINS, data, PriorConfig::default())?;
    sampler.run(ITERATIONS);

    println!("Correlates-of-protection curve fit");
    println!("Synthetic cohort: n={N_PARTICIPANTS}, infections={infection_count}");
    println!(
        "Sampler: chains={N_CHAINS}, iterations={ITERATIONS}, warmup={WARMUP}, hottest T={:.1}",
        sampler.temperatures()[N_CHAINS - 1]
    );
    let acceptance = sampler.acceptance_rates();
    println!(
        "Acceptance: cold chain={:.2}, hottest chain={:.2}, replica swaps={:.2}",
        acceptance[0],
        acceptance[N_CHAINS - 1],
        sampler.swap_rate()
    );

    let retained = &sampler.samples()[WARMUP..];
    let rhat = sampler.compute_rhat(WARMUP);
    let ess = sampler.compute_ess(WARMUP);
    let truth_coords = truth.to_array();
    for (index, name) in ["floor", "ceiling", "ec50", "slope"].iter().enumerate() {
        let mean = retained
            .iter()
            .map(|params| params.to_array()[index])
            .sum::<f64>()
            / usize_to_f64(retained.len());
        println!(
            "{name:>8}: posterior mean={mean:7.3}  truth={:7.3}  split-Rhat={:.3}  ESS={:7.0}",
            truth_coords[index], rhat[index], ess[index]
        );
    }

    Ok(())
}
