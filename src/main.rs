use anyhow::Result;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

use tumor_ca::{
    find_clusters, reconstruct, run, run_cluster_trace, run_trajectory, sweep_time_delays, History,
};
use tumor_common::{OutputMode, SimulationConfig};

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting tumor growth automaton...");

    // --- Load Configuration ---
    let config = SimulationConfig::load("config.toml")?;
    let params = config.get_sim_params();
    let positions = config.initial_positions();
    let generations = config.timing.generations;
    debug!("Simulation Parameters: {:#?}", params);

    let mut rng = StdRng::seed_from_u64(config.initial_conditions.seed);
    let start_time = Instant::now();

    // --- Main Run ---
    let history = match config.output.mode {
        OutputMode::History => run(&params, generations, &positions, &mut rng)?,
        OutputMode::Trajectory => {
            let trajectory = run_trajectory(&params, generations, &positions, &mut rng)?;
            if let Some(last) = trajectory.grids.last() {
                info!("Final grid holds {} clusters.", find_clusters(last).len());
            }
            trajectory.history
        }
        OutputMode::Clusters => {
            let trace = run_cluster_trace(
                &params,
                generations,
                &positions,
                config.analysis.metastasis_cluster_threshold,
                &mut rng,
            )?;
            let peak = trace.cluster_counts.iter().copied().max().unwrap_or(0);
            info!(
                "Peak cluster count {} | Tm: {}",
                peak,
                trace
                    .metastasis_generation
                    .map_or_else(|| "not reached".to_string(), |tm| tm.to_string())
            );
            trace.history
        }
    };
    info!(
        "Simulated {} generations in {:.3} s.",
        history.len(),
        start_time.elapsed().as_secs_f64()
    );

    summarize_embedding(&history, &config);

    // --- Optional Time-Delay Sweep ---
    let delays = &config.analysis.sweep_time_delays;
    if !delays.is_empty() {
        let sweep_start = Instant::now();
        let results = sweep_time_delays(
            &params,
            generations,
            &positions,
            delays,
            config.initial_conditions.seed,
        )?;
        for result in &results {
            let last = result.history.iter().last().map(|(_, record)| record.cancer_count);
            info!(
                "tau={:>3} | final recorded cancer count: {}",
                result.time_delay,
                last.unwrap_or(0)
            );
        }
        info!(
            "Sweep of {} runs finished in {:.3} s.",
            results.len(),
            sweep_start.elapsed().as_secs_f64()
        );
    }

    info!("Simulation Complete.");
    Ok(())
}

/// Logs the size and extent of the delay embedding of the cancer-count series.
fn summarize_embedding(history: &History, config: &SimulationConfig) {
    let tau = config.analysis.embedding_tau;
    let dimension = config.analysis.embedding_dimension;
    match reconstruct(&history.cancer_series(), tau, dimension) {
        Ok(vectors) => {
            let max_norm = vectors
                .iter()
                .map(|v| v.iter().map(|x| x * x).sum::<f64>().sqrt())
                .fold(0.0, f64::max);
            info!(
                "Delay embedding (tau={}, d={}): {} vectors, max norm {:.2}",
                tau,
                dimension,
                vectors.len(),
                max_norm
            );
        }
        Err(e) => warn!("Skipping delay embedding: {}", e),
    }
}
