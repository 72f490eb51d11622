//! Independent runs over a range of feedback delays.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tumor_common::{Coord, Result, SimParams};

use crate::history::History;
use crate::simulation::run;

/// History of one run in a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub time_delay: u32,
    pub history: History,
}

/// Seed used for the run with the given delay.
pub fn sweep_seed(base_seed: u64, time_delay: u32) -> u64 {
    base_seed.wrapping_add(time_delay as u64)
}

/// Runs one history-only simulation per entry of `time_delays` in parallel.
///
/// Each run owns a `StdRng` seeded from `base_seed` and its own delay, so a
/// delay's result is the same whatever else is in the sweep. Results keep the
/// order of `time_delays`; the first failing run aborts the sweep.
pub fn sweep_time_delays(
    params: &SimParams,
    generations: u32,
    initial_positions: &[Coord],
    time_delays: &[u32],
    base_seed: u64,
) -> Result<Vec<SweepResult>> {
    info!(
        "Sweeping {} time delays on {} Rayon threads",
        time_delays.len(),
        rayon::current_num_threads()
    );
    time_delays
        .par_iter()
        .map(|&time_delay| -> Result<SweepResult> {
            let run_params = SimParams {
                time_delay,
                ..params.clone()
            };
            let mut rng = StdRng::seed_from_u64(sweep_seed(base_seed, time_delay));
            let history = run(&run_params, generations, initial_positions, &mut rng)?;
            Ok(SweepResult {
                time_delay,
                history,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SimParams {
        SimParams {
            phi: 200.0,
            ..SimParams::with_dimensions(21, 21)
        }
    }

    #[test]
    fn test_results_keep_input_order() {
        let p = params();
        let seed = p.default_seed_positions();
        let results = sweep_time_delays(&p, 10, &seed, &[3, 0, 7], 42).unwrap();
        let delays: Vec<u32> = results.iter().map(|r| r.time_delay).collect();
        assert_eq!(delays, vec![3, 0, 7]);
        assert!(results.iter().all(|r| r.history.len() == 10));
    }

    #[test]
    fn test_each_run_matches_a_serial_run() {
        let p = params();
        let seed = p.default_seed_positions();
        let results = sweep_time_delays(&p, 15, &seed, &[0, 1, 2, 5], 7).unwrap();
        for result in results {
            let serial_params = SimParams {
                time_delay: result.time_delay,
                ..p.clone()
            };
            let mut rng = StdRng::seed_from_u64(sweep_seed(7, result.time_delay));
            let expected = run(&serial_params, 15, &seed, &mut rng).unwrap();
            assert_eq!(result.history, expected);
        }
    }

    #[test]
    fn test_invalid_run_fails_whole_sweep() {
        let p = params();
        assert!(sweep_time_delays(&p, 0, &[(10, 10)], &[0, 1], 1).is_err());
    }
}
