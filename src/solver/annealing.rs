use log::{debug, info, trace, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{AnnealingConfig, HeuristicKind};
use crate::moves::Moves;
use crate::solver::{heuristic, replay};
use crate::state::State;

/// Walks a single path through the state space, picking moves at random
/// with a preference for lower Manhattan distance, and accepting worse states
/// less and less often as the temperature drops.
#[derive(Debug)]
pub struct SimulatedAnnealing {
    start: State,
    config: AnnealingConfig,
    seed: u64,
    rng: StdRng,
    nodes_expanded: u64,
    pull_moves: u32,
    rounds: u64,
}

impl SimulatedAnnealing {
    pub fn new(start: &State, config: &AnnealingConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!("Simulated annealing seed: {}", seed);

        SimulatedAnnealing {
            start: start.clone(),
            config: config.clone(),
            seed,
            rng: StdRng::seed_from_u64(seed),
            nodes_expanded: 0,
            pull_moves: 0,
            rounds: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generated successors over all rounds.
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }

    /// Pulls in the accepted path, whether it reached the goal or not.
    pub fn pull_moves(&self) -> u32 {
        self.pull_moves
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn solve(&mut self) -> Option<Moves> {
        debug!(
            "Simulated annealing with {} heuristic, deadlocks: {}, temperature {} -> {}",
            self.config.heuristic, self.config.deadlocks, self.config.initial_temp, self.config.min_temp
        );

        let mut current = self.start.clone();
        let mut path = Moves::default();
        let mut temp = self.config.initial_temp;

        while temp > self.config.min_temp && !current.is_solved() {
            self.rounds += 1;
            let current_h =
                heuristic::evaluate(self.config.heuristic, &current, &self.config.deadlocks);

            let mut successors: Vec<_> = current
                .possible_moves()
                .into_iter()
                .filter_map(|mov| current.successor(mov).ok().map(|next| (mov, next)))
                .collect();
            self.nodes_expanded += successors.len() as u64;

            let scores: Vec<f64> = successors
                .iter()
                .map(|(_, next)| {
                    heuristic::evaluate(HeuristicKind::ManhattanSum, next, &self.config.deadlocks)
                })
                .collect();

            if let Some(index) = self.sample(&scores) {
                let score = scores[index];
                let accept = score < current_h
                    || ((current_h - score) / (temp * self.config.scale)).exp()
                        > self.rng.gen::<f64>();
                if accept {
                    let (mov, next) = successors.swap_remove(index);
                    trace!("Accepted {} (score {}, current {}, temp {})", mov, score, current_h, temp);
                    path.add(mov);
                    current = next;
                }
            }

            temp *= 1.0 - self.config.decay_rate;
        }

        self.pull_moves = match replay(&self.start, &path) {
            Ok(end) => end.pulls(),
            Err(err) => {
                warn!("Replaying the annealing path failed: {}", err);
                current.pulls()
            }
        };

        debug!(
            "Simulated annealing finished after {} rounds, {} nodes, solved: {}",
            self.rounds,
            self.nodes_expanded,
            current.is_solved()
        );
        if current.is_solved() {
            Some(path)
        } else {
            None
        }
    }

    /// Softmax over negative scores. Infinite scores are never picked,
    /// `None` if there's nothing to pick from.
    fn sample(&mut self, scores: &[f64]) -> Option<usize> {
        let best = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        if best.is_infinite() {
            return None;
        }

        let weights = scores.iter().map(|&score| (best - score).exp());
        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Deadlock, Deadlocks};
    use crate::level::Level;

    use super::*;

    fn state(level: &str, pulls_allowed: bool) -> State {
        let level: Level = level.parse().unwrap();
        level.initial_state(pulls_allowed).unwrap()
    }

    fn fast_config(seed: u64) -> AnnealingConfig {
        AnnealingConfig {
            initial_temp: 100.0,
            decay_rate: 0.01,
            seed: Some(seed),
            ..AnnealingConfig::default()
        }
    }

    #[test]
    fn single_push() {
        let s = state(
            r"
#####
#@$.#
#####
",
            true,
        );
        let mut sa = SimulatedAnnealing::new(&s, &fast_config(1));
        assert_eq!(sa.solve().unwrap().to_string(), "R");
        assert_eq!(sa.nodes_expanded(), 1);
        assert_eq!(sa.rounds(), 1);
        assert_eq!(sa.pull_moves(), 0);
    }

    #[test]
    fn terminates_within_temperature_bound() {
        let s = state(
            r"
########
#@     #
# $  $ #
#  ..  #
########
",
            true,
        );
        // rounds needed to cool from 100 to 1 by 1 % each round
        let max_rounds = (100.0_f64.ln() / -(0.99_f64.ln())).ceil() as u64 + 1;
        for &seed in &[1, 2] {
            let mut sa = SimulatedAnnealing::new(&s, &fast_config(seed));
            assert_eq!(sa.seed(), seed);
            let solution = sa.solve();
            assert!(sa.rounds() <= max_rounds);
            assert!(sa.nodes_expanded() >= sa.rounds());

            if let Some(moves) = solution {
                let end = replay(&s, &moves).unwrap();
                assert!(end.is_solved());
                assert_eq!(end.pulls(), sa.pull_moves());
                assert_eq!(moves.pull_cnt(), sa.pull_moves() as usize);
            }
        }
    }

    #[test]
    fn same_seed_same_result() {
        let s = state(
            r"
#######
#@    #
# $ $ #
#  .. #
#######
",
            true,
        );
        let mut a = SimulatedAnnealing::new(&s, &fast_config(7));
        let mut b = SimulatedAnnealing::new(&s, &fast_config(7));
        assert_eq!(a.solve(), b.solve());
        assert_eq!(a.nodes_expanded(), b.nodes_expanded());
        assert_eq!(a.pull_moves(), b.pull_moves());
    }

    #[test]
    fn corner_deadlock() {
        let s = state(
            r"
#####
#$  #
# @.#
#####
",
            false,
        );
        let mut config = fast_config(3);
        config.deadlocks = Deadlocks::new(vec![Deadlock::Corner]);
        let mut sa = SimulatedAnnealing::new(&s, &config);
        assert_eq!(sa.solve(), None);
        // every successor is a deadlock so nothing is ever accepted
        assert_eq!(sa.pull_moves(), 0);
        assert!(sa.nodes_expanded() > 0);
    }

    #[test]
    fn random_seed_is_reported() {
        let s = state(
            r"
#####
#@$.#
#####
",
            true,
        );
        let config = AnnealingConfig {
            seed: None,
            ..fast_config(0)
        };
        let sa = SimulatedAnnealing::new(&s, &config);
        let mut again = SimulatedAnnealing::new(&s, &fast_config(sa.seed()));
        assert_eq!(again.solve().map(|m| m.to_string()), Some("R".to_string()));
    }
}
