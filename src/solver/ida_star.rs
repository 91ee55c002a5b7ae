use std::mem;

use fnv::{FnvHashMap, FnvHashSet};
use log::{debug, info};

use crate::config::IdaConfig;
use crate::moves::{Move, Moves};
use crate::solver::heuristic;
use crate::solver::stats::Stats;
use crate::state::{State, StateKey};

enum Outcome {
    Found,
    /// Smallest `g + h` which exceeded the threshold somewhere below.
    Bound(f64),
}

/// Keeps a state in the set of states on the current DFS path for as long as it's alive.
struct PathGuard<'a> {
    visited: &'a mut FnvHashSet<StateKey>,
    key: StateKey,
}

impl<'a> PathGuard<'a> {
    /// `None` if the state is already on the path.
    fn enter(visited: &'a mut FnvHashSet<StateKey>, key: StateKey) -> Option<Self> {
        if visited.insert(key.clone()) {
            Some(PathGuard { visited, key })
        } else {
            None
        }
    }

    fn visited(&mut self) -> &mut FnvHashSet<StateKey> {
        self.visited
    }
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.visited.remove(&self.key);
    }
}

/// Iterative deepening A*: repeated depth first searches, each bounded by `g + h`.
#[derive(Debug)]
pub struct IdaStar {
    start: State,
    config: IdaConfig,
    nodes_expanded: u64,
    stats: Stats,
    /// Best `g` reached for each state during the current iteration.
    cost_memo: FnvHashMap<StateKey, u32>,
    path_visited: FnvHashSet<StateKey>,
}

impl IdaStar {
    pub fn new(start: &State, config: &IdaConfig) -> Self {
        IdaStar {
            start: start.clone(),
            config: config.clone(),
            nodes_expanded: 0,
            stats: Stats::new(),
            cost_memo: FnvHashMap::default(),
            path_visited: FnvHashSet::default(),
        }
    }

    /// Search calls over all iterations, pruned ones included.
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn solve(&mut self) -> Option<Moves> {
        debug!(
            "IDA* with {} heuristic, deadlocks: {}, max depth {}",
            self.config.heuristic, self.config.deadlocks, self.config.max_depth
        );

        let mut threshold = self.heuristic(&self.start);
        if threshold.is_infinite() {
            debug!("Initial state is a deadlock");
            return None;
        }

        let start = self.start.clone();
        let mut visited = mem::take(&mut self.path_visited);
        let mut path = Vec::new();
        let solution = loop {
            info!("IDA* iteration with threshold {}", threshold);
            self.stats.start_iteration(threshold);
            self.cost_memo.clear();
            self.cost_memo.insert(start.key(), 0);

            match self.search(&mut visited, &start, 0, threshold, &mut path) {
                Outcome::Found => break Some(Moves::new(path)),
                Outcome::Bound(next) if next.is_infinite() => break None,
                Outcome::Bound(next) => threshold = next,
            }
        };
        debug_assert!(visited.is_empty());
        self.path_visited = visited;

        debug!(
            "IDA* finished after {} iterations, {} nodes",
            self.stats.iterations(),
            self.nodes_expanded
        );
        solution
    }

    fn heuristic(&self, state: &State) -> f64 {
        heuristic::evaluate(self.config.heuristic, state, &self.config.deadlocks)
    }

    fn search(
        &mut self,
        visited: &mut FnvHashSet<StateKey>,
        state: &State,
        g: u32,
        threshold: f64,
        path: &mut Vec<Move>,
    ) -> Outcome {
        self.nodes_expanded += 1;

        let mut guard = match PathGuard::enter(visited, state.key()) {
            Some(guard) => guard,
            // cycle on the current path
            None => return Outcome::Bound(f64::INFINITY),
        };

        let f = f64::from(g) + self.heuristic(state);
        if f > threshold {
            self.stats.add_pruned(g);
            return Outcome::Bound(f);
        }
        self.stats.add_expanded(g, f);

        if state.is_solved() {
            return Outcome::Found;
        }
        if g >= self.config.max_depth {
            return Outcome::Bound(f64::INFINITY);
        }

        let mut min = f64::INFINITY;
        for mov in state.possible_moves() {
            let next = match state.successor(mov) {
                Ok(next) => next,
                Err(_) => continue,
            };

            let next_g = g + 1;
            let next_key = next.key();
            if let Some(&best_g) = self.cost_memo.get(&next_key) {
                if best_g <= next_g {
                    continue;
                }
            }
            self.cost_memo.insert(next_key, next_g);

            path.push(mov);
            match self.search(guard.visited(), &next, next_g, threshold, path) {
                Outcome::Found => return Outcome::Found,
                Outcome::Bound(bound) => {
                    if bound < min {
                        min = bound;
                    }
                }
            }
            path.pop();
        }
        Outcome::Bound(min)
    }
}
