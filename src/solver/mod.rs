pub mod annealing;
pub mod deadlock;
pub mod heuristic;
pub mod ida_star;
pub mod stats;

pub(crate) mod assignment;
pub(crate) mod preprocessing;

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use log::debug;
use separator::Separatable;

use crate::config::{Algorithm, Config, HeuristicKind};
use crate::level::Level;
use crate::moves::Moves;
use crate::state::{MoveErr, State};
use crate::Solve;

use self::annealing::SimulatedAnnealing;
use self::ida_star::IdaStar;
use self::stats::Stats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverErr {
    BoxesGoals,
    TooMany,
    InvalidConfig(String),
}

impl Display for SolverErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            SolverErr::BoxesGoals => write!(f, "Different number of boxes and goals"),
            SolverErr::TooMany => write!(f, "More than 254 boxes or goals"),
            SolverErr::InvalidConfig(ref reason) => write!(f, "Invalid configuration: {}", reason),
        }
    }
}

impl Error for SolverErr {}

pub struct SolverOk {
    pub moves: Option<Moves>,
    pub nodes_expanded: u64,
    pub pulls: u32,
    pub algorithm: Algorithm,
    pub heuristic: HeuristicKind,
    /// Only IDA* keeps per depth counters.
    pub stats: Option<Stats>,
}

impl Debug for SolverOk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.moves {
            None => writeln!(f, "No solution")?,
            Some(ref moves) => writeln!(f, "{} ({}): {}", self.algorithm, self.heuristic, moves.move_cnt())?,
        }
        writeln!(f, "States expanded: {}", self.nodes_expanded.separated_string())?;
        writeln!(f, "Pulls: {}", self.pulls)?;
        if let Some(ref stats) = self.stats {
            write!(f, "{}", stats)?;
        }
        Ok(())
    }
}

impl Solve for Level {
    fn solve(&self, config: &Config) -> Result<SolverOk, SolverErr> {
        solve(self, config)
    }
}

fn solve(level: &Level, config: &Config) -> Result<SolverOk, SolverErr> {
    config.validate().map_err(SolverErr::InvalidConfig)?;

    debug!("Processing level...");
    let start = level.initial_state(config.pulls_allowed)?;
    debug!("Processed level");

    let ok = match config.algorithm {
        Algorithm::IdaStar => {
            let mut ida = IdaStar::new(&start, &config.ida);
            let moves = ida.solve();
            let pulls = match moves {
                Some(ref moves) => replay(&start, moves).map(|end| end.pulls()).unwrap_or(0),
                None => 0,
            };
            SolverOk {
                moves,
                nodes_expanded: ida.nodes_expanded(),
                pulls,
                algorithm: config.algorithm,
                heuristic: config.ida.heuristic,
                stats: Some(ida.stats().clone()),
            }
        }
        Algorithm::Annealing => {
            let mut sa = SimulatedAnnealing::new(&start, &config.annealing);
            let moves = sa.solve();
            SolverOk {
                moves,
                nodes_expanded: sa.nodes_expanded(),
                pulls: sa.pull_moves(),
                algorithm: config.algorithm,
                heuristic: config.annealing.heuristic,
                stats: None,
            }
        }
    };
    Ok(ok)
}

/// Applies the moves to a copy of `start`.
pub fn replay(start: &State, moves: &Moves) -> Result<State, MoveErr> {
    let mut state = start.clone();
    for &mov in moves {
        state.apply_move(mov)?;
    }
    Ok(state)
}
