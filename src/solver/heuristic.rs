//! Cost estimates used by both searches. Less is better.
//!
//! Every heuristic returns 0 for a solved state and infinity when one of the enabled
//! deadlock patterns matches, so a search can treat infinity as "don't go there".

use crate::config::{Deadlocks, HeuristicKind};
use crate::data::{Dir, MapCell, Pos};
use crate::solver::assignment::{self, UNREACHABLE};
use crate::solver::deadlock;
use crate::state::State;

/// Above this many unsolved boxes exact matching uses the assignment solver
/// instead of trying all permutations. Both give the same minimum.
const BRUTE_FORCE_MAX_BOXES: usize = 6;

const PLAYER_WEIGHT: f64 = 0.5;
const PULL_WEIGHT: f64 = 10.0;

pub fn evaluate(kind: HeuristicKind, state: &State, deadlocks: &Deadlocks) -> f64 {
    if state.is_solved() {
        return 0.0;
    }
    if deadlock::is_deadlocked(state, deadlocks) {
        return f64::INFINITY;
    }

    match kind {
        HeuristicKind::ManhattanSum => manhattan_sum(state),
        HeuristicKind::Hungarian => hungarian(state),
        HeuristicKind::ExactMatching => exact_matching(state),
        HeuristicKind::Annealing => annealing(state),
        HeuristicKind::ManhattanGreedySafe => manhattan_greedy_safe(state),
    }
}

fn nearest_dist(from: Pos, to: &[Pos]) -> Option<u32> {
    to.iter().map(|&pos| from.dist(pos)).min()
}

/// Sum of distances from each box to its nearest goal.
fn manhattan_sum(state: &State) -> f64 {
    let total: u32 = state
        .boxes()
        .iter()
        .filter_map(|&box_pos| nearest_dist(box_pos, state.goals()))
        .sum();
    f64::from(total)
}

/// Optimal assignment on walking distances from the goals. Never overestimates.
fn hungarian(state: &State) -> f64 {
    let map = state.map();
    let costs: Vec<Vec<i64>> = state
        .boxes()
        .iter()
        .map(|&box_pos| {
            (0..map.goals().len())
                .map(|goal_index| {
                    map.goal_dist(goal_index, box_pos)
                        .map_or(UNREACHABLE, i64::from)
                })
                .collect()
        })
        .collect();

    let (total, _) = assignment::hungarian(&costs);
    if total >= UNREACHABLE {
        f64::INFINITY
    } else {
        total as f64
    }
}

/// Optimal assignment of boxes not on a goal to goals without a box
/// plus half the distance from the player to the closest such box.
fn exact_matching(state: &State) -> f64 {
    let boxes_to_move: Vec<Pos> = state
        .boxes()
        .iter()
        .cloned()
        .filter(|&box_pos| !state.map().is_goal(box_pos))
        .collect();
    let free_goals: Vec<Pos> = state
        .goals()
        .iter()
        .cloned()
        .filter(|&goal| !state.has_box(goal))
        .collect();

    let costs = l1_costs(&boxes_to_move, &free_goals, |dist| dist);
    let boxes_dist = if boxes_to_move.len() <= BRUTE_FORCE_MAX_BOXES {
        assignment::brute_force(&costs)
    } else {
        assignment::hungarian(&costs).0
    };

    let player_dist = nearest_dist(state.player_pos(), &boxes_to_move).unwrap_or(0);
    boxes_dist as f64 + PLAYER_WEIGHT * f64::from(player_dist)
}

/// Squared distances punish one far box more than several slightly misplaced ones.
/// Pulls undo pushes so they're penalized.
fn annealing(state: &State) -> f64 {
    let costs = l1_costs(state.boxes(), state.goals(), |dist| dist * dist);
    let (boxes_dist, _) = assignment::hungarian(&costs);

    let player_dist = nearest_dist(state.player_pos(), state.boxes()).unwrap_or(0);
    boxes_dist as f64
        + PLAYER_WEIGHT * f64::from(player_dist)
        + PULL_WEIGHT * f64::from(state.pulls())
}

/// Each box in order takes the nearest goal nobody took yet.
fn manhattan_greedy_safe(state: &State) -> f64 {
    let mut used = vec![false; state.goals().len()];
    let mut total = 0;

    for &box_pos in state.boxes() {
        if is_simple_corner(state, box_pos) {
            return f64::INFINITY;
        }

        let best = state
            .goals()
            .iter()
            .enumerate()
            .filter(|&(i, _)| !used[i])
            .map(|(i, &goal)| (box_pos.dist(goal), i))
            .min();
        if let Some((dist, i)) = best {
            used[i] = true;
            total += dist;
        }
    }

    f64::from(total)
}

/// Two orthogonal walls next to a box that's not on a goal.
/// Unlike the corner deadlock, the edge of the grid doesn't count.
fn is_simple_corner(state: &State, box_pos: Pos) -> bool {
    let map = state.map();
    if map.is_goal(box_pos) {
        return false;
    }
    let wall = |pos: Pos| map.grid().get(pos) == Some(&MapCell::Wall);
    let horizontal = wall(box_pos + Dir::Left) || wall(box_pos + Dir::Right);
    let vertical = wall(box_pos + Dir::Up) || wall(box_pos + Dir::Down);
    horizontal && vertical
}

fn l1_costs<F: Fn(i64) -> i64>(from: &[Pos], to: &[Pos], f: F) -> Vec<Vec<i64>> {
    from.iter()
        .map(|&a| to.iter().map(|&b| f(i64::from(a.dist(b)))).collect())
        .collect()
}
