//! Patterns which make a state unsolvable no matter what the player does next.
//!
//! Every predicate looks at a single box and ignores boxes already on a goal.

use log::trace;

use crate::config::{Deadlock, Deadlocks};
use crate::data::{Dir, Pos};
use crate::state::State;

/// Returns true if any of the enabled predicates fires for any box.
pub fn is_deadlocked(state: &State, deadlocks: &Deadlocks) -> bool {
    deadlocks.iter().any(|deadlock| {
        state
            .boxes()
            .iter()
            .any(|&box_pos| is_deadlock(deadlock, state, box_pos))
    })
}

pub fn is_deadlock(deadlock: Deadlock, state: &State, box_pos: Pos) -> bool {
    match deadlock {
        Deadlock::Corner => is_corner_deadlock(state, box_pos),
        Deadlock::Tunnel => is_tunnel_deadlock(state, box_pos),
        Deadlock::Edge => is_edge_deadlock(state, box_pos),
        Deadlock::Square => is_2x2_deadlock(state, box_pos),
        Deadlock::DeadSquares => is_static_deadlock(state, box_pos),
    }
}

/// Blocked from one horizontal and one vertical side. The grid edge blocks too.
pub fn is_corner_deadlock(state: &State, box_pos: Pos) -> bool {
    let map = state.map();
    if map.is_goal(box_pos) {
        return false;
    }

    let horizontal = map.is_wall(box_pos + Dir::Left) || map.is_wall(box_pos + Dir::Right);
    let vertical = map.is_wall(box_pos + Dir::Up) || map.is_wall(box_pos + Dir::Down);
    if horizontal && vertical {
        trace!("Corner deadlock: box at {}", box_pos);
        return true;
    }
    false
}

/// Walls on both sides and no goal anywhere along the corridor between them.
pub fn is_tunnel_deadlock(state: &State, box_pos: Pos) -> bool {
    let map = state.map();
    if map.is_goal(box_pos) {
        return false;
    }

    // the corridor runs perpendicular to the flanking walls
    let corridor = if map.is_wall(box_pos + Dir::Left) && map.is_wall(box_pos + Dir::Right) {
        [Dir::Up, Dir::Down]
    } else if map.is_wall(box_pos + Dir::Up) && map.is_wall(box_pos + Dir::Down) {
        [Dir::Left, Dir::Right]
    } else {
        return false;
    };

    for &dir in &corridor {
        let mut pos = box_pos + dir;
        while !map.is_wall(pos) {
            if map.is_goal(pos) {
                return false;
            }
            pos = pos + dir;
        }
    }

    trace!("Tunnel deadlock: box at {}", box_pos);
    true
}

/// On the outermost row or column of the grid with no goal along it.
pub fn is_edge_deadlock(state: &State, box_pos: Pos) -> bool {
    let map = state.map();
    if map.is_goal(box_pos) {
        return false;
    }

    let last_row = map.rows() as i32 - 1;
    let last_col = map.cols() as i32 - 1;
    let goals = map.goals();

    let row_dead = |r: i32| box_pos.r == r && !goals.iter().any(|goal| goal.r == r);
    let col_dead = |c: i32| box_pos.c == c && !goals.iter().any(|goal| goal.c == c);

    if row_dead(0) || row_dead(last_row) || col_dead(0) || col_dead(last_col) {
        trace!("Edge deadlock: box at {}", box_pos);
        return true;
    }
    false
}

/// The box is the top left corner of a square of four boxes, none of them on a goal.
pub fn is_2x2_deadlock(state: &State, box_pos: Pos) -> bool {
    let map = state.map();
    let square = [
        box_pos,
        box_pos + Dir::Right,
        box_pos + Dir::Down,
        box_pos + Dir::Down + Dir::Right,
    ];

    if square
        .iter()
        .all(|&pos| state.has_box(pos) && !map.is_goal(pos))
    {
        trace!("2x2 deadlock: box at {}", box_pos);
        return true;
    }
    false
}

/// A lone box on this cell could never reach a goal.
pub fn is_static_deadlock(state: &State, box_pos: Pos) -> bool {
    let map = state.map();
    if map.is_goal(box_pos) {
        return false;
    }

    if map.is_dead_square(box_pos) {
        trace!("Dead square: box at {}", box_pos);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use crate::config::DEADLOCKS;
    use crate::data::Dir::*;
    use crate::level::Level;
    use crate::moves::Move;

    use super::*;

    fn state(level: &str) -> State {
        let level: Level = level.parse().unwrap();
        level.initial_state(true).unwrap()
    }

    #[test]
    fn corner() {
        let s = state(
            r"
#####
#$  #
# @.#
#####
",
        );
        assert!(is_corner_deadlock(&s, s.boxes()[0]));
        assert!(is_deadlocked(&s, &Deadlocks::new(vec![Deadlock::Corner])));
        assert!(!is_deadlocked(&s, &Deadlocks::none()));

        // a box on a goal in a corner is fine
        let s = state(
            r"
#####
#*  #
# @ #
#####
",
        );
        assert!(!is_corner_deadlock(&s, s.boxes()[0]));
        for &deadlock in &DEADLOCKS {
            assert!(!is_deadlocked(&s, &Deadlocks::new(vec![deadlock])));
        }
    }

    #[test]
    fn corner_on_grid_edge() {
        let s = state(
            r"
$
 @ .
",
        );
        assert!(is_corner_deadlock(&s, s.boxes()[0]));
    }

    #[test]
    fn corner_stays_after_unrelated_moves() {
        let mut s = state(
            r"
######
#$   #
#  @ #
#  $.#
#   .#
######
",
        );
        let stuck = s.boxes()[0];
        assert!(is_corner_deadlock(&s, stuck));
        for &mov in &[
            Move::step(Up),
            Move::step(Down),
            Move::push(Down),
            Move::step(Left),
        ] {
            s.apply_move(mov).unwrap();
            assert_eq!(s.boxes()[0], stuck);
            assert!(is_corner_deadlock(&s, stuck));
            assert!(is_deadlocked(&s, &Deadlocks::all()));
        }
    }

    #[test]
    fn tunnel() {
        let s = state(
            r"
#######
### ###
###$###
### ###
#@   .#
#######
",
        );
        assert!(is_tunnel_deadlock(&s, s.boxes()[0]));
        assert!(!is_corner_deadlock(&s, s.boxes()[0]));

        let s = state(
            r"
#######
###.###
###$###
### ###
#@    #
#######
",
        );
        assert!(!is_tunnel_deadlock(&s, s.boxes()[0]));

        let s = state(
            r"
########
#@ $  .#
########
",
        );
        assert!(!is_tunnel_deadlock(&s, s.boxes()[0]));
    }

    #[test]
    fn edge() {
        let s = state(
            r"
 $
 @
   .
",
        );
        assert!(is_edge_deadlock(&s, s.boxes()[0]));

        let s = state(
            r"
 $ .
 @
",
        );
        assert!(!is_edge_deadlock(&s, s.boxes()[0]));
    }

    #[test]
    fn square() {
        let s = state(
            r"
#######
#@    #
# $$  #
# $$  #
# ....#
#######
",
        );
        assert!(is_2x2_deadlock(&s, s.boxes()[0]));
        assert!(!is_2x2_deadlock(&s, s.boxes()[1]));
        assert!(is_deadlocked(&s, &Deadlocks::new(vec![Deadlock::Square])));

        let s = state(
            r"
#######
#@    #
# $*  #
# $$  #
# ... #
#######
",
        );
        assert!(!is_2x2_deadlock(&s, s.boxes()[0]));
    }

    #[test]
    fn dead_squares() {
        let s = state(
            r"
#######
#@    #
#  $  #
#    .#
#######
",
        );
        assert!(!is_static_deadlock(&s, s.boxes()[0]));

        let s = state(
            r"
#######
#@  $ #
#     #
#    .#
#######
",
        );
        // against the top wall with no goal along it
        assert!(is_static_deadlock(&s, s.boxes()[0]));
        assert!(!is_corner_deadlock(&s, s.boxes()[0]));
    }
}
