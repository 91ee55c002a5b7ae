use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

use crate::data::{Pos, DIRECTIONS};
use crate::map::Map;
use crate::moves::{Move, MoveKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveErr {
    Wall(Move),
    BoxBlocked(Move),
    NoBoxToPull(Move),
    PullsDisabled(Move),
    WrongKind(Move, MoveKind),
}

impl Display for MoveErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            MoveErr::Wall(mov) => write!(f, "Move {} walks into a wall", mov),
            MoveErr::BoxBlocked(mov) => write!(f, "Move {} pushes a box into an obstacle", mov),
            MoveErr::NoBoxToPull(mov) => write!(f, "Move {} has no box to pull", mov),
            MoveErr::PullsDisabled(mov) => write!(f, "Move {} is a pull but pulls are disabled", mov),
            MoveErr::WrongKind(mov, actual) => {
                write!(f, "Move {} would actually be a {:?}", mov, actual)
            }
        }
    }
}

impl Error for MoveErr {}

/// Order-independent fingerprint of a state: sorted boxes + player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    boxes: Vec<Pos>,
    player_pos: Pos,
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for b in &self.boxes {
            write!(f, "{}", b)?;
        }
        write!(f, "@{}", self.player_pos)
    }
}

/// A snapshot of the puzzle.
///
/// Boxes keep their identity (index) across moves. Search code never mutates a state
/// that's reachable from elsewhere - it clones and then applies a move to the clone.
#[derive(Clone)]
pub struct State {
    map: Rc<Map>,
    boxes: Vec<Pos>,
    player_pos: Pos,
    pulls: u32,
}

impl State {
    pub(crate) fn new(map: Rc<Map>, player_pos: Pos, boxes: Vec<Pos>) -> Self {
        State {
            map,
            boxes,
            player_pos,
            pulls: 0,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn boxes(&self) -> &[Pos] {
        &self.boxes
    }

    pub fn goals(&self) -> &[Pos] {
        self.map.goals()
    }

    pub fn player_pos(&self) -> Pos {
        self.player_pos
    }

    /// Number of pulls applied to reach this state.
    pub fn pulls(&self) -> u32 {
        self.pulls
    }

    pub fn box_at(&self, pos: Pos) -> Option<usize> {
        self.boxes.iter().position(|&b| b == pos)
    }

    pub fn has_box(&self, pos: Pos) -> bool {
        self.box_at(pos).is_some()
    }

    /// Neither wall nor box.
    pub fn is_free(&self, pos: Pos) -> bool {
        !self.map.is_wall(pos) && !self.has_box(pos)
    }

    /// Every goal is covered by a box.
    pub fn is_solved(&self) -> bool {
        self.map.goals().iter().all(|&goal| self.has_box(goal))
    }

    pub fn key(&self) -> StateKey {
        let mut boxes = self.boxes.clone();
        boxes.sort();
        StateKey {
            boxes,
            player_pos: self.player_pos,
        }
    }

    /// All legal moves in a fixed order: up, right, down, left,
    /// for each direction the step or push first, then the pull.
    pub fn possible_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for &dir in &DIRECTIONS {
            let new_player_pos = self.player_pos + dir;
            if self.map.is_wall(new_player_pos) {
                continue;
            }

            if self.has_box(new_player_pos) {
                if self.is_free(new_player_pos + dir) {
                    moves.push(Move::push(dir));
                }
                // can't pull when walking into a box
                continue;
            }

            moves.push(Move::step(dir));
            if self.map.pulls_allowed() && self.has_box(self.player_pos - dir) {
                moves.push(Move::pull(dir));
            }
        }
        moves
    }

    /// Applies the move in place. On error the state is left untouched.
    pub fn apply_move(&mut self, mov: Move) -> Result<(), MoveErr> {
        let dir = mov.dir;
        let new_player_pos = self.player_pos + dir;
        if self.map.is_wall(new_player_pos) {
            return Err(MoveErr::Wall(mov));
        }

        match (mov.kind, self.box_at(new_player_pos)) {
            (MoveKind::Push, Some(box_index)) => {
                let push_dest = new_player_pos + dir;
                if !self.is_free(push_dest) {
                    return Err(MoveErr::BoxBlocked(mov));
                }
                self.boxes[box_index] = push_dest;
            }
            (MoveKind::Push, None) => return Err(MoveErr::WrongKind(mov, MoveKind::Step)),
            (_, Some(_)) => return Err(MoveErr::WrongKind(mov, MoveKind::Push)),
            (MoveKind::Step, None) => {}
            (MoveKind::Pull, None) => {
                if !self.map.pulls_allowed() {
                    return Err(MoveErr::PullsDisabled(mov));
                }
                let box_index = self
                    .box_at(self.player_pos - dir)
                    .ok_or(MoveErr::NoBoxToPull(mov))?;
                self.boxes[box_index] = self.player_pos;
                self.pulls += 1;
            }
        }

        self.player_pos = new_player_pos;
        Ok(())
    }

    /// Clones the state and applies the move to the clone.
    pub fn successor(&self, mov: Move) -> Result<State, MoveErr> {
        let mut next = self.clone();
        next.apply_move(mov)?;
        Ok(next)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for State {}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.map.xsb_with_state(self))
    }
}

impl Debug for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::data::Dir::*;
    use crate::level::Level;

    use super::*;

    fn state(level: &str, pulls_allowed: bool) -> State {
        let level: Level = level.parse().unwrap();
        level.initial_state(pulls_allowed).unwrap()
    }

    #[test]
    fn possible_moves() {
        let s = state(
            r"
######
#    #
# @$ #
# $..#
######
",
            true,
        );
        assert_eq!(
            s.possible_moves(),
            vec![
                Move::step(Up),
                Move::pull(Up),
                Move::push(Right),
                Move::step(Left),
                Move::pull(Left),
            ]
        );

        let s = state(
            r"
######
#    #
# @$ #
# $..#
######
",
            false,
        );
        assert_eq!(
            s.possible_moves(),
            vec![Move::step(Up), Move::push(Right), Move::step(Left)]
        );
    }

    #[test]
    fn blocked_push() {
        let s = state(
            r"
######
#@$$.#
#   .#
######
",
            true,
        );
        // the push right is blocked by the second box
        assert_eq!(s.possible_moves(), vec![Move::step(Down)]);
        let mut copy = s.clone();
        assert_eq!(
            copy.apply_move(Move::push(Right)),
            Err(MoveErr::BoxBlocked(Move::push(Right)))
        );
        assert_eq!(copy.key(), s.key());
    }

    #[test]
    fn applying_moves() {
        let mut s = state(
            r"
#######
#  @$.#
#######
",
            true,
        );
        assert!(!s.is_solved());

        s.apply_move(Move::pull(Left)).unwrap();
        assert_eq!(s.player_pos(), Pos::new(1, 2));
        assert_eq!(s.boxes(), &[Pos::new(1, 3)]);
        assert_eq!(s.pulls(), 1);

        assert_eq!(
            s.apply_move(Move::step(Right)),
            Err(MoveErr::WrongKind(Move::step(Right), MoveKind::Push))
        );
        assert_eq!(
            s.apply_move(Move::push(Left)),
            Err(MoveErr::WrongKind(Move::push(Left), MoveKind::Step))
        );
        assert_eq!(
            s.apply_move(Move::pull(Up)),
            Err(MoveErr::Wall(Move::pull(Up)))
        );

        s.apply_move(Move::push(Right)).unwrap();
        s.apply_move(Move::push(Right)).unwrap();
        assert!(s.is_solved());
        assert_eq!(s.pulls(), 1);
        assert_eq!(s.to_string(), "#######\n#   @*#\n#######\n");
    }

    #[test]
    fn copies_are_independent() {
        let s = state(
            r"
#######
#  @$.#
#######
",
            true,
        );
        let next = s.successor(Move::push(Right)).unwrap();
        assert_eq!(s.boxes(), &[Pos::new(1, 4)]);
        assert_eq!(next.boxes(), &[Pos::new(1, 5)]);
        assert_ne!(s.key(), next.key());
    }

    #[test]
    fn keys_ignore_box_identity() {
        let s = state(
            r"
#######
#@$ $ #
#  .. #
#######
",
            true,
        );
        let a = State::new(
            s.map.clone(),
            Pos::new(1, 1),
            vec![Pos::new(1, 2), Pos::new(1, 4)],
        );
        let b = State::new(
            s.map.clone(),
            Pos::new(1, 1),
            vec![Pos::new(1, 4), Pos::new(1, 2)],
        );
        assert_eq!(a.key(), b.key());
        assert_eq!(a, b);
        assert_eq!(a.key().to_string(), "[1, 2][1, 4]@[1, 1]");
    }
}
