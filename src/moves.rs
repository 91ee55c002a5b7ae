use std::fmt::{self, Debug, Display, Formatter};

use crate::data::Dir;

// Terminology:
// move = changing player position by one cell
// push = a move that changes a box position by walking into it
// pull = a move that drags the box behind the player along
// step = a move that doesn't change a box position

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Step,
    Push,
    Pull,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub dir: Dir,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(dir: Dir, kind: MoveKind) -> Self {
        Move { dir, kind }
    }

    pub fn step(dir: Dir) -> Self {
        Move::new(dir, MoveKind::Step)
    }

    pub fn push(dir: Dir) -> Self {
        Move::new(dir, MoveKind::Push)
    }

    pub fn pull(dir: Dir) -> Self {
        Move::new(dir, MoveKind::Pull)
    }

    pub fn is_push(self) -> bool {
        self.kind == MoveKind::Push
    }

    pub fn is_pull(self) -> bool {
        self.kind == MoveKind::Pull
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::Step => write!(f, "{}", self.dir),
            MoveKind::Push => write!(f, "{}", self.dir.to_string().to_uppercase()),
            // XSB has no notation for pulls
            MoveKind::Pull => write!(f, "~{}", self.dir),
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves(Vec<Move>);

impl Moves {
    pub fn new(moves: Vec<Move>) -> Self {
        Moves(moves)
    }

    pub fn move_cnt(&self) -> usize {
        self.0.len()
    }

    pub fn push_cnt(&self) -> usize {
        self.0.iter().filter(|m| m.is_push()).count()
    }

    pub fn pull_cnt(&self) -> usize {
        self.0.iter().filter(|m| m.is_pull()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn add(&mut self, mov: Move) {
        self.0.push(mov);
    }

    pub fn extend(&mut self, moves: &Moves) {
        self.0.extend_from_slice(&moves.0);
    }

    pub fn iter(&self) -> ::std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}

impl IntoIterator for Moves {
    type Item = Move;
    type IntoIter = ::std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Move;
    type IntoIter = ::std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mov in self {
            write!(f, "{}", mov)?;
        }
        Ok(())
    }
}

impl Debug for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
