use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Sub};

pub(crate) const MAX_SIZE: usize = 255;

// only 254 because 255 is used to represent empty in the box grids
pub(crate) const MAX_BOXES: usize = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapCell {
    Empty,
    Wall,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Contents {
    Empty,
    Box,
    Player,
}

impl Default for Contents {
    fn default() -> Self {
        Contents::Empty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

pub const DIRECTIONS: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

impl Dir {
    pub fn inverse(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
        }
    }

    fn offset(self) -> (i32, i32) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Right => (0, 1),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Dir::Up => write!(f, "u"),
            Dir::Right => write!(f, "r"),
            Dir::Down => write!(f, "d"),
            Dir::Left => write!(f, "l"),
        }
    }
}

// signed so that we can step outside the grid - everything outside behaves like wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: i32,
    pub c: i32,
}

impl Pos {
    pub fn new(r: i32, c: i32) -> Pos {
        Pos { r, c }
    }

    /// Manhattan distance
    pub fn dist(self, other: Pos) -> u32 {
        ((self.r - other.r).abs() + (self.c - other.c).abs()) as u32
    }

    pub fn neighbors(self) -> [Pos; 4] {
        [
            self + DIRECTIONS[0],
            self + DIRECTIONS[1],
            self + DIRECTIONS[2],
            self + DIRECTIONS[3],
        ]
    }

    /// Only works for adjacent positions
    pub fn dir_to(self, other: Pos) -> Dir {
        match (other.r - self.r, other.c - self.c) {
            (-1, 0) => Dir::Up,
            (0, 1) => Dir::Right,
            (1, 0) => Dir::Down,
            (0, -1) => Dir::Left,
            _ => panic!("Positions {:?} and {:?} are not adjacent", self, other),
        }
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.r, self.c)
    }
}

impl Add<Dir> for Pos {
    type Output = Pos;

    fn add(self, dir: Dir) -> Pos {
        let (dr, dc) = dir.offset();
        Pos::new(self.r + dr, self.c + dc)
    }
}

impl Sub<Dir> for Pos {
    type Output = Pos;

    fn sub(self, dir: Dir) -> Pos {
        self + dir.inverse()
    }
}
