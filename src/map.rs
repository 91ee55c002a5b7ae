use std::fmt::{self, Debug, Display, Formatter};

use crate::config::Format;
use crate::data::{MapCell, Pos};
use crate::map_formatter::MapFormatter;
use crate::solver::preprocessing;
use crate::state::State;
use crate::vec2d::Vec2d;

/// The part of the level that never changes during search.
///
/// States share it through an `Rc` so copying a state only copies boxes and the player.
#[derive(Clone)]
pub struct Map {
    grid: Vec2d<MapCell>,
    goals: Vec<Pos>,
    dead_squares: Vec2d<bool>,
    goal_dists: Vec<Vec2d<Option<u32>>>,
    pulls_allowed: bool,
}

impl Map {
    pub(crate) fn new(grid: Vec2d<MapCell>, goals: Vec<Pos>, pulls_allowed: bool) -> Self {
        let dead_squares = preprocessing::find_dead_squares(&grid, &goals, pulls_allowed);
        let goal_dists = preprocessing::goal_dists(&grid, &goals);
        Map {
            grid,
            goals,
            dead_squares,
            goal_dists,
            pulls_allowed,
        }
    }

    pub fn grid(&self) -> &Vec2d<MapCell> {
        &self.grid
    }

    pub fn goals(&self) -> &[Pos] {
        &self.goals
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Cells outside the grid are walls too.
    pub fn is_wall(&self, pos: Pos) -> bool {
        self.grid.get(pos).map_or(true, |&cell| cell == MapCell::Wall)
    }

    pub fn is_goal(&self, pos: Pos) -> bool {
        self.grid.get(pos) == Some(&MapCell::Goal)
    }

    /// A box on this cell can never reach any goal. Walls count as dead.
    pub fn is_dead_square(&self, pos: Pos) -> bool {
        self.dead_squares.get(pos).cloned().unwrap_or(true)
    }

    /// Walking distance from the goal, walls block but boxes don't.
    /// `None` when the cell can't be reached from the goal.
    pub fn goal_dist(&self, goal_index: usize, pos: Pos) -> Option<u32> {
        self.goal_dists[goal_index].get(pos).cloned().unwrap_or(None)
    }

    pub fn pulls_allowed(&self) -> bool {
        self.pulls_allowed
    }

    pub fn format_with_state<'a>(&'a self, format: Format, state: &'a State) -> MapFormatter<'a> {
        MapFormatter::new(&self.grid, Some(state.boxes()), Some(state.player_pos()), format)
    }

    pub fn xsb_with_state<'a>(&'a self, state: &'a State) -> MapFormatter<'a> {
        self.format_with_state(Format::Xsb, state)
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MapFormatter::new(&self.grid, None, None, Format::Xsb))
    }
}

impl Debug for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::level::Level;

    use super::*;

    #[test]
    fn walls_outside_grid() {
        let level: Level = r"
 @$.
####
"
        .parse()
        .unwrap();
        let state = level.initial_state(true).unwrap();
        let map = state.map();

        assert!(map.is_wall(Pos::new(-1, 1)));
        assert!(map.is_wall(Pos::new(0, 4)));
        assert!(map.is_wall(Pos::new(1, 0)));
        assert!(!map.is_wall(Pos::new(0, 0)));
        assert!(map.is_goal(Pos::new(0, 3)));
        assert!(!map.is_goal(Pos::new(0, 2)));
        assert_eq!(map.to_string(), "   .\n####\n");
    }
}
