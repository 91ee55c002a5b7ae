use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

use crate::config::Format;
use crate::data::{MapCell, Pos, MAX_BOXES};
use crate::map::Map;
use crate::map_formatter::MapFormatter;
use crate::moves::Moves;
use crate::solution_formatter::SolutionFormatter;
use crate::solver::SolverErr;
use crate::state::State;
use crate::vec2d::Vec2d;

/// A parsed level: the grid and the initial positions of everything on it.
#[derive(Clone)]
pub struct Level {
    grid: Vec2d<MapCell>,
    goals: Vec<Pos>,
    boxes: Vec<Pos>,
    player_pos: Pos,
}

impl Level {
    pub(crate) fn new(
        grid: Vec2d<MapCell>,
        goals: Vec<Pos>,
        boxes: Vec<Pos>,
        player_pos: Pos,
    ) -> Self {
        Level {
            grid,
            goals,
            boxes,
            player_pos,
        }
    }

    pub fn grid(&self) -> &Vec2d<MapCell> {
        &self.grid
    }

    pub fn goals(&self) -> &[Pos] {
        &self.goals
    }

    pub fn boxes(&self) -> &[Pos] {
        &self.boxes
    }

    pub fn player_pos(&self) -> Pos {
        self.player_pos
    }

    /// Builds the starting state the solvers work with.
    pub fn initial_state(&self, pulls_allowed: bool) -> Result<State, SolverErr> {
        if self.boxes.len() != self.goals.len() {
            return Err(SolverErr::BoxesGoals);
        }
        if self.boxes.len() > MAX_BOXES {
            return Err(SolverErr::TooMany);
        }

        let map = Map::new(self.grid.clone(), self.goals.clone(), pulls_allowed);
        Ok(State::new(
            Rc::new(map),
            self.player_pos,
            self.boxes.clone(),
        ))
    }

    pub fn xsb(&self) -> MapFormatter<'_> {
        self.format(Format::Xsb)
    }

    pub fn custom(&self) -> MapFormatter<'_> {
        self.format(Format::Custom)
    }

    pub fn format(&self, format: Format) -> MapFormatter<'_> {
        MapFormatter::new(&self.grid, Some(&self.boxes), Some(self.player_pos), format)
    }

    /// Renders the board after every move (or only after pushes and pulls).
    pub fn format_solution<'a>(
        &'a self,
        format: Format,
        moves: &'a Moves,
        include_steps: bool,
    ) -> SolutionFormatter<'a> {
        SolutionFormatter::new(self, moves, include_steps, format)
    }

    pub fn xsb_solution<'a>(&'a self, moves: &'a Moves, include_steps: bool) -> SolutionFormatter<'a> {
        self.format_solution(Format::Xsb, moves, include_steps)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.xsb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_level() {
        let xsb: &str = r"
*###*
#@$.#
*###*#
"
        .trim_start_matches('\n');
        let custom: &str = r"
B_<><><>B_
<>P B  _<>
B_<><><>B_<>
"
        .trim_start_matches('\n');

        for level in [xsb, custom].iter() {
            let level: Level = level.parse().unwrap();
            assert_eq!(level.to_string(), xsb);
            assert_eq!(level.xsb().to_string(), xsb);
            assert_eq!(level.format(Format::Xsb).to_string(), xsb);
            assert_eq!(format!("{}", level), xsb);
            assert_eq!(format!("{:?}", level), xsb);

            assert_eq!(level.custom().to_string(), custom);
            assert_eq!(level.format(Format::Custom).to_string(), custom);
            assert_eq!(format!("{}", level.custom()), custom);
            assert_eq!(format!("{:?}", level.custom()), custom);

            let state = level.initial_state(true).unwrap();
            assert_eq!(
                state.map().format_with_state(Format::Xsb, &state).to_string(),
                xsb
            );
            assert_eq!(
                state.map().format_with_state(Format::Custom, &state).to_string(),
                custom
            );
        }
    }

    #[test]
    fn boxes_goals_mismatch() {
        let level: Level = r"
######
#@$$.#
######
"
        .parse()
        .unwrap();
        assert_eq!(
            level.initial_state(true).unwrap_err(),
            SolverErr::BoxesGoals
        );
    }

    #[test]
    fn too_many_boxes() {
        let mut text = String::from("@\n");
        for _ in 0..(MAX_BOXES + 1) / 5 + 1 {
            text.push_str("*****\n");
        }
        let level: Level = text.parse().unwrap();
        assert!(level.boxes().len() > MAX_BOXES);
        assert_eq!(level.initial_state(true).unwrap_err(), SolverErr::TooMany);
    }
}
