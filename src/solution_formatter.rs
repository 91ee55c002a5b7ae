use std::fmt::{self, Debug, Display, Formatter};

use crate::config::Format;
use crate::level::Level;
use crate::moves::Moves;

pub struct SolutionFormatter<'a> {
    level: &'a Level,
    moves: &'a Moves,
    include_steps: bool,
    format: Format,
}

impl<'a> SolutionFormatter<'a> {
    pub(crate) fn new(
        level: &'a Level,
        moves: &'a Moves,
        include_steps: bool,
        format: Format,
    ) -> Self {
        Self {
            level,
            moves,
            include_steps,
            format,
        }
    }
}

impl Display for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // replay with pulls enabled so any solution can be shown
        let mut state = match self.level.initial_state(true) {
            Ok(state) => state,
            Err(err) => return writeln!(f, "{}", err),
        };

        writeln!(f, "{}", state.map().format_with_state(self.format, &state))?;
        for &mov in self.moves {
            if let Err(err) = state.apply_move(mov) {
                // somebody could pass moves from a different level
                return writeln!(f, "{}", err);
            }
            if mov.is_push() || mov.is_pull() || self.include_steps {
                writeln!(f, "{}", state.map().format_with_state(self.format, &state))?;
            }
        }
        Ok(())
    }
}

impl Debug for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::data::Dir::*;
    use crate::moves::Move;

    use super::*;

    #[test]
    fn formatting_solution() {
        let level: Level = r"
######
#@ $.#
######
"
        .parse()
        .unwrap();
        let moves = Moves::new(vec![Move::step(Right), Move::push(Right)]);

        let expected_pushes = "\
######
#@ $.#
######

######
#  @*#
######

";
        assert_eq!(level.xsb_solution(&moves, false).to_string(), expected_pushes);

        let expected_steps = "\
######
#@ $.#
######

######
# @$.#
######

######
#  @*#
######

";
        assert_eq!(level.xsb_solution(&moves, true).to_string(), expected_steps);
    }

    #[test]
    fn invalid_moves_are_reported() {
        let level: Level = r"
######
#@ $.#
######
"
        .parse()
        .unwrap();
        let moves = Moves::new(vec![Move::step(Up)]);
        let out = level.xsb_solution(&moves, true).to_string();
        assert!(out.ends_with("Move u walks into a wall\n"));
    }
}
