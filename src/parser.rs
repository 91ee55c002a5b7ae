use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::config::Format;
use crate::data::{MapCell, Pos, MAX_SIZE};
use crate::level::Level;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErr {
    Pos(usize, usize),
    TooLarge,
    MultiplePlayers,
    NoPlayer,
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::TooLarge => write!(f, "Map larger than 255 rows/columns"),
            ParserErr::MultiplePlayers => write!(f, "More than one player"),
            ParserErr::NoPlayer => write!(f, "No player"),
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

struct Parsed {
    grid: Vec<Vec<MapCell>>,
    goals: Vec<Pos>,
    boxes: Vec<Pos>,
    player_pos: Option<Pos>,
}

impl Parsed {
    fn new() -> Self {
        Parsed {
            grid: Vec::new(),
            goals: Vec::new(),
            boxes: Vec::new(),
            player_pos: None,
        }
    }

    fn set_player(&mut self, pos: Pos) -> Result<(), ParserErr> {
        if self.player_pos.is_some() {
            return Err(ParserErr::MultiplePlayers);
        }
        self.player_pos = Some(pos);
        Ok(())
    }
}

pub(crate) fn parse(level: &str) -> Result<Level, ParserErr> {
    if level.trim_start().contains('<') {
        parse_format(level, Format::Custom)
    } else {
        parse_format(level, Format::Xsb)
    }
}

pub(crate) fn parse_format(level: &str, format: Format) -> Result<Level, ParserErr> {
    // trim so we can specify levels using raw strings more easily
    let level = level.trim_matches('\n').trim_end();

    let parsed = match format {
        Format::Custom => parse_custom(level)?,
        Format::Xsb => parse_xsb(level)?,
    };
    let player_pos = parsed.player_pos.ok_or(ParserErr::NoPlayer)?;
    let grid = Vec2d::new(&parsed.grid);

    Ok(Level::new(grid, parsed.goals, parsed.boxes, player_pos))
}

/// Parses my custom format
fn parse_custom(level: &str) -> Result<Parsed, ParserErr> {
    let mut parsed = Parsed::new();

    for (r, line) in level.lines().enumerate() {
        if r >= MAX_SIZE {
            return Err(ParserErr::TooLarge);
        }
        let mut line_cells = Vec::new();
        let mut chars = line.chars();
        while let (Some(c1), Some(c2)) = (chars.next(), chars.next()) {
            let c = line_cells.len();
            if c >= MAX_SIZE {
                return Err(ParserErr::TooLarge);
            }
            let pos = Pos::new(r as i32, c as i32);

            match c1 {
                '<' => {
                    if c2 != '>' {
                        return Err(ParserErr::Pos(r, c));
                    }
                    line_cells.push(MapCell::Wall);
                    continue; // skip parsing c2
                }
                ' ' => {}
                'B' => parsed.boxes.push(pos),
                'P' => parsed.set_player(pos)?,
                _ => return Err(ParserErr::Pos(r, c)),
            }
            match c2 {
                ' ' => line_cells.push(MapCell::Empty),
                '_' => {
                    parsed.goals.push(pos);
                    line_cells.push(MapCell::Goal);
                }
                _ => return Err(ParserErr::Pos(r, c)),
            }
        }
        parsed.grid.push(line_cells);
    }

    Ok(parsed)
}

/// Parses (a subset of) the format described [here](http://www.sokobano.de/wiki/index.php?title=Level_format)
fn parse_xsb(level: &str) -> Result<Parsed, ParserErr> {
    let mut parsed = Parsed::new();

    for (r, line) in level.lines().enumerate() {
        if r >= MAX_SIZE {
            return Err(ParserErr::TooLarge);
        }
        let mut line_cells = Vec::new();
        for (c, cur_char) in line.chars().enumerate() {
            if c >= MAX_SIZE {
                return Err(ParserErr::TooLarge);
            }
            let pos = Pos::new(r as i32, c as i32);

            let cell = match cur_char {
                '#' => MapCell::Wall,
                'p' | '@' => {
                    parsed.set_player(pos)?;
                    MapCell::Empty
                }
                'P' | '+' => {
                    parsed.set_player(pos)?;
                    parsed.goals.push(pos);
                    MapCell::Goal
                }
                'b' | '$' => {
                    parsed.boxes.push(pos);
                    MapCell::Empty
                }
                'B' | '*' => {
                    parsed.boxes.push(pos);
                    parsed.goals.push(pos);
                    MapCell::Goal
                }
                '.' => {
                    parsed.goals.push(pos);
                    MapCell::Goal
                }
                ' ' | '-' | '_' => MapCell::Empty,
                _ => return Err(ParserErr::Pos(r, c)),
            };
            line_cells.push(cell);
        }
        parsed.grid.push(line_cells);
    }

    Ok(parsed)
}
