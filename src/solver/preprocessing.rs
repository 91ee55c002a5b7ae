use std::collections::VecDeque;

use log::debug;

use crate::data::{MapCell, Pos, DIRECTIONS};
use crate::moves::Move;
use crate::vec2d::Vec2d;

fn is_wall(grid: &Vec2d<MapCell>, pos: Pos) -> bool {
    grid.get(pos).map_or(true, |&cell| cell == MapCell::Wall)
}

/// Marks every cell from which a lone box can never be moved onto a goal
/// (by pushes, and by pulls too when they're allowed). Walls are marked too.
#[inline(never)] // this is called only once and this way it's easier to see in callgrind
pub(crate) fn find_dead_squares(
    grid: &Vec2d<MapCell>,
    goals: &[Pos],
    pulls_allowed: bool,
) -> Vec2d<bool> {
    let box_moves = box_moves(grid, pulls_allowed);

    let mut dead_squares = grid.scratchpad_with_default(true);
    for box_pos in grid.positions() {
        if is_wall(grid, box_pos) {
            continue;
        }
        dead_squares[box_pos] = !reaches_goal(grid, &box_moves, box_pos);
    }

    debug!(
        "Found {} dead squares for {} goals",
        grid.positions()
            .filter(|&pos| dead_squares[pos] && !is_wall(grid, pos))
            .count(),
        goals.len()
    );
    dead_squares
}

/// BFS from every goal over everything that isn't a wall.
pub(crate) fn goal_dists(grid: &Vec2d<MapCell>, goals: &[Pos]) -> Vec<Vec2d<Option<u32>>> {
    goals
        .iter()
        .map(|&goal| {
            let mut dists = grid.scratchpad();
            dists[goal] = Some(0);

            let mut to_visit = VecDeque::new();
            to_visit.push_back((goal, 0));
            while let Some((cur_pos, cur_dist)) = to_visit.pop_front() {
                for &next_pos in &cur_pos.neighbors() {
                    if is_wall(grid, next_pos) || dists[next_pos].is_some() {
                        continue;
                    }
                    dists[next_pos] = Some(cur_dist + 1);
                    to_visit.push_back((next_pos, cur_dist + 1));
                }
            }
            dists
        })
        .collect()
}

/// For every cell and every side the player can stand on, the moves that move a box there.
fn box_moves(grid: &Vec2d<MapCell>, pulls_allowed: bool) -> Vec2d<[Vec<Move>; 4]> {
    let mut box_moves =
        grid.scratchpad_with_default([Vec::new(), Vec::new(), Vec::new(), Vec::new()]);

    for box_pos in grid.positions() {
        if is_wall(grid, box_pos) {
            continue;
        }

        for &player_to_box in &DIRECTIONS {
            let player_pos = box_pos - player_to_box;
            if is_wall(grid, player_pos) {
                continue;
            }

            box_moves[box_pos][player_to_box as usize] =
                one_box_moves(grid, box_pos, player_pos, pulls_allowed);
        }
    }

    box_moves
}

/// BFS of box moves fanning out from the box position, starting from every side.
fn reaches_goal(grid: &Vec2d<MapCell>, box_moves: &Vec2d<[Vec<Move>; 4]>, box_start_pos: Pos) -> bool {
    if grid[box_start_pos] == MapCell::Goal {
        return true;
    }

    // `visited` must be per direction because going back to the same cell from a different direction
    // means different areas are accessible.
    let mut visited = grid.scratchpad_with_default([false; 4]);
    let mut to_visit = VecDeque::new();
    for &initial_dir in &DIRECTIONS {
        let player_start_pos = box_start_pos - initial_dir;
        if !is_wall(grid, player_start_pos) {
            to_visit.push_back((box_start_pos, player_start_pos));
        }
    }

    while let Some((cur_box_pos, cur_player_pos)) = to_visit.pop_front() {
        if grid[cur_box_pos] == MapCell::Goal {
            return true;
        }

        let player_to_box = cur_player_pos.dir_to(cur_box_pos);
        if visited[cur_box_pos][player_to_box as usize] {
            continue;
        }
        visited[cur_box_pos][player_to_box as usize] = true;

        for &mov in &box_moves[cur_box_pos][player_to_box as usize] {
            let new_box_pos = cur_box_pos + mov.dir;
            // pushing leaves the player behind the box, pulling in front of it
            let new_player_pos = if mov.is_pull() {
                new_box_pos + mov.dir
            } else {
                cur_box_pos
            };
            to_visit.push_back((new_box_pos, new_player_pos));
        }
    }

    false
}

/// Finds which pushes (and pulls) of the box the player can make without moving it first
fn one_box_moves(
    grid: &Vec2d<MapCell>,
    box_pos: Pos,
    player_start_pos: Pos,
    pulls_allowed: bool,
) -> Vec<Move> {
    let mut ret = Vec::new();

    let mut touched = grid.scratchpad();
    touched[player_start_pos] = true;

    // BFS turns out to be faster than DFS here on the levels i benched
    let mut to_visit = VecDeque::new();
    to_visit.push_back(player_start_pos);

    while let Some(cur_pos) = to_visit.pop_front() {
        for &dir in &DIRECTIONS {
            let next_pos = cur_pos + dir;
            if next_pos == box_pos {
                // can't step on this pos (so `else if` is not taken) but can we actually push?
                // don't set touched here
                // box pos can be touched multiple times - that's the whole point
                if !is_wall(grid, next_pos + dir) {
                    ret.push(Move::push(dir));
                }
                // pulling means backing away from the box
                if pulls_allowed && !is_wall(grid, cur_pos - dir) {
                    ret.push(Move::pull(dir.inverse()));
                }
            } else if !is_wall(grid, next_pos) && !touched[next_pos] {
                touched[next_pos] = true;
                to_visit.push_back(next_pos);
            }
        }
    }

    ret
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::data::Dir::{self, *};
    use crate::level::Level;

    use super::*;

    #[test]
    fn one_box_reachability() {
        let level = r"
##########
#######  #
####     #
####  ##.#
##### ## #
##   $   #
## ##@#  ######
## ## ####    #
#.$         * #
##########    #
###############";
        let level: Level = level.parse().unwrap();
        let grid = level.grid();
        let center_box = level.boxes()[0];
        let left_box = level.boxes()[1];
        let right_box = level.boxes()[2];

        fn pushes(dirs: Vec<Dir>) -> HashSet<Move> {
            dirs.into_iter().map(Move::push).collect()
        }

        // although the function should handle all player positions,
        // in practise the player will always be next to the box
        let cases = [
            (center_box, Up, vec![Down, Left]),
            (center_box, Right, vec![Down, Left]),
            (center_box, Down, vec![Up, Right]),
            (center_box, Left, vec![Up, Right]),
            (left_box, Up, vec![Left]),
            (left_box, Right, vec![Left]),
            (left_box, Left, vec![Right]),
            (right_box, Up, vec![Up, Right, Down, Left]),
            (right_box, Right, vec![Up, Right, Down, Left]),
            (right_box, Down, vec![Up, Right, Down, Left]),
            (right_box, Left, vec![Up, Right, Down, Left]),
        ];
        for (box_pos, side, expected) in cases.iter().cloned() {
            let moves = one_box_moves(grid, box_pos, box_pos + side, false);
            assert_eq!(moves.into_iter().collect::<HashSet<_>>(), pushes(expected));
        }
    }

    #[test]
    fn dead_squares() {
        let level: Level = r"
#####
##@##
##$##
#  .#
#####"
            .parse()
            .unwrap();
        let expected = r"
11111
11111
11111
11001
11111
"
        .trim_start();
        let dead_squares = find_dead_squares(level.grid(), level.goals(), false);
        assert_eq!(dead_squares.to_string(), expected);
    }

    #[test]
    fn distances_from_goals() {
        let level: Level = r"
#######
#@$ # #
#   #.#
#$.   #
#######"
            .parse()
            .unwrap();
        let dists = goal_dists(level.grid(), level.goals());
        assert_eq!(dists.len(), 2);

        // goals are in reading order
        assert_eq!(level.goals(), &[Pos::new(2, 5), Pos::new(3, 2)]);
        assert_eq!(dists[0][Pos::new(2, 5)], Some(0));
        assert_eq!(dists[0][Pos::new(1, 5)], Some(1));
        assert_eq!(dists[0][Pos::new(1, 2)], Some(6));
        assert_eq!(dists[1][Pos::new(1, 2)], Some(2));
        assert_eq!(dists[1][Pos::new(1, 4)], None);
    }

    #[test]
    fn dead_squares_open_border() {
        let level: Level = r"
 @$.
####"
            .parse()
            .unwrap();
        let dead_squares = find_dead_squares(level.grid(), level.goals(), false);
        assert_eq!(dead_squares.to_string(), "1000\n1111\n");
    }

    #[test]
    fn pulls_reach_more_cells() {
        let level: Level = r"
#####
#   #
#.  #
#$@ #
#####"
            .parse()
            .unwrap();
        let grid = level.grid();
        let box_pos = level.boxes()[0];

        // the box in the corner can't be pushed, only pulled out
        assert!(one_box_moves(grid, box_pos, box_pos + Up, false).is_empty());
        let moves: HashSet<_> = one_box_moves(grid, box_pos, box_pos + Up, true)
            .into_iter()
            .collect();
        assert_eq!(moves, [Move::pull(Up), Move::pull(Right)].iter().cloned().collect::<HashSet<_>>());

        let push_only = find_dead_squares(grid, level.goals(), false);
        assert!(push_only[box_pos]);
        assert_eq!(push_only.to_string(), "11111\n11111\n10011\n11111\n11111\n");

        // a box can be pulled out of any corner and then pushed onto the goal
        let with_pulls = find_dead_squares(grid, level.goals(), true);
        assert!(!with_pulls[box_pos]);
        assert_eq!(with_pulls.to_string(), "11111\n10001\n10001\n10001\n11111\n");
    }
}
