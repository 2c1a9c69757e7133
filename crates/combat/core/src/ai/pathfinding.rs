//! Breadth-first search and greedy stepping on the combat grid.
//!
//! Walkable means inside the map, not blocking, and not held by a living
//! combatant. Every step costs one move point.

use std::collections::{HashMap, VecDeque};

use crate::env::GridOracle;
use crate::movement::is_walkable;
use crate::state::{CombatState, Position};

/// Result of a breadth-first exploration from one origin.
#[derive(Clone, Debug)]
pub struct Reach {
    origin: Position,
    /// Tile -> (previous tile, steps from origin).
    visited: HashMap<Position, (Position, u32)>,
}

impl Reach {
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn steps_to(&self, tile: Position) -> Option<u32> {
        if tile == self.origin {
            return Some(0);
        }
        self.visited.get(&tile).map(|(_, steps)| *steps)
    }

    /// Path from the origin to `tile`, origin excluded.
    pub fn path_to(&self, tile: Position) -> Option<Vec<Position>> {
        let mut path = Vec::new();
        let mut current = tile;
        while current != self.origin {
            let (previous, _) = self.visited.get(&current)?;
            path.push(current);
            current = *previous;
        }
        path.reverse();
        Some(path)
    }

    /// Every reachable tile with its step count, origin first, then in
    /// ascending steps and tile order.
    pub fn tiles(&self) -> Vec<(Position, u32)> {
        let mut tiles: Vec<(Position, u32)> = self
            .visited
            .iter()
            .map(|(tile, (_, steps))| (*tile, *steps))
            .collect();
        tiles.sort_by_key(|(tile, steps)| (*steps, *tile));
        tiles.insert(0, (self.origin, 0));
        tiles
    }
}

/// Explores walkable tiles from `origin`, up to `max_steps` when given.
pub fn explore(
    state: &CombatState,
    grid: &dyn GridOracle,
    origin: Position,
    max_steps: Option<u32>,
) -> Reach {
    let mut visited = HashMap::new();
    let mut queue = VecDeque::from([(origin, 0u32)]);

    while let Some((tile, steps)) = queue.pop_front() {
        if max_steps.is_some_and(|max| steps >= max) {
            continue;
        }
        for next in tile.neighbors4() {
            if next == origin || visited.contains_key(&next) || !is_walkable(state, grid, next) {
                continue;
            }
            visited.insert(next, (tile, steps + 1));
            queue.push_back((next, steps + 1));
        }
    }

    Reach { origin, visited }
}

/// Tiles reachable with `move_points`, origin included at zero steps.
pub fn reachable_tiles(
    state: &CombatState,
    grid: &dyn GridOracle,
    origin: Position,
    move_points: u32,
) -> Vec<(Position, u32)> {
    explore(state, grid, origin, Some(move_points)).tiles()
}

/// Shortest path toward the nearest free tile adjacent to `target`, cut to
/// `move_points` steps.
///
/// Empty when already adjacent or out of move points. Falls back to greedy
/// steps when every adjacent tile is unreachable.
pub fn path_to_adjacent(
    state: &CombatState,
    grid: &dyn GridOracle,
    origin: Position,
    target: Position,
    move_points: u32,
) -> Vec<Position> {
    if origin.manhattan(target) <= 1 || move_points == 0 {
        return Vec::new();
    }

    let reach = explore(state, grid, origin, None);
    let goal = target
        .neighbors4()
        .into_iter()
        .filter_map(|tile| reach.steps_to(tile).map(|steps| (steps, tile)))
        .min();

    match goal.and_then(|(_, tile)| reach.path_to(tile)) {
        Some(mut path) => {
            path.truncate(move_points as usize);
            path
        }
        None => greedy_path(state, grid, origin, target, move_points, Heading::Toward),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Toward,
    Away,
}

/// Neighbor that strictly improves the distance to `other` in the given
/// heading. Ties go to the first neighbor in N, E, S, W order.
pub fn greedy_step(
    state: &CombatState,
    grid: &dyn GridOracle,
    from: Position,
    other: Position,
    heading: Heading,
) -> Option<Position> {
    let current = from.manhattan(other);
    let candidates = from
        .neighbors4()
        .into_iter()
        .filter(|tile| is_walkable(state, grid, *tile));
    match heading {
        Heading::Toward => candidates
            .filter(|tile| tile.manhattan(other) < current)
            .min_by_key(|tile| tile.manhattan(other)),
        Heading::Away => candidates
            .filter(|tile| tile.manhattan(other) > current)
            .fold(None, |best: Option<Position>, tile| match best {
                Some(b) if b.manhattan(other) >= tile.manhattan(other) => Some(b),
                _ => Some(tile),
            }),
    }
}

/// Up to `steps` greedy steps toward or away from `other`.
pub fn greedy_path(
    state: &CombatState,
    grid: &dyn GridOracle,
    from: Position,
    other: Position,
    steps: u32,
    heading: Heading,
) -> Vec<Position> {
    let mut path = Vec::new();
    let mut current = from;
    for _ in 0..steps {
        if heading == Heading::Toward && current.manhattan(other) <= 1 {
            break;
        }
        let Some(next) = greedy_step(state, grid, current, other, heading) else {
            break;
        };
        if path.contains(&next) {
            break;
        }
        path.push(next);
        current = next;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticGrid;
    use crate::state::EncounterId;
    use crate::test_support::Fixture;

    #[test]
    fn bfs_routes_around_walls() {
        let grid = StaticGrid::from_ascii(&[
            ".....", //
            ".###.",
            "..#..",
            ".....",
        ]);
        let state = CombatState::new(EncounterId(1), 1);
        let reach = explore(&state, &grid, Position::new(1, 2), None);
        // (3, 2) sits behind the wall column: down, across, up.
        assert_eq!(reach.steps_to(Position::new(3, 2)), Some(4));
        let path = reach.path_to(Position::new(3, 2)).expect("reachable");
        assert_eq!(path.len(), 4);
        assert!(path.iter().all(|t| !grid.is_blocking(*t)));
    }

    #[test]
    fn reachable_tiles_respect_move_points() {
        let fx = Fixture::duel();
        let tiles = reachable_tiles(&fx.state, &fx.grid, Position::new(6, 6), 1);
        assert_eq!(tiles.len(), 5);
        assert_eq!(tiles[0], (Position::new(6, 6), 0));
    }

    #[test]
    fn approach_stops_next_to_the_target() {
        let fx = Fixture::duel();
        let path = path_to_adjacent(
            &fx.state,
            &fx.grid,
            Position::new(7, 2),
            Fixture::hostile_tile(),
            10,
        );
        assert_eq!(path.last(), Some(&Position::new(4, 2)));
        assert_eq!(path.len(), 3);

        let capped = path_to_adjacent(
            &fx.state,
            &fx.grid,
            Position::new(7, 2),
            Fixture::hostile_tile(),
            2,
        );
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn greedy_retreat_increases_distance() {
        let fx = Fixture::duel();
        let path = greedy_path(
            &fx.state,
            &fx.grid,
            Position::new(5, 5),
            Position::new(4, 5),
            3,
            Heading::Away,
        );
        assert_eq!(path.len(), 3);
        let mut last = 1;
        for tile in path {
            let d = tile.manhattan(Position::new(4, 5));
            assert!(d > last);
            last = d;
        }
    }
}
