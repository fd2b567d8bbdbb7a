// Open-space estimation used to rank otherwise equivalent moves.

use serde::Deserialize;
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use crate::safety::{is_safe, HazardSet};
use crate::snapshot::Snapshot;
use crate::types::Coord;

/// Number of expansions between two deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 32;

/// How open space around a candidate head is measured.
///
/// Scores are only compared within one decision, so every candidate must use the same method.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum SpaceMethod {
    /// True breadth-first reachability over safe cells
    #[default]
    FloodFill,
    /// Safe cells within a Manhattan radius; `None` means `min(width, height)`
    Radius {
        #[serde(default)]
        radius: Option<i32>,
    },
}

impl SpaceMethod {
    /// Scores a start cell, or `None` if the deadline passed first
    pub fn evaluate(
        &self,
        start: Coord,
        snapshot: &Snapshot,
        hazards: &HazardSet,
        deadline: Option<Instant>,
    ) -> Option<usize> {
        match *self {
            SpaceMethod::FloodFill => reachable_area_within(start, snapshot, hazards, deadline),
            SpaceMethod::Radius { radius } => {
                let radius = radius.unwrap_or_else(|| snapshot.width.min(snapshot.height));
                Some(radius_estimate(start, snapshot, hazards, radius))
            }
        }
    }
}

/// Counts the cells reachable from `start` through safe cells, `start` included.
pub fn reachable_area(start: Coord, snapshot: &Snapshot, hazards: &HazardSet) -> usize {
    // Without a deadline the search always completes.
    reachable_area_within(start, snapshot, hazards, None).unwrap_or(0)
}

/// Deadline-aware flood-fill; `None` means the deadline passed before the search finished
pub fn reachable_area_within(
    start: Coord,
    snapshot: &Snapshot,
    hazards: &HazardSet,
    deadline: Option<Instant>,
) -> Option<usize> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);
    let mut area = 0;

    while let Some(cell) = queue.pop_front() {
        area += 1;

        if area % DEADLINE_CHECK_INTERVAL == 0 && deadline_passed(deadline) {
            return None;
        }

        for (_, next) in snapshot.neighbors(cell) {
            if !visited.contains(&next) && is_safe(&next, snapshot, hazards) {
                visited.insert(next);
                queue.push_back(next);
            }
        }
    }

    Some(area)
}

/// Counts safe cells within Manhattan distance `radius` of `start`.
///
/// Cheaper than a flood-fill but blind to walls that cut the area off.
pub fn radius_estimate(start: Coord, snapshot: &Snapshot, hazards: &HazardSet, radius: i32) -> usize {
    let radius = radius.max(0);
    let mut count = 0;

    for dx in -radius..=radius {
        let remaining = radius - dx.abs();
        for dy in -remaining..=remaining {
            let cell = Coord::new(start.x + dx, start.y + dy);
            if is_safe(&cell, snapshot, hazards) {
                count += 1;
            }
        }
    }

    count
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.map_or(false, |d| Instant::now() >= d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse;
    use serde_json::json;

    fn empty_board(width: i32, height: i32, head: (i32, i32)) -> Snapshot {
        let head = json!({ "x": head.0, "y": head.1 });
        parse(&json!({
            "board": { "width": width, "height": height, "food": [], "snakes": [] },
            "you": { "id": "me", "head": head, "body": [head, head, head] }
        }))
        .unwrap()
    }

    /// 7x7 board with a vertical wall of our body at x=3 from y=0 to y=6
    fn split_board() -> Snapshot {
        let body: Vec<_> = (0..7).rev().map(|y| json!({ "x": 3, "y": y })).collect();
        parse(&json!({
            "board": { "width": 7, "height": 7, "food": [], "snakes": [] },
            "you": { "id": "me", "head": body[0].clone(), "body": body }
        }))
        .unwrap()
    }

    #[test]
    fn test_flood_fill_on_empty_board_excludes_own_head() {
        let s = empty_board(11, 11, (5, 5));
        assert_eq!(reachable_area(Coord::new(5, 6), &s, &HazardSet::new()), 120);
    }

    #[test]
    fn test_flood_fill_stops_at_walls() {
        let s = split_board();
        let hazards = HazardSet::new();
        assert_eq!(reachable_area(Coord::new(0, 0), &s, &hazards), 21);
        assert_eq!(reachable_area(Coord::new(6, 6), &s, &hazards), 21);
    }

    #[test]
    fn test_flood_fill_respects_hazards() {
        let s = split_board();
        let mut hazards = HazardSet::new();
        // seal off the bottom-left cell
        hazards.insert(Coord::new(1, 0));
        hazards.insert(Coord::new(0, 1));
        assert_eq!(reachable_area(Coord::new(0, 0), &s, &hazards), 1);
    }

    #[test]
    fn test_flood_fill_is_independent_of_start_within_region() {
        let s = split_board();
        let hazards = HazardSet::new();
        let a = reachable_area(Coord::new(0, 0), &s, &hazards);
        let b = reachable_area(Coord::new(2, 6), &s, &hazards);
        let c = reachable_area(Coord::new(1, 3), &s, &hazards);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_flood_fill_matches_under_either_y_axis() {
        // neighbour order changes with the convention, the count must not
        let s = split_board();
        let flipped = s.clone().with_y_axis(crate::types::YAxis::Down);
        let hazards = HazardSet::new();
        for start in [Coord::new(0, 0), Coord::new(5, 2), Coord::new(2, 6)] {
            assert_eq!(
                reachable_area(start, &s, &hazards),
                reachable_area(start, &flipped, &hazards)
            );
        }
    }

    #[test]
    fn test_expired_deadline_aborts_large_search() {
        let s = empty_board(19, 19, (9, 9));
        let past = Instant::now();
        assert_eq!(
            reachable_area_within(Coord::new(0, 0), &s, &HashSet::new(), Some(past)),
            None
        );
    }

    #[test]
    fn test_radius_estimate_counts_diamond() {
        let s = empty_board(11, 11, (0, 0));
        // radius 2 diamond has 13 cells
        assert_eq!(radius_estimate(Coord::new(5, 5), &s, &HazardSet::new(), 2), 13);
    }

    #[test]
    fn test_radius_estimate_clips_to_board() {
        let s = empty_board(11, 11, (5, 5));
        // corner: (0,0),(1,0),(0,1) -> 3 cells within radius 1 on the board
        assert_eq!(radius_estimate(Coord::new(0, 0), &s, &HazardSet::new(), 1), 3);
    }

    #[test]
    fn test_flood_fill_is_the_default_method() {
        assert_eq!(SpaceMethod::default(), SpaceMethod::FloodFill);
    }

    #[test]
    fn test_method_defaults_radius_to_smaller_dimension() {
        let s = empty_board(3, 3, (0, 0));
        let method = SpaceMethod::Radius { radius: None };
        // every cell but the head lies within distance 3 of the centre
        assert_eq!(
            method.evaluate(Coord::new(1, 1), &s, &HazardSet::new(), None),
            Some(8)
        );
    }
}
