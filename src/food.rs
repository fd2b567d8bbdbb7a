// Food routing: whether to eat, which food is ours to take, and the first step towards it.

use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use crate::safety::{is_safe, HazardSet};
use crate::snapshot::Snapshot;
use crate::types::{Coord, Direction};

/// Number of expansions between two deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 32;

/// Outcome of a route search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// First move of a shortest safe path and the path length in moves
    Found { first_move: Direction, steps: usize },
    NoRoute,
    /// The deadline passed before the search finished
    TimedOut,
}

/// Food is worth chasing when health is at or below the threshold, or when some
/// opponent is longer than us.
pub fn needs_food(snapshot: &Snapshot, health_threshold: i32) -> bool {
    let hungry = snapshot.you.health <= health_threshold;
    let losing_race = snapshot
        .max_opponent_length()
        .map_or(false, |longest| snapshot.you.length < longest);
    hungry || losing_race
}

/// Picks the nearest uncontested food.
///
/// A food is contested when any opponent head is as close or closer (Manhattan) than ours.
/// Equal distances keep the earlier entry of the food list.
pub fn select_target(snapshot: &Snapshot) -> Option<Coord> {
    let head = snapshot.you.head;
    let mut best: Option<(Coord, i32)> = None;

    for food in &snapshot.food {
        let my_distance = head.manhattan(food);
        let contested = snapshot
            .opponents
            .iter()
            .any(|s| s.head.manhattan(food) <= my_distance);
        if contested {
            continue;
        }
        if best.map_or(true, |(_, d)| my_distance < d) {
            best = Some((*food, my_distance));
        }
    }

    best.map(|(food, _)| food)
}

/// Breadth-first search from our head to `target` through safe cells only.
pub fn find_route(target: Coord, snapshot: &Snapshot, hazards: &HazardSet) -> Route {
    find_route_within(target, snapshot, hazards, None)
}

/// Deadline-aware variant of [`find_route`]
pub fn find_route_within(
    target: Coord,
    snapshot: &Snapshot,
    hazards: &HazardSet,
    deadline: Option<Instant>,
) -> Route {
    let head = snapshot.you.head;
    if target == head {
        return Route::NoRoute;
    }

    let mut visited = HashSet::new();
    let mut queue: VecDeque<(Coord, Direction, usize)> = VecDeque::new();
    visited.insert(head);

    for (dir, next) in snapshot.neighbors(head) {
        if is_safe(&next, snapshot, hazards) {
            visited.insert(next);
            queue.push_back((next, dir, 1));
        }
    }

    let mut expanded = 0;
    while let Some((cell, first_move, steps)) = queue.pop_front() {
        if cell == target {
            return Route::Found { first_move, steps };
        }

        expanded += 1;
        if expanded % DEADLINE_CHECK_INTERVAL == 0
            && deadline.map_or(false, |d| Instant::now() >= d)
        {
            return Route::TimedOut;
        }

        for (_, next) in snapshot.neighbors(cell) {
            if !visited.contains(&next) && is_safe(&next, snapshot, hazards) {
                visited.insert(next);
                queue.push_back((next, first_move, steps + 1));
            }
        }
    }

    Route::NoRoute
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse;
    use serde_json::{json, Value};

    fn snake(id: &str, length: i32, body: &[(i32, i32)]) -> Value {
        let body: Vec<_> = body.iter().map(|(x, y)| json!({ "x": x, "y": y })).collect();
        json!({ "id": id, "length": length, "health": 100, "head": body[0].clone(), "body": body })
    }

    fn board(you: Value, health: i32, opponents: Vec<Value>, food: &[(i32, i32)]) -> Snapshot {
        let mut you = you;
        you["health"] = json!(health);
        let food: Vec<_> = food.iter().map(|(x, y)| json!({ "x": x, "y": y })).collect();
        parse(&json!({
            "board": { "width": 11, "height": 11, "food": food, "snakes": opponents },
            "you": you
        }))
        .unwrap()
    }

    #[test]
    fn test_needs_food_when_health_at_threshold() {
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        assert!(needs_food(&board(me.clone(), 80, vec![], &[]), 80));
        assert!(!needs_food(&board(me, 81, vec![], &[]), 80));
    }

    #[test]
    fn test_needs_food_when_losing_length_race() {
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        let longer = snake("them", 4, &[(0, 0), (0, 1), (0, 2), (0, 3)]);
        let equal = snake("them", 3, &[(0, 0), (0, 1), (0, 2)]);
        assert!(needs_food(&board(me.clone(), 100, vec![longer], &[]), 80));
        assert!(!needs_food(&board(me, 100, vec![equal], &[]), 80));
    }

    #[test]
    fn test_no_opponents_means_no_race() {
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        assert!(!needs_food(&board(me, 100, vec![], &[]), 80));
    }

    #[test]
    fn test_equidistant_food_is_contested() {
        let me = snake("me", 3, &[(2, 5), (1, 5), (0, 5)]);
        let them = snake("them", 3, &[(8, 5), (9, 5), (10, 5)]);
        // (5,5) is three away from both heads
        let s = board(me, 10, vec![them], &[(5, 5)]);
        assert_eq!(select_target(&s), None);
    }

    #[test]
    fn test_strictly_closer_food_is_ours() {
        let me = snake("me", 3, &[(3, 5), (2, 5), (1, 5)]);
        let them = snake("them", 3, &[(8, 5), (9, 5), (10, 5)]);
        let s = board(me, 10, vec![them], &[(5, 5)]);
        assert_eq!(select_target(&s), Some(Coord::new(5, 5)));
    }

    #[test]
    fn test_nearest_uncontested_food_wins() {
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        let them = snake("them", 3, &[(9, 9), (9, 10), (10, 10)]);
        // (8,8) is contested, (5,8) is 3 away, (1,5) is 4 away
        let s = board(me, 10, vec![them], &[(8, 8), (1, 5), (5, 8)]);
        assert_eq!(select_target(&s), Some(Coord::new(5, 8)));
    }

    #[test]
    fn test_ties_keep_food_list_order() {
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        let s = board(me, 10, vec![], &[(7, 5), (3, 5), (5, 7)]);
        assert_eq!(select_target(&s), Some(Coord::new(7, 5)));
    }

    #[test]
    fn test_route_follows_shortest_path() {
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        let s = board(me, 10, vec![], &[(5, 8)]);
        assert_eq!(
            find_route(Coord::new(5, 8), &s, &HazardSet::new()),
            Route::Found {
                first_move: Direction::Up,
                steps: 3
            }
        );
    }

    #[test]
    fn test_route_goes_around_obstacle() {
        // our own body blocks the direct way down, the shortest detour is 5 moves
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        let s = board(me, 10, vec![], &[(5, 2)]);
        match find_route(Coord::new(5, 2), &s, &HazardSet::new()) {
            Route::Found { first_move, steps } => {
                assert_eq!(steps, 5);
                assert!(first_move == Direction::Left || first_move == Direction::Right);
            }
            other => panic!("expected a route, got {:?}", other),
        }
    }

    #[test]
    fn test_route_first_move_is_deterministic() {
        // (6,6) can be reached via up or right first; up is explored first
        let me = snake("me", 3, &[(5, 5), (4, 5), (3, 5)]);
        let s = board(me, 10, vec![], &[(6, 6)]);
        for _ in 0..5 {
            assert_eq!(
                find_route(Coord::new(6, 6), &s, &HazardSet::new()),
                Route::Found {
                    first_move: Direction::Up,
                    steps: 2
                }
            );
        }
    }

    #[test]
    fn test_unreachable_target_reports_no_route() {
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        let s = board(me, 10, vec![], &[(0, 0)]);
        let hazards: HazardSet = [Coord::new(1, 0), Coord::new(0, 1)].into_iter().collect();
        assert_eq!(find_route(Coord::new(0, 0), &s, &hazards), Route::NoRoute);
    }

    #[test]
    fn test_hazard_on_target_blocks_route() {
        let me = snake("me", 3, &[(5, 5), (5, 4), (5, 3)]);
        let s = board(me, 10, vec![], &[(5, 7)]);
        let hazards: HazardSet = [Coord::new(5, 7)].into_iter().collect();
        assert_eq!(find_route(Coord::new(5, 7), &s, &hazards), Route::NoRoute);
    }
}
