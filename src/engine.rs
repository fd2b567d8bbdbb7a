// Decision engine: combines safety, threats, food routing and open space into one move.
//
// Precedence per call:
// 1. build the four candidates and mark them safe or unsafe (hazards included)
// 2. nothing safe: return the configured fallback move
// 3. food needed and a route to an uncontested target exists: take its first step
// 4. otherwise the safe move with the most open space, ties broken by the configured policy
//
// Nothing is kept between calls.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::time::Instant;

use crate::config::{Config, TieBreakStrategy};
use crate::food::{find_route_within, needs_food, select_target, Route};
use crate::safety::{is_safe, HazardSet};
use crate::snapshot::Snapshot;
use crate::threat::predict_hazards;
use crate::types::{Coord, Direction};

/// Anything that can pick a move from a snapshot.
///
/// The heuristic [`Engine`] is one implementation; a learned policy can stand in for it.
pub trait Policy: Send + Sync {
    fn choose_move(&self, snapshot: &Snapshot) -> Direction;

    /// Same as [`Policy::choose_move`] but asked to answer before `deadline`
    fn choose_move_within(&self, snapshot: &Snapshot, _deadline: Instant) -> Direction {
        self.choose_move(snapshot)
    }
}

/// One of the four possible moves and what we learned about it this turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub direction: Direction,
    pub cell: Coord,
    pub safe: bool,
    /// An opponent at least our length could move its head here
    pub threatened: bool,
    /// Open-space score, only computed for safe candidates that reached scoring
    pub space: Option<usize>,
}

/// Why a move was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// Every candidate was unsafe, the fallback move was returned
    NoSafeMove,
    /// First step on the shortest route to an uncontested food
    Food { target: Coord, steps: usize },
    /// Safe move with the largest open-space score
    Space { score: usize },
    /// The deadline passed; first safe candidate in priority order
    Deadline,
}

#[derive(Debug, Clone)]
pub struct Decision {
    pub direction: Direction,
    pub reason: DecisionReason,
    /// Candidates in tie-break priority order
    pub candidates: Vec<Candidate>,
}

impl Decision {
    /// Directions judged safe this turn
    pub fn safe_moves(&self) -> Vec<Direction> {
        self.candidates
            .iter()
            .filter(|c| c.safe)
            .map(|c| c.direction)
            .collect()
    }
}

/// Heuristic move-selection engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Engine { config }
    }

    /// Picks a move with no time limit
    pub fn decide(&self, snapshot: &Snapshot) -> Decision {
        self.run(snapshot, None)
    }

    /// Picks a move, falling back to the first safe candidate if `deadline` passes
    pub fn decide_within(&self, snapshot: &Snapshot, deadline: Instant) -> Decision {
        self.run(snapshot, Some(deadline))
    }

    fn run(&self, snapshot: &Snapshot, deadline: Option<Instant>) -> Decision {
        let hazards = predict_hazards(snapshot);
        let mut candidates = self.candidates(snapshot, &hazards);

        if !candidates.iter().any(|c| c.safe) {
            let fallback = self.config.fallback.direction;
            warn!(
                "Turn {}: no safe move, falling back to {}",
                snapshot.turn, fallback
            );
            return Decision {
                direction: fallback,
                reason: DecisionReason::NoSafeMove,
                candidates,
            };
        }

        if needs_food(snapshot, self.config.food.health_threshold) {
            if let Some(target) = select_target(snapshot) {
                match find_route_within(target, snapshot, &hazards, deadline) {
                    Route::Found { first_move, steps } => {
                        let safe = candidates
                            .iter()
                            .any(|c| c.direction == first_move && c.safe);
                        if safe {
                            debug!(
                                "Turn {}: heading {} to food at {} ({} steps)",
                                snapshot.turn, first_move, target, steps
                            );
                            return Decision {
                                direction: first_move,
                                reason: DecisionReason::Food { target, steps },
                                candidates,
                            };
                        }
                    }
                    Route::NoRoute => {
                        debug!("Turn {}: no safe route to food at {}", snapshot.turn, target);
                    }
                    Route::TimedOut => return self.deadline_decision(snapshot, candidates),
                }
            } else {
                debug!("Turn {}: all food is contested", snapshot.turn);
            }
        }

        let mut timed_out = false;
        for candidate in candidates.iter_mut().filter(|c| c.safe) {
            candidate.space = self
                .config
                .space
                .evaluate(candidate.cell, snapshot, &hazards, deadline);
            if candidate.space.is_none() {
                timed_out = true;
                break;
            }
            debug!(
                "Turn {}: {} -> {} has space {:?}",
                snapshot.turn, candidate.direction, candidate.cell, candidate.space
            );
        }
        if timed_out {
            return self.deadline_decision(snapshot, candidates);
        }

        let (direction, score) = self.pick_most_space(&candidates);
        Decision {
            direction,
            reason: DecisionReason::Space { score },
            candidates,
        }
    }

    /// The four candidates in priority order
    fn candidates(&self, snapshot: &Snapshot, hazards: &HazardSet) -> Vec<Candidate> {
        let head = snapshot.you.head;
        self.config
            .tie_break
            .priority
            .iter()
            .map(|&direction| {
                let cell = snapshot.step(&head, direction);
                Candidate {
                    direction,
                    cell,
                    safe: is_safe(&cell, snapshot, hazards),
                    threatened: hazards.contains(&cell),
                    space: None,
                }
            })
            .collect()
    }

    /// Highest space score among scored candidates; at least one must be scored
    fn pick_most_space(&self, candidates: &[Candidate]) -> (Direction, usize) {
        let best_score = candidates.iter().filter_map(|c| c.space).max().unwrap_or(0);
        let best: Vec<Direction> = candidates
            .iter()
            .filter(|c| c.space == Some(best_score))
            .map(|c| c.direction)
            .collect();

        let direction = match self.config.tie_break.strategy {
            TieBreakStrategy::Priority => best.first().copied(),
            TieBreakStrategy::Seeded => {
                let mut rng = StdRng::seed_from_u64(self.config.tie_break.seed);
                best.choose(&mut rng).copied()
            }
        };

        (
            direction.unwrap_or(self.config.fallback.direction),
            best_score,
        )
    }

    fn deadline_decision(&self, snapshot: &Snapshot, candidates: Vec<Candidate>) -> Decision {
        warn!(
            "Turn {}: deadline reached, taking first safe move",
            snapshot.turn
        );
        let direction = candidates
            .iter()
            .find(|c| c.safe)
            .map(|c| c.direction)
            .unwrap_or(self.config.fallback.direction);
        Decision {
            direction,
            reason: DecisionReason::Deadline,
            candidates,
        }
    }
}

impl Policy for Engine {
    fn choose_move(&self, snapshot: &Snapshot) -> Direction {
        self.decide(snapshot).direction
    }

    fn choose_move_within(&self, snapshot: &Snapshot, deadline: Instant) -> Direction {
        self.decide_within(snapshot, deadline).direction
    }
}
