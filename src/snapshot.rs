// Board model: turns a raw Battlesnake request into an immutable, queryable snapshot.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::types::{Battlesnake, Coord, Direction, GameState, YAxis};

const DEFAULT_HEALTH: i32 = 100;

/// Largest accepted board side; standard boards are 7, 11 or 19 wide
pub const MAX_DIMENSION: i32 = 64;

/// Raised when a request is missing a required field or carries one of the wrong shape
#[derive(Debug, Error)]
pub enum MalformedSnapshotError {
    #[error("snapshot is not a valid game state: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },
}

impl MalformedSnapshotError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MalformedSnapshotError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// One snake as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub id: String,
    pub head: Coord,
    /// Occupied cells, head first
    pub body: Vec<Coord>,
    /// Reported length; used for size comparisons, `body` is used for occupancy
    pub length: i32,
    pub health: i32,
}

/// Immutable per-turn view of the game
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub game_id: String,
    pub turn: i32,
    pub width: i32,
    pub height: i32,
    pub you: Snake,
    pub opponents: Vec<Snake>,
    pub food: Vec<Coord>,
    pub y_axis: YAxis,
    occupied: HashSet<Coord>,
}

/// Parses a raw JSON request body
pub fn from_json(raw: &str) -> Result<Snapshot, MalformedSnapshotError> {
    let state: GameState = serde_json::from_str(raw)?;
    Snapshot::from_game_state(&state)
}

/// Parses an already-decoded JSON value
pub fn parse(raw: &Value) -> Result<Snapshot, MalformedSnapshotError> {
    let state = GameState::deserialize(raw)?;
    Snapshot::from_game_state(&state)
}

impl Snapshot {
    /// Validates the wire representation and builds the snapshot
    pub fn from_game_state(state: &GameState) -> Result<Snapshot, MalformedSnapshotError> {
        let board = state
            .board
            .as_ref()
            .ok_or(MalformedSnapshotError::MissingField("board"))?;
        let width = board
            .width
            .ok_or(MalformedSnapshotError::MissingField("board.width"))?;
        let height = board
            .height
            .ok_or(MalformedSnapshotError::MissingField("board.height"))?;
        Self::check_dimension(width, "board.width")?;
        Self::check_dimension(height, "board.height")?;
        let check = |cell: &Coord, field: String| Self::check_cell(cell, field, width, height);

        let raw_you = state
            .you
            .as_ref()
            .ok_or(MalformedSnapshotError::MissingField("you"))?;
        let head = raw_you
            .head
            .ok_or(MalformedSnapshotError::MissingField("you.head"))?;
        let body = raw_you
            .body
            .clone()
            .ok_or(MalformedSnapshotError::MissingField("you.body"))?;
        if body.is_empty() {
            return Err(MalformedSnapshotError::invalid("you.body", "must contain at least the head"));
        }
        check(&head, "you.head".to_string())?;
        for (j, cell) in body.iter().enumerate() {
            check(cell, format!("you.body[{}]", j))?;
        }
        let you = Snake {
            id: raw_you.id.clone(),
            head,
            length: Self::reconcile_length(raw_you, body.len(), "you.length")?,
            health: raw_you.health.unwrap_or(DEFAULT_HEALTH),
            body,
        };

        let mut opponents = Vec::new();
        for (i, raw) in board.snakes.iter().enumerate() {
            if Self::is_same_snake(&you, raw) {
                continue;
            }
            let body = match &raw.body {
                Some(body) if !body.is_empty() => body.clone(),
                _ => {
                    return Err(MalformedSnapshotError::invalid(
                        format!("board.snakes[{}].body", i),
                        "must contain at least the head",
                    ))
                }
            };
            let head = raw.head.unwrap_or(body[0]);
            check(&head, format!("board.snakes[{}].head", i))?;
            for (j, cell) in body.iter().enumerate() {
                check(cell, format!("board.snakes[{}].body[{}]", i, j))?;
            }
            opponents.push(Snake {
                id: raw.id.clone(),
                head,
                length: Self::reconcile_length(raw, body.len(), "board.snakes[].length")?,
                health: raw.health.unwrap_or(DEFAULT_HEALTH),
                body,
            });
        }

        for (i, food) in board.food.iter().enumerate() {
            check(food, format!("board.food[{}]", i))?;
        }

        let occupied = you
            .body
            .iter()
            .chain(opponents.iter().flat_map(|s| s.body.iter()))
            .copied()
            .collect();

        Ok(Snapshot {
            game_id: state.game.id.clone(),
            turn: state.turn,
            width,
            height,
            you,
            opponents,
            food: board.food.clone(),
            y_axis: YAxis::default(),
            occupied,
        })
    }

    /// Reinterprets move directions under another y-axis convention
    pub fn with_y_axis(mut self, y_axis: YAxis) -> Self {
        self.y_axis = y_axis;
        self
    }

    fn is_same_snake(you: &Snake, raw: &Battlesnake) -> bool {
        if you.id.is_empty() {
            raw.head.or_else(|| raw.body.as_ref().and_then(|b| b.first().copied())) == Some(you.head)
        } else {
            raw.id == you.id
        }
    }

    fn check_dimension(value: i32, field: &'static str) -> Result<(), MalformedSnapshotError> {
        if value <= 0 {
            return Err(MalformedSnapshotError::invalid(field, "must be positive"));
        }
        if value > MAX_DIMENSION {
            return Err(MalformedSnapshotError::invalid(
                field,
                format!("{} exceeds the maximum of {}", value, MAX_DIMENSION),
            ));
        }
        Ok(())
    }

    fn check_cell(
        cell: &Coord,
        field: String,
        width: i32,
        height: i32,
    ) -> Result<(), MalformedSnapshotError> {
        if cell.x < 0 || cell.x >= width || cell.y < 0 || cell.y >= height {
            return Err(MalformedSnapshotError::invalid(
                field,
                format!("{} lies outside a {}x{} board", cell, width, height),
            ));
        }
        Ok(())
    }

    fn reconcile_length(
        raw: &Battlesnake,
        body_len: usize,
        field: &'static str,
    ) -> Result<i32, MalformedSnapshotError> {
        match raw.length {
            Some(len) if len < 1 => Err(MalformedSnapshotError::invalid(field, "must be at least 1")),
            Some(len) => Ok(len),
            None => Ok(body_len as i32),
        }
    }

    pub fn in_bounds(&self, cell: &Coord) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// True if any snake body (tails included) covers the cell this turn
    pub fn is_occupied(&self, cell: &Coord) -> bool {
        self.occupied.contains(cell)
    }

    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// The cell reached from `cell` by moving in `dir`
    pub fn step(&self, cell: &Coord, dir: Direction) -> Coord {
        dir.apply(cell, self.y_axis)
    }

    /// The four neighbours of a cell in fixed direction order, bounds not checked
    pub fn neighbors(&self, cell: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::all()
            .into_iter()
            .map(move |dir| (dir, self.step(&cell, dir)))
    }

    pub fn max_opponent_length(&self) -> Option<i32> {
        self.opponents.iter().map(|s| s.length).max()
    }
}
