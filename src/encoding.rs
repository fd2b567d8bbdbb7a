// Flattened board encoding consumed by learned policies, also handy for debug dumps.
//
// Cells are written row by row, `height` rows of `width` codes. Row 0 holds y = 0 unless
// `flip_y` is set, in which case row 0 holds y = height - 1. A policy trained on flipped
// boards has to be fed flipped observations; which convention a given model expects must
// be checked against its training data.

use std::fmt::Write;

use crate::snapshot::Snapshot;
use crate::types::Coord;

pub const EMPTY: i32 = 0;
pub const OWN_HEAD: i32 = 1;
pub const OWN_BODY: i32 = 2;
pub const OPPONENT_HEAD: i32 = 3;
pub const OPPONENT_BODY: i32 = 4;
pub const FOOD: i32 = 5;

/// Encodes the snapshot as a flat `height * width` vector of cell codes.
///
/// Later layers overwrite earlier ones: opponents, then our snake, then food.
pub fn encode_observation(snapshot: &Snapshot, flip_y: bool) -> Vec<i32> {
    let width = snapshot.width as usize;
    let mut grid = vec![EMPTY; snapshot.cell_count()];

    let mut put = |cell: &Coord, code: i32| {
        if !snapshot.in_bounds(cell) {
            return;
        }
        let row = if flip_y {
            snapshot.height - 1 - cell.y
        } else {
            cell.y
        };
        grid[row as usize * width + cell.x as usize] = code;
    };

    for opponent in &snapshot.opponents {
        for segment in &opponent.body {
            put(segment, OPPONENT_BODY);
        }
        put(&opponent.head, OPPONENT_HEAD);
    }

    for segment in &snapshot.you.body {
        put(segment, OWN_BODY);
    }
    put(&snapshot.you.head, OWN_HEAD);

    for food in &snapshot.food {
        put(food, FOOD);
    }

    grid
}

/// Renders an encoded observation as text, one row per line
pub fn render_observation(snapshot: &Snapshot, flip_y: bool) -> String {
    let width = snapshot.width as usize;
    let grid = encode_observation(snapshot, flip_y);
    let mut out = String::with_capacity(grid.len() * 2);
    for row in grid.chunks(width) {
        for (i, code) in row.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}", code);
        }
        out.push('\n');
    }
    out
}
