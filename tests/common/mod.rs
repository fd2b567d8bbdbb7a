// Shared builders for integration tests

#![allow(dead_code)]

use serde_json::{json, Value};

pub fn cells(points: &[(i32, i32)]) -> Vec<Value> {
    points.iter().map(|(x, y)| json!({ "x": x, "y": y })).collect()
}

pub fn snake(id: &str, health: i32, body: &[(i32, i32)]) -> Value {
    let body = cells(body);
    json!({
        "id": id,
        "name": id,
        "health": health,
        "length": body.len(),
        "head": body[0].clone(),
        "body": body,
    })
}

/// Full /move request; `you` is also listed in `board.snakes` like the real API does
pub fn request(width: i32, height: i32, you: Value, opponents: Vec<Value>, food: &[(i32, i32)]) -> Value {
    let mut snakes = vec![you.clone()];
    snakes.extend(opponents);
    json!({
        "game": { "id": "test-game", "ruleset": {}, "timeout": 500 },
        "turn": 1,
        "board": {
            "width": width,
            "height": height,
            "food": cells(food),
            "snakes": snakes,
            "hazards": [],
        },
        "you": you,
    })
}
