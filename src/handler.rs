// HTTP handler bindings for Battlesnake API endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's methods. The move body is read as raw text so that malformed
// requests still reach the Bot and get the fallback move.

use log::warn;
use rocket::data::{Data, ToByteUnit};
use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use floodsnake::bot::Bot;

/// GET / endpoint
/// Returns bot metadata and appearance configuration
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
/// Called when a game starts
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<Value>) -> Status {
    bot.start(&start_req);

    Status::Ok
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", data = "<body>")]
pub async fn get_move(bot: &rocket::State<Bot>, body: Data<'_>) -> Json<Value> {
    let raw = match body.open(1.mebibytes()).into_string().await {
        Ok(raw) => raw.into_inner(),
        Err(e) => {
            warn!("Failed to read move request body: {}", e);
            String::new()
        }
    };

    Json(bot.get_move(&raw).await)
}

/// POST /end endpoint
/// Called when a game ends
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<Value>) -> Status {
    bot.end(&end_req);

    Status::Ok
}
