// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// Endpoint-facing side of the snake. The move logic itself lives in engine.rs.
// For more info see docs.battlesnake.com

use log::{debug, info, log_enabled, warn, Level};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::encoding::render_observation;
use crate::engine::{Engine, Policy};
use crate::snapshot;
use crate::types::{Direction, YAxis};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    policy: Arc<dyn Policy>,
}

impl Bot {
    /// Creates a new Bot instance backed by the heuristic engine
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let engine = Engine::new(config.clone());
        Bot::with_policy(config, Arc::new(engine))
    }

    /// Creates a Bot that answers moves with any other policy
    pub fn with_policy(config: Config, policy: Arc<dyn Policy>) -> Self {
        Bot { config, policy }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "ksiopiolosz-aterlo",
            "color": "#88CC88",
            "head": "beluga",
            "tail": "round-bum",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, request: &Value) {
        info!("GAME START {}", Self::game_id(request));
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, request: &Value) {
        info!("GAME OVER {}", Self::game_id(request));
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// Malformed requests are answered with the fallback move instead of an error.
    /// The decision runs on the blocking pool with the configured time budget as deadline.
    ///
    /// # Arguments
    /// * `raw` - Request body as received
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(&self, raw: &str) -> Value {
        let start_time = Instant::now();
        let deadline = start_time + Duration::from_millis(self.config.timing.effective_budget_ms());
        let fallback = self.config.fallback.direction;

        let snapshot = match snapshot::from_json(raw) {
            Ok(s) => s.with_y_axis(self.config.coordinates.y_axis),
            Err(e) => {
                warn!("Malformed snapshot ({}), answering {}", e, fallback);
                return Self::response(fallback);
            }
        };
        let turn = snapshot.turn;
        let game_id = snapshot.game_id.clone();

        info!("Game {} turn {}: Computing move", game_id, turn);
        if log_enabled!(Level::Debug) {
            let flip = snapshot.y_axis == YAxis::Up;
            debug!(
                "Turn {}: board (top row first)\n{}",
                turn,
                render_observation(&snapshot, flip)
            );
        }

        let policy = self.policy.clone();
        let chosen_move =
            match tokio::task::spawn_blocking(move || policy.choose_move_within(&snapshot, deadline))
                .await
            {
                Ok(dir) => dir,
                Err(e) => {
                    warn!("Turn {}: move computation failed ({}), answering {}", turn, e, fallback);
                    fallback
                }
            };

        info!(
            "Game {} turn {}: Chose {} (time: {}ms)",
            game_id,
            turn,
            chosen_move.as_str(),
            start_time.elapsed().as_millis()
        );

        Self::response(chosen_move)
    }

    fn response(direction: Direction) -> Value {
        json!({ "move": direction.as_str() })
    }

    fn game_id(request: &Value) -> &str {
        request["game"]["id"].as_str().unwrap_or("<unknown>")
    }
}
