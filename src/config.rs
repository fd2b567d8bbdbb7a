// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::space::SpaceMethod;
use crate::types::{Direction, YAxis};

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub food: FoodConfig,
    pub space: SpaceMethod,
    pub tie_break: TieBreakConfig,
    pub fallback: FallbackConfig,
    pub coordinates: CoordinatesConfig,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// When food is worth chasing
#[derive(Debug, Deserialize, Clone)]
pub struct FoodConfig {
    /// Seek food at or below this health, regardless of length
    pub health_threshold: i32,
}

/// How equally scored safe moves are separated
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakStrategy {
    /// First move in `priority` order wins
    Priority,
    /// Seeded random choice among the best moves
    Seeded,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TieBreakConfig {
    pub strategy: TieBreakStrategy,
    pub seed: u64,
    pub priority: [Direction; 4],
}

/// Last-resort move when nothing is safe
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    pub direction: Direction,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CoordinatesConfig {
    pub y_axis: YAxis,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
            },
            food: FoodConfig {
                health_threshold: 80,
            },
            space: SpaceMethod::FloodFill,
            tie_break: TieBreakConfig {
                strategy: TieBreakStrategy::Priority,
                seed: 0,
                priority: Direction::all(),
            },
            fallback: FallbackConfig {
                direction: Direction::Up,
            },
            coordinates: CoordinatesConfig {
                y_axis: YAxis::Up,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Snake.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }

    /// The priority list must name every direction exactly once
    fn validate(&self) -> Result<(), String> {
        for dir in Direction::all() {
            let count = self.tie_break.priority.iter().filter(|&&d| d == dir).count();
            if count != 1 {
                return Err(format!(
                    "tie_break.priority must list '{}' exactly once (found {})",
                    dir, count
                ));
            }
        }
        Ok(())
    }
}
