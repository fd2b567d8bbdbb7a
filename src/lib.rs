// Library exports for the Battlesnake move engine
// The server binary and the integration tests both build on these modules

pub mod bot;
pub mod config;
pub mod encoding;
pub mod engine;
pub mod food;
pub mod safety;
pub mod snapshot;
pub mod space;
pub mod threat;
pub mod types;
