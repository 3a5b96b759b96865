//! Session start-up.
//!
//! Adapters go through this crate to bring a session to life: it validates
//! the layout, constructs the world, and hands out the greeting shown before
//! the first tick.

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

use maze_chase_core::{ConfigError, MazeLayout, Tuning, WELCOME_BANNER};
use maze_chase_world::World;

/// Validates the configuration and constructs a fresh session.
pub fn start_session(layout: MazeLayout, tuning: Tuning) -> Result<World, ConfigError> {
    World::new(layout, tuning)
}

/// Greeting adapters present when a session begins.
#[must_use]
pub fn welcome_banner() -> &'static str {
    WELCOME_BANNER
}
