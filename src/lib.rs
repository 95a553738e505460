//! Chakra Hustle - a side-scrolling chakra platformer, simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, AI, abilities, orchestration)
//! - `tuning`: Data-driven game balance and per-run configuration
//! - `economy`: Star-token bookkeeping shared with the shop/persistence layer
//! - `error`: Configuration errors

pub mod economy;
pub mod error;
pub mod sim;
pub mod tuning;

pub use economy::TokenEconomy;
pub use error::{ConfigError, Result};
pub use tuning::{RunConfig, RunModifiers, StatOverrides, Tuning};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per real second (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;

    /// Default playfield dimensions
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Number of chakra worlds (and ability slots)
    pub const WORLD_COUNT: usize = 7;
    pub const ABILITY_COUNT: usize = 7;

    /// Default particle pool capacity
    pub const PARTICLE_POOL_SIZE: usize = 500;

    /// Vertical band below a platform top that still counts as standing on it
    pub const LANDING_TOLERANCE: f32 = 20.0;

    /// Boss phase thresholds as fractions of max HP
    pub const BOSS_PHASE_2_THRESHOLD: f32 = 0.66;
    pub const BOSS_PHASE_3_THRESHOLD: f32 = 0.33;
    /// Phase transition window (ticks)
    pub const BOSS_TRANSITION_TICKS: u32 = 60;

    /// Difficulty gained per New Game Plus cycle
    pub const NG_PLUS_DIFFICULTY_STEP: f32 = 0.5;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}


/// Scale a tick count by a multiplier, rounding to the nearest tick
#[inline]
pub fn scale_ticks(ticks: u32, mult: f32) -> u32 {
    (ticks as f32 * mult).round().max(0.0) as u32
}
