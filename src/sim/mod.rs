//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (slow motion scales movement, never the tick count)
//! - Seeded RNG only, one salted stream per subsystem
//! - Stable iteration order
//! - No rendering, audio or platform dependencies

pub mod abilities;
pub mod boss;
pub mod camera;
pub mod chakra;
pub mod clock;
pub mod enemy;
pub mod events;
pub mod generator;
pub mod geometry;
pub mod input;
pub mod particles;
pub mod player;
pub mod rng;
pub mod state;
pub mod terrain;
pub mod tick;

pub use abilities::{ABILITIES, AbilityDef, AbilityEffect, AbilityTracker};
pub use boss::{Boss, BossKind, BossPart, BossPattern, PartKind};
pub use camera::{CameraRig, FollowCamera, StaticCamera};
pub use chakra::{CHAKRAS, Chakra, Color, chakra};
pub use clock::Clock;
pub use enemy::{Enemy, EnemyKind, EnemyState};
pub use events::{EventQueue, GameEvent};
pub use generator::LevelGenerator;
pub use geometry::{Aabb, Body, Facing};
pub use input::{Actions, TickInput};
pub use particles::{Burst, Particle, ParticlePool};
pub use player::{DamageOutcome, Player, ZodiacForm};
pub use rng::Prng;
pub use state::{GamePhase, GameState};
pub use terrain::{Platform, Shard, ShardKind};
pub use tick::tick;
