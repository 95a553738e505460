//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.
//! The tuning snapshot is fixed when the run starts and never mutated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::abilities::AbilityTracker;
use super::boss::Boss;
use super::clock::Clock;
use super::enemy::Enemy;
use super::events::EventQueue;
use super::generator::LevelGenerator;
use super::particles::ParticlePool;
use super::player::Player;
use super::rng::{Prng, streams};
use super::terrain::{Platform, Shard};
use crate::economy::TokenEconomy;
use crate::tuning::{RunConfig, RunModifiers, Tuning};

/// Radiant shield granted at run start by the `start_shield` modifier
pub const START_SHIELD_TICKS: u32 = 180;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player died; final score is available
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Effective tuning for this run (base + stat overrides)
    pub tuning: Tuning,
    pub modifiers: RunModifiers,
    pub phase: GamePhase,
    pub player: Player,
    /// Ordered left to right
    pub platforms: Vec<Platform>,
    pub shards: Vec<Shard>,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub generator: LevelGenerator,
    /// Visual only, never feeds back into gameplay
    pub particles: ParticlePool,
    pub abilities: AbilityTracker,
    pub economy: TokenEconomy,
    pub clock: Clock,
    /// Events raised during the last tick
    #[serde(skip)]
    pub events: EventQueue,
    /// Platforms streamed since the last room change
    pub platforms_generated: u32,
    /// Kill drops
    pub drop_rng: Prng,
    /// Boss behaviour (teleport sides)
    pub boss_rng: Prng,
    /// Set once on death for the persistence layer
    pub final_score: Option<u64>,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::from_config(&RunConfig::with_seed(seed), &Tuning::default())
    }

    /// Start a run from the run-configuration payload over a base tuning
    pub fn from_config(config: &RunConfig, base: &Tuning) -> Self {
        let seed = config.seed;
        let tuning = base.with_overrides(&config.overrides);
        let modifiers = config.modifiers.clone();

        let mut player = Player::new(&tuning);
        if modifiers.start_shield() {
            player.shield_timer = START_SHIELD_TICKS;
        }

        let mut generator = LevelGenerator::new(seed, &tuning, &modifiers);
        generator.start_at(config.start_world, config.start_room);
        let room = generator.generate_room();

        let state = Self {
            seed,
            particles: ParticlePool::new(&tuning.particles, Prng::stream(seed, streams::PARTICLES)),
            economy: TokenEconomy::new(&tuning.economy),
            tuning,
            modifiers,
            phase: GamePhase::Playing,
            player,
            platforms: room.platforms,
            shards: room.shards,
            enemies: room.enemies,
            boss: None,
            generator,
            abilities: AbilityTracker::new(),
            clock: Clock::new(),
            events: EventQueue::new(),
            platforms_generated: 0,
            drop_rng: Prng::stream(seed, streams::DROPS),
            boss_rng: Prng::stream(seed, streams::BOSS),
            final_score: None,
        };

        log::info!(
            "Run started: seed {} in {} ({} platforms)",
            seed,
            state.generator.location_label(),
            state.platforms.len()
        );
        state
    }

    pub fn is_boss_room(&self) -> bool {
        self.generator.is_boss_room()
    }

    pub fn location_label(&self) -> String {
        self.generator.location_label()
    }

    /// Spend tokens to revive after death. Returns false if not dead or unaffordable.
    pub fn continue_run(&mut self) -> bool {
        if self.phase != GamePhase::GameOver || !self.economy.use_continue() {
            return false;
        }
        let t = &self.tuning;
        self.player.hp = self.player.max_hp;
        self.player.energy = self.player.max_energy;
        self.player.body.pos = Vec2::new(t.player.start_x, t.screen.height - 150.0);
        self.player.body.vel = Vec2::ZERO;
        self.player.invincible = t.player.invincibility_ticks * 2;
        self.player.knockback_timer = 0;
        self.phase = GamePhase::Playing;
        self.final_score = None;
        log::info!(
            "Continue #{} used ({} tokens left)",
            self.economy.continues_used,
            self.economy.tokens
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_opening_room() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.platforms.len(), state.tuning.platform.room_length as usize);
        assert!(state.boss.is_none());
        assert_eq!(state.location_label(), "MULADHARA 1/4");
    }

    #[test]
    fn test_start_location_from_config() {
        let config = RunConfig {
            start_world: 2,
            start_room: 99,
            ..RunConfig::with_seed(5)
        };
        let state = GameState::from_config(&config, &Tuning::default());
        assert_eq!(state.generator.world, 2);
        assert!(state.is_boss_room());
        assert_eq!(state.location_label(), "MANIPURA 4/4");
        // Boss rooms open on a bare arena
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_overrides_flow_into_effective_tuning() {
        let mut config = RunConfig::with_seed(3);
        config.overrides.max_hp = Some(150.0);
        config.modifiers.start_shield = Some(true);
        let state = GameState::from_config(&config, &Tuning::default());
        assert_eq!(state.player.max_hp, 150.0);
        assert_eq!(state.player.shield_timer, START_SHIELD_TICKS);
    }

    #[test]
    fn test_continue_requires_game_over_and_tokens() {
        let mut state = GameState::new(1);
        assert!(!state.continue_run());

        state.phase = GamePhase::GameOver;
        state.player.hp = 0.0;
        assert!(!state.continue_run());

        state.economy.add_tokens(5);
        assert!(state.continue_run());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert_eq!(state.economy.tokens, 0);
        assert_eq!(state.economy.continue_cost(), 8);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(7);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.platforms, state.platforms);
        assert_eq!(back.generator.location_label(), state.generator.location_label());
    }
}
