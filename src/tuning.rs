//! Data-driven game balance
//!
//! `Tuning` is the immutable base configuration. A run never mutates it:
//! run-start stat overrides are folded in once with [`Tuning::with_overrides`]
//! and the resulting snapshot is passed by reference to every system.
//! `RunModifiers` are the sparse level-generation coefficients supplied by
//! the run-configuration collaborator.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::scale_ticks;
use crate::sim::player::ZodiacForm;

/// Physics profile for one zodiac form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormStats {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Max horizontal speed
    pub speed: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_force: f32,
    pub max_jumps: u32,
    pub dash_speed: f32,
}

/// Both player forms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormTable {
    /// Fire form: heavy, fast, single jump
    pub aires: FormStats,
    /// Water form: floaty, slower, double jump
    pub koidon: FormStats,
}

impl Default for FormTable {
    fn default() -> Self {
        Self {
            aires: FormStats {
                gravity: 0.8,
                speed: 8.0,
                jump_force: -16.0,
                max_jumps: 1,
                dash_speed: 25.0,
            },
            koidon: FormStats {
                gravity: 0.35,
                speed: 5.0,
                jump_force: -12.0,
                max_jumps: 2,
                dash_speed: 15.0,
            },
        }
    }
}

impl FormTable {
    pub fn get(&self, form: ZodiacForm) -> &FormStats {
        match form {
            ZodiacForm::Aires => &self.aires,
            ZodiacForm::Koidon => &self.koidon,
        }
    }

    fn each_mut(&mut self) -> [&mut FormStats; 2] {
        [&mut self.aires, &mut self.koidon]
    }
}

/// Player controller tunables (timers are in ticks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub start_x: f32,
    pub acceleration: f32,
    /// Horizontal velocity multiplier when no direction is held
    pub deceleration: f32,
    pub dash_cost: f32,
    pub dash_duration: u32,
    pub dash_cooldown: u32,
    pub energy_max: f32,
    pub energy_regen: f32,
    pub max_hp: f32,
    pub invincibility_ticks: u32,
    pub knockback_force: f32,
    /// Upward speed of the knockback kick
    pub knockback_lift: f32,
    pub knockback_lock_ticks: u32,
    pub attack_width: f32,
    pub attack_height: f32,
    pub attack_duration: u32,
    pub attack_damage: f32,
    pub attack_cooldown: u32,
    /// Multiplier applied to upward velocity when jump is released early
    pub jump_cut: f32,
    /// Shield ticks consumed per absorbed hit
    pub shield_hit_cost: u32,
    pub health_shard_heal: f32,
    pub energy_shard_reward: f32,
    pub shard_score: u32,
    pub combo_window: u32,
    pub max_combo_multiplier: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 50.0,
            start_x: 100.0,
            acceleration: 1.0,
            deceleration: 0.8,
            dash_cost: 20.0,
            dash_duration: 15,
            dash_cooldown: 30,
            energy_max: 100.0,
            energy_regen: 0.1,
            max_hp: 100.0,
            invincibility_ticks: 60,
            knockback_force: 8.0,
            knockback_lift: 6.0,
            knockback_lock_ticks: 10,
            attack_width: 45.0,
            attack_height: 40.0,
            attack_duration: 8,
            attack_damage: 25.0,
            attack_cooldown: 20,
            jump_cut: 0.4,
            shield_hit_cost: 30,
            health_shard_heal: 20.0,
            energy_shard_reward: 10.0,
            shard_score: 10,
            combo_window: 120,
            max_combo_multiplier: 10,
        }
    }
}

/// Level generation and world-streaming tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    pub min_gap: f32,
    pub max_gap: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub height: f32,
    /// Highest allowed platform top
    pub min_y: f32,
    /// Lowest allowed platform top, measured up from the screen bottom
    pub floor_margin: f32,
    /// Vertical jitter for streamed platforms (+/-)
    pub y_jitter: f32,
    /// Platforms whose right edge passes this x are trimmed
    pub platform_cutoff: f32,
    /// Shards and enemies left of this x are compacted away
    pub entity_cutoff: f32,
    /// Platforms per room
    pub room_length: u32,
    /// Gap before the first platform of a non-arena segment
    pub segment_lead_gap: f32,
    pub segment_min_len: u32,
    pub segment_max_len: u32,
    /// Narrower platforms never host enemies
    pub enemy_min_width: f32,
    pub enemy_chance_segment: f32,
    pub enemy_chance_stream: f32,
    /// Streamed platforms in the boss room before the boss appears
    pub boss_after_platforms: u32,
    /// Streamed platforms per room advance
    pub room_advance_every: u32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            min_gap: 60.0,
            max_gap: 140.0,
            min_width: 120.0,
            max_width: 220.0,
            height: 20.0,
            min_y: 180.0,
            floor_margin: 120.0,
            y_jitter: 80.0,
            platform_cutoff: -200.0,
            entity_cutoff: -300.0,
            room_length: 25,
            segment_lead_gap: 80.0,
            segment_min_len: 4,
            segment_max_len: 8,
            enemy_min_width: 100.0,
            enemy_chance_segment: 0.25,
            enemy_chance_stream: 0.2,
            boss_after_platforms: 15,
            room_advance_every: 30,
        }
    }
}

/// Collectible tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardTuning {
    pub size: f32,
    pub spawn_chance: f32,
    pub token_chance: f32,
    /// Checked only when the token roll fails
    pub health_chance: f32,
    /// Chance a killed enemy drops a shard
    pub drop_chance: f32,
    /// Share of drops that are energy (the rest are health)
    pub drop_energy_chance: f32,
    pub bob_amplitude: f32,
    pub bob_speed: f32,
}

impl Default for ShardTuning {
    fn default() -> Self {
        Self {
            size: 15.0,
            spawn_chance: 0.75,
            token_chance: 0.1,
            health_chance: 0.15,
            drop_chance: 0.4,
            drop_energy_chance: 0.7,
            bob_amplitude: 6.0,
            bob_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Fraction of the screen width the player is kept at
    pub follow_threshold: f32,
    pub lerp: f32,
    pub shake_decay: f32,
    pub shake_max: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            follow_threshold: 0.4,
            lerp: 0.08,
            shake_decay: 0.9,
            shake_max: 20.0,
        }
    }
}

/// A named particle burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitPreset {
    pub count: u32,
    pub speed: f32,
    pub life: u32,
}

impl EmitPreset {
    pub const fn new(count: u32, speed: f32, life: u32) -> Self {
        Self { count, speed, life }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlePresets {
    pub jump: EmitPreset,
    pub dash: EmitPreset,
    pub switch_form: EmitPreset,
    pub collect: EmitPreset,
    pub hit: EmitPreset,
    pub explosion: EmitPreset,
    pub death: EmitPreset,
}

impl Default for ParticlePresets {
    fn default() -> Self {
        Self {
            jump: EmitPreset::new(10, 5.0, 20),
            dash: EmitPreset::new(1, 2.0, 10),
            switch_form: EmitPreset::new(20, 10.0, 30),
            collect: EmitPreset::new(10, 5.0, 20),
            hit: EmitPreset::new(15, 8.0, 15),
            explosion: EmitPreset::new(30, 12.0, 25),
            death: EmitPreset::new(40, 15.0, 40),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub pool_size: usize,
    pub size_decay: f32,
    /// Particles shrinking below this size despawn
    pub min_size: f32,
    pub presets: ParticlePresets,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            pool_size: PARTICLE_POOL_SIZE,
            size_decay: 0.95,
            min_size: 0.1,
            presets: ParticlePresets::default(),
        }
    }
}

/// Global scaling of chakra power costs and cooldowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    pub cost_mult: f32,
    pub cooldown_mult: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            cost_mult: 1.0,
            cooldown_mult: 1.0,
        }
    }
}

/// Star-token rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub gain_mult: f32,
    pub kill_tokens: u32,
    pub shard_tokens: u32,
    pub boss_tokens: u32,
    pub continue_base_cost: u32,
    pub continue_cost_step: u32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            gain_mult: 1.0,
            kill_tokens: 1,
            shard_tokens: 1,
            boss_tokens: 10,
            continue_base_cost: 5,
            continue_cost_step: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenTuning {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

/// Complete tunable configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen: ScreenTuning,
    pub forms: FormTable,
    pub player: PlayerTuning,
    pub platform: PlatformTuning,
    pub shard: ShardTuning,
    pub camera: CameraTuning,
    pub particles: ParticleTuning,
    pub abilities: AbilityTuning,
    pub economy: EconomyTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    ///
    /// The document is merged key by key into the serialized defaults, so a
    /// single field inside a nested record (one form, one burst preset) can be
    /// overridden without restating its siblings.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut merged = serde_json::to_value(Tuning::default())?;
        merge_json(&mut merged, serde_json::from_str(json)?);
        let tuning: Tuning = serde_json::from_value(merged)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let checks: [(&str, bool, &str); 14] = [
            ("screen", self.screen.width > 0.0 && self.screen.height > 0.0, "dimensions must be positive"),
            ("forms.aires.jump_force", self.forms.aires.jump_force < 0.0, "must be negative (up)"),
            ("forms.koidon.jump_force", self.forms.koidon.jump_force < 0.0, "must be negative (up)"),
            ("forms.max_jumps", self.forms.aires.max_jumps > 0 && self.forms.koidon.max_jumps > 0, "every form needs at least one jump"),
            ("player.size", self.player.width > 0.0 && self.player.height > 0.0, "must be positive"),
            ("player.max_hp", self.player.max_hp > 0.0, "must be positive"),
            ("player.energy_max", self.player.energy_max > 0.0, "must be positive"),
            ("player.jump_cut", (0.0..=1.0).contains(&self.player.jump_cut), "must be within 0..=1"),
            ("platform.gap", self.platform.min_gap <= self.platform.max_gap, "min_gap exceeds max_gap"),
            ("platform.width", self.platform.min_width > 0.0 && self.platform.min_width <= self.platform.max_width, "min_width must be positive and not exceed max_width"),
            ("platform.segment_len", self.platform.segment_min_len > 0 && self.platform.segment_min_len <= self.platform.segment_max_len, "segment lengths must be positive and ordered"),
            ("platform.band", self.platform.min_y <= self.screen.height - self.platform.floor_margin, "min_y lies below the floor band"),
            ("camera.lerp", self.camera.lerp > 0.0 && self.camera.lerp <= 1.0, "must be within (0, 1]"),
            ("particles.pool_size", self.particles.pool_size > 0, "pool must hold at least one particle"),
        ];

        for (field, ok, reason) in checks {
            if !ok {
                log::warn!("Rejected tuning: {} {}", field, reason);
                return Err(ConfigError::invalid(field, reason));
            }
        }
        Ok(())
    }

    /// Fold run-start stat overrides into a new effective snapshot
    pub fn with_overrides(&self, overrides: &StatOverrides) -> Tuning {
        let mut t = self.clone();
        let p = &mut t.player;

        if let Some(max_hp) = overrides.max_hp {
            p.max_hp = max_hp.max(1.0);
        }
        if let Some(regen) = overrides.energy_regen {
            p.energy_regen = regen.max(0.0);
        }
        if let Some(mult) = overrides.dash_cooldown_mult {
            p.dash_cooldown = scale_ticks(p.dash_cooldown, mult);
        }
        if let Some(mult) = overrides.attack_damage_mult {
            p.attack_damage *= mult;
        }
        if let Some(mult) = overrides.attack_cooldown_mult {
            p.attack_cooldown = scale_ticks(p.attack_cooldown, mult);
        }
        if let Some(mult) = overrides.invincibility_mult {
            p.invincibility_ticks = scale_ticks(p.invincibility_ticks, mult);
        }
        if let Some(mult) = overrides.combo_window_mult {
            p.combo_window = scale_ticks(p.combo_window, mult).max(1);
        }
        if let Some(mult) = overrides.health_pickup_mult {
            p.health_shard_heal *= mult;
        }

        for form in t.forms.each_mut() {
            if let Some(mult) = overrides.speed_mult {
                form.speed *= mult;
            }
            if let Some(floor) = overrides.min_max_jumps {
                form.max_jumps = form.max_jumps.max(floor);
            }
        }

        if let Some(mult) = overrides.power_cost_mult {
            t.abilities.cost_mult *= mult;
        }
        if let Some(mult) = overrides.power_cooldown_mult {
            t.abilities.cooldown_mult *= mult;
        }
        if let Some(mult) = overrides.token_gain_mult {
            t.economy.gain_mult *= mult;
        }
        t
    }
}

/// Explicitly typed player stat delta applied once at run start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatOverrides {
    /// Replaces the base max HP
    pub max_hp: Option<f32>,
    /// Multiplies both forms' max speed
    pub speed_mult: Option<f32>,
    /// Replaces the base energy regen per tick
    pub energy_regen: Option<f32>,
    pub dash_cooldown_mult: Option<f32>,
    pub attack_damage_mult: Option<f32>,
    pub attack_cooldown_mult: Option<f32>,
    pub invincibility_mult: Option<f32>,
    /// Raises every form's jump budget to at least this many
    pub min_max_jumps: Option<u32>,
    pub power_cost_mult: Option<f32>,
    pub power_cooldown_mult: Option<f32>,
    pub combo_window_mult: Option<f32>,
    pub health_pickup_mult: Option<f32>,
    pub token_gain_mult: Option<f32>,
}

/// Sparse level-generation coefficients; absent keys are neutral
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunModifiers {
    pub platform_width_bonus: Option<f32>,
    pub enemy_density: Option<f32>,
    pub shard_spawn_rate: Option<f32>,
    pub height_variance: Option<f32>,
    pub health_drop_rate: Option<f32>,
    pub token_drop_mult: Option<f32>,
    pub enemy_hp_mult: Option<f32>,
    pub enemy_speed_mult: Option<f32>,
    pub start_shield: Option<bool>,
}

impl RunModifiers {
    pub fn platform_width_bonus(&self) -> f32 {
        self.platform_width_bonus.unwrap_or(1.0)
    }

    pub fn enemy_density(&self) -> f32 {
        self.enemy_density.unwrap_or(1.0)
    }

    pub fn shard_spawn_rate(&self) -> f32 {
        self.shard_spawn_rate.unwrap_or(1.0)
    }

    pub fn height_variance(&self) -> f32 {
        self.height_variance.unwrap_or(1.0)
    }

    pub fn health_drop_rate(&self) -> f32 {
        self.health_drop_rate.unwrap_or(1.0)
    }

    pub fn token_drop_mult(&self) -> f32 {
        self.token_drop_mult.unwrap_or(1.0)
    }

    pub fn enemy_hp_mult(&self) -> f32 {
        self.enemy_hp_mult.unwrap_or(1.0)
    }

    pub fn enemy_speed_mult(&self) -> f32 {
        self.enemy_speed_mult.unwrap_or(1.0)
    }

    pub fn start_shield(&self) -> bool {
        self.start_shield.unwrap_or(false)
    }
}

/// Overlay `patch` onto `base`; objects merge recursively, anything else replaces
fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                merge_json(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Everything the run-configuration collaborator hands over at run start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed: u64,
    pub modifiers: RunModifiers,
    pub overrides: StatOverrides,
    /// Chakra the run opens in, 0..7
    pub start_world: usize,
    /// Room within `start_world`, clamped to its boss room
    pub start_room: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            modifiers: RunModifiers::default(),
            overrides: StatOverrides::default(),
            start_world: 0,
            start_room: 0,
        }
    }
}

impl RunConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Multipliers must be finite and non-negative; the start world must exist
    pub fn validate(&self) -> Result<()> {
        if self.start_world >= WORLD_COUNT {
            log::warn!("Rejected run config: start_world = {}", self.start_world);
            return Err(ConfigError::invalid("start_world", format!("must be below {WORLD_COUNT}")));
        }
        let m = &self.modifiers;
        let o = &self.overrides;
        let mults = [
            ("modifiers.platform_width_bonus", m.platform_width_bonus),
            ("modifiers.enemy_density", m.enemy_density),
            ("modifiers.shard_spawn_rate", m.shard_spawn_rate),
            ("modifiers.height_variance", m.height_variance),
            ("modifiers.health_drop_rate", m.health_drop_rate),
            ("modifiers.token_drop_mult", m.token_drop_mult),
            ("modifiers.enemy_hp_mult", m.enemy_hp_mult),
            ("modifiers.enemy_speed_mult", m.enemy_speed_mult),
            ("overrides.max_hp", o.max_hp),
            ("overrides.speed_mult", o.speed_mult),
            ("overrides.energy_regen", o.energy_regen),
            ("overrides.power_cost_mult", o.power_cost_mult),
            ("overrides.power_cooldown_mult", o.power_cooldown_mult),
            ("overrides.token_gain_mult", o.token_gain_mult),
        ];
        for (field, value) in mults {
            if let Some(v) = value.filter(|v| !v.is_finite() || *v < 0.0) {
                log::warn!("Rejected run config: {} = {}", field, v);
                return Err(ConfigError::invalid(field, "must be finite and non-negative"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "player": { "max_hp": 150.0 } }"#).unwrap();
        assert_eq!(t.player.max_hp, 150.0);
        assert_eq!(t.player.dash_cost, 20.0);
        assert_eq!(t.forms.aires.jump_force, -16.0);
    }

    #[test]
    fn test_single_form_field_overrides_over_defaults() {
        let t = Tuning::from_json(r#"{"forms":{"aires":{"speed":9.0}}}"#).unwrap();
        assert_eq!(t.forms.aires.speed, 9.0);
        assert_eq!(t.forms.aires.gravity, 0.8);
        assert_eq!(t.forms.aires.jump_force, -16.0);
        assert_eq!(t.forms.koidon, FormTable::default().koidon);
    }

    #[test]
    fn test_single_preset_field_overrides_over_defaults() {
        let t = Tuning::from_json(r#"{"particles":{"presets":{"death":{"count":80}}}}"#).unwrap();
        assert_eq!(t.particles.presets.death, EmitPreset::new(80, 15.0, 40));
        assert_eq!(t.particles.presets.hit, EmitPreset::new(15, 8.0, 15));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let err = Tuning::from_json(r#"{ "platform": { "min_gap": 200.0, "max_gap": 100.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "platform.gap"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides_produce_new_snapshot() {
        let base = Tuning::default();
        let overrides = StatOverrides {
            speed_mult: Some(1.1),
            dash_cooldown_mult: Some(0.8),
            min_max_jumps: Some(2),
            power_cost_mult: Some(0.85),
            ..Default::default()
        };
        let effective = base.with_overrides(&overrides);

        assert!((effective.forms.aires.speed - 8.8).abs() < 1e-4);
        assert_eq!(effective.player.dash_cooldown, 24);
        assert_eq!(effective.forms.aires.max_jumps, 2);
        assert_eq!(effective.forms.koidon.max_jumps, 2);
        assert!((effective.abilities.cost_mult - 0.85).abs() < 1e-6);
        // Base is untouched
        assert_eq!(base.forms.aires.speed, 8.0);
        assert_eq!(base.player.dash_cooldown, 30);
    }

    #[test]
    fn test_modifiers_neutral_when_absent() {
        let m = RunModifiers::default();
        assert_eq!(m.platform_width_bonus(), 1.0);
        assert_eq!(m.enemy_density(), 1.0);
        assert_eq!(m.shard_spawn_rate(), 1.0);
        assert!(!m.start_shield());
    }

    #[test]
    fn test_run_config_rejects_negative_multiplier() {
        let err = RunConfig::from_json(r#"{ "seed": 7, "modifiers": { "enemy_density": -1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let ok = RunConfig::from_json(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(ok.seed, 7);
        assert_eq!((ok.start_world, ok.start_room), (0, 0));
    }

    #[test]
    fn test_run_config_start_location() {
        let config = RunConfig::from_json(r#"{ "start_world": 3, "start_room": 4 }"#).unwrap();
        assert_eq!((config.start_world, config.start_room), (3, 4));
        let err = RunConfig::from_json(r#"{ "start_world": 7 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
