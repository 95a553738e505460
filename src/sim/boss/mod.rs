//! Boss encounters
//!
//! Every boss shares one [`BossCore`]: HP, the three-phase ladder, the
//! invulnerable transition window, gravity and platform landing. Behaviour
//! differs only through a [`BossPattern`], a closed set of variants that
//! implement [`BossBehavior`].
//!
//! Phases only ever go up. Crossing 66% or 33% HP bumps the phase at once and
//! opens a 60-tick window where the boss is frozen and cannot be hurt; the
//! attack pattern resumes when the window closes.

mod patterns;

pub use patterns::{
    BossPattern, CosmosPattern, GolemPattern, OraclePattern, PhoenixPattern, Projectile,
    RingWave, SeerPattern, SerpentPattern, SpecterPattern,
};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::CameraRig;
use super::chakra::{Color, chakra};
use super::geometry::{Aabb, Body, Facing};
use super::particles::{Burst, ParticlePool};
use super::rng::Prng;
use super::terrain::{Platform, surfaces};
use crate::consts::{
    BOSS_PHASE_2_THRESHOLD, BOSS_PHASE_3_THRESHOLD, BOSS_TRANSITION_TICKS, WORLD_COUNT,
};

/// Shake requested every few ticks while a phase transition plays out
const TRANSITION_SHAKE: f32 = 8.0;
const TRANSITION_SHAKE_EVERY: u32 = 10;
const HURT_FLASH_TICKS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    Serpent,
    Phoenix,
    Golem,
    Specter,
    Oracle,
    Seer,
    Cosmos,
}

/// Spawn-time stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossStats {
    pub size: Vec2,
    pub max_hp: f32,
    pub gravity: f32,
    pub contact_damage: f32,
    pub attack_cooldown: u32,
    pub score: u32,
}

impl BossKind {
    pub const ALL: [BossKind; WORLD_COUNT] = [
        BossKind::Serpent,
        BossKind::Phoenix,
        BossKind::Golem,
        BossKind::Specter,
        BossKind::Oracle,
        BossKind::Seer,
        BossKind::Cosmos,
    ];

    /// Boss guarding world `index` (wraps modulo 7)
    pub fn for_world(index: usize) -> Self {
        Self::ALL[index % WORLD_COUNT]
    }

    pub fn stats(self) -> BossStats {
        let base = BossStats {
            size: Vec2::new(80.0, 80.0),
            max_hp: 300.0,
            gravity: 0.0,
            contact_damage: 20.0,
            attack_cooldown: 90,
            score: 500,
        };
        match self {
            BossKind::Serpent => BossStats {
                size: Vec2::new(90.0, 60.0),
                gravity: 0.3,
                ..base
            },
            BossKind::Phoenix => BossStats {
                size: Vec2::new(70.0, 50.0),
                max_hp: 250.0,
                ..base
            },
            BossKind::Golem => BossStats {
                size: Vec2::new(100.0, 90.0),
                max_hp: 400.0,
                gravity: 0.3,
                contact_damage: 25.0,
                attack_cooldown: 120,
                ..base
            },
            BossKind::Specter => BossStats {
                size: Vec2::new(60.0, 70.0),
                max_hp: 280.0,
                gravity: 0.1,
                ..base
            },
            BossKind::Oracle => BossStats {
                size: Vec2::new(70.0, 70.0),
                max_hp: 320.0,
                ..base
            },
            BossKind::Seer => BossStats {
                size: Vec2::new(60.0, 60.0),
                max_hp: 350.0,
                ..base
            },
            BossKind::Cosmos => BossStats {
                size: Vec2::new(100.0, 100.0),
                max_hp: 500.0,
                ..base
            },
        }
    }
}

/// State shared by every boss variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossCore {
    pub kind: BossKind,
    /// World this boss guards
    pub world: usize,
    pub body: Body,
    pub hp: f32,
    pub max_hp: f32,
    pub contact_damage: f32,
    pub score: u32,
    /// 1, 2 or 3; never decreases
    pub phase: u8,
    pub transitioning: bool,
    pub transition_timer: u32,
    pub invulnerable: bool,
    pub defeated: bool,
    pub facing: Facing,
    pub gravity: f32,
    pub grounded: bool,
    pub attack_timer: u32,
    pub attack_cooldown: u32,
    pub hurt_flash: u32,
    /// Already struck by the current player swing
    pub hit_this_swing: bool,
}

impl BossCore {
    pub fn new(kind: BossKind, world: usize, pos: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            world,
            body: Body::new(pos, stats.size),
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            contact_damage: stats.contact_damage,
            score: stats.score,
            phase: 1,
            transitioning: false,
            transition_timer: 0,
            invulnerable: false,
            defeated: false,
            facing: Facing::Left,
            gravity: stats.gravity,
            grounded: false,
            attack_timer: 0,
            attack_cooldown: stats.attack_cooldown,
            hurt_flash: 0,
            hit_this_swing: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Aabb {
        self.body.rect()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Phase as a float for pattern scaling
    #[inline]
    pub fn phase_f(&self) -> f32 {
        self.phase as f32
    }

    /// Cooldown shortened by `per_phase` ticks for each phase
    pub fn phase_cooldown(&self, base: u32, per_phase: u32) -> u32 {
        base.saturating_sub(per_phase * self.phase as u32)
    }

    pub fn color(&self) -> Color {
        chakra(self.world).color
    }

    /// Can a hit land right now?
    pub fn is_vulnerable(&self) -> bool {
        !self.invulnerable && !self.transitioning && !self.defeated
    }

    pub fn take_damage(&mut self, amount: f32) -> BossHit {
        if !self.is_vulnerable() {
            return BossHit::default();
        }

        self.hp = (self.hp - amount).max(0.0);
        self.hurt_flash = HURT_FLASH_TICKS;

        // A killing blow that crosses a threshold still steps the phase first
        let ratio = self.hp / self.max_hp;
        let next = match self.phase {
            1 if ratio <= BOSS_PHASE_2_THRESHOLD => Some(2),
            2 if ratio <= BOSS_PHASE_3_THRESHOLD => Some(3),
            _ => None,
        };
        if let Some(phase) = next {
            self.begin_transition(phase);
        }

        let defeated = self.hp <= 0.0;
        if defeated {
            self.defeated = true;
        }

        BossHit {
            applied: true,
            phase_changed: next,
            defeated,
        }
    }

    fn begin_transition(&mut self, phase: u8) {
        self.phase = phase;
        self.transitioning = true;
        self.invulnerable = true;
        self.transition_timer = BOSS_TRANSITION_TICKS;
        self.body.vel = Vec2::ZERO;
        log::debug!("{:?} entering phase {}", self.kind, phase);
    }

    /// Contact check (ignored while the player is invincible)
    pub fn touches_player(&self, player: &Aabb, player_invincible: bool) -> bool {
        !self.defeated && !player_invincible && self.rect().overlaps(player)
    }

    /// Melee check against an open attack window
    pub fn struck_by(&self, hitbox: Option<Aabb>) -> bool {
        match hitbox {
            Some(hb) => self.is_vulnerable() && !self.hit_this_swing && self.rect().overlaps(&hb),
            None => false,
        }
    }
}

/// Result of a damage attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BossHit {
    /// False when the hit was swallowed (invulnerable, transitioning, defeated)
    pub applied: bool,
    /// New phase when this hit crossed a threshold
    pub phase_changed: Option<u8>,
    pub defeated: bool,
}

/// What a boss pattern may touch during its update
pub struct BossContext<'a> {
    pub player: Aabb,
    pub frame: u64,
    /// Slow-motion integration factor
    pub scale: f32,
    /// Bottom of the playfield
    pub floor: f32,
    pub rng: &'a mut Prng,
    pub camera: &'a mut dyn CameraRig,
    pub fx: &'a mut ParticlePool,
}

/// Extra shapes for the renderer (tail segments, hazards, decoys)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossPart {
    pub center: Vec2,
    pub radius: f32,
    pub kind: PartKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Segment,
    Shockwave,
    Decoy,
    Ring,
    Orb,
    Bullet,
}

/// Per-variant behaviour plugged into a [`BossCore`]
pub trait BossBehavior {
    /// Movement and attack decisions for one tick (skipped during transitions)
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        chase_and_charge(core, ctx);
    }

    /// Runs after integration and landing; `landed` is true when a surface caught the boss
    fn after_move(&mut self, _core: &mut BossCore, _landed: bool, _ctx: &mut BossContext<'_>) {}

    /// Damage dealt by the pattern's own hazards this tick, consuming whatever hit
    fn strike(&mut self, _core: &BossCore, _player: &Aabb) -> Option<f32> {
        None
    }

    /// Follow the world scroll
    fn shift(&mut self, _dx: f32) {}

    /// Render hook
    fn parts(&self, _core: &BossCore) -> Vec<BossPart> {
        Vec::new()
    }

    fn on_defeat(&mut self, core: &BossCore, fx: &mut ParticlePool) {
        fx.burst(Burst::Death, core.center(), core.color());
    }
}

/// Generic fallback: walk toward the player, then charge when close
pub fn chase_and_charge(core: &mut BossCore, ctx: &mut BossContext<'_>) {
    let p = core.phase_f();
    let delta = ctx.player.center() - core.center();
    let dist_sq = delta.length_squared();

    if dist_sq > 60.0 * 60.0 {
        core.body.vel.x = core.facing.sign() * (1.0 + 0.5 * p);
    } else {
        core.body.vel.x *= 0.8;
    }

    if dist_sq < 120.0 * 120.0 && core.attack_timer == 0 {
        core.body.vel.x = core.facing.sign() * (8.0 + 3.0 * p);
        core.body.vel.y = -5.0;
        ctx.camera.shake(4.0);
        core.attack_timer = core.attack_cooldown.saturating_sub(10 * core.phase as u32);
    }
}

/// A boss: shared core plus its behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub core: BossCore,
    pub pattern: BossPattern,
}

impl Boss {
    /// Spawn the boss guarding `world` with its top-left corner at `pos`
    pub fn spawn(world: usize, pos: Vec2) -> Self {
        let kind = BossKind::for_world(world);
        Self {
            core: BossCore::new(kind, world % WORLD_COUNT, pos),
            pattern: BossPattern::for_kind(kind),
        }
    }

    pub fn kind(&self) -> BossKind {
        self.core.kind
    }

    pub fn is_defeated(&self) -> bool {
        self.core.defeated
    }

    pub fn take_damage(&mut self, amount: f32) -> BossHit {
        self.core.take_damage(amount)
    }

    pub fn update(&mut self, platforms: &[Platform], ctx: &mut BossContext<'_>) {
        let core = &mut self.core;
        if core.defeated {
            return;
        }
        core.hurt_flash = core.hurt_flash.saturating_sub(1);

        if core.transitioning {
            core.transition_timer = core.transition_timer.saturating_sub(1);
            if core.transition_timer % TRANSITION_SHAKE_EVERY == 0 {
                ctx.camera.shake(TRANSITION_SHAKE);
            }
            if core.transition_timer == 0 {
                core.transitioning = false;
                core.invulnerable = false;
            }
            return;
        }

        core.attack_timer = core.attack_timer.saturating_sub(1);
        core.facing = Facing::toward(ctx.player.center().x - core.center().x);

        self.pattern.update_phase(core, ctx);

        core.body.vel.y += core.gravity * ctx.scale;
        core.body.integrate(ctx.scale);

        let mut landed = false;
        if core.gravity > 0.0 {
            landed = core.body.land(surfaces(platforms));
            if core.body.bottom() > ctx.floor {
                core.body.pos.y = ctx.floor - core.body.size.y;
                core.body.vel.y = 0.0;
                landed = true;
            }
        }
        core.grounded = landed;

        self.pattern.after_move(core, landed, ctx);
    }

    /// Contact damage owed to the player this tick
    pub fn contact_damage(&self, player: &Aabb, player_invincible: bool) -> Option<f32> {
        self.core
            .touches_player(player, player_invincible)
            .then_some(self.core.contact_damage)
    }

    /// Hazard damage owed to the player this tick (ignored while invincible)
    pub fn hazard_damage(&mut self, player: &Aabb, player_invincible: bool) -> Option<f32> {
        if self.core.defeated || player_invincible {
            return None;
        }
        self.pattern.strike(&self.core, player)
    }

    pub fn shift(&mut self, dx: f32) {
        self.core.body.shift_x(dx);
        self.pattern.shift(dx);
    }

    pub fn parts(&self) -> Vec<BossPart> {
        self.pattern.parts(&self.core)
    }

    pub fn on_defeat(&mut self, fx: &mut ParticlePool) {
        self.pattern.on_defeat(&self.core, fx);
    }
}
