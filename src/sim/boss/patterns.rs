//! Per-variant attack patterns

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{BossBehavior, BossContext, BossCore, BossKind, BossPart, PartKind};
use crate::lerp;
use crate::sim::geometry::{Aabb, circle_hits_aabb, ring_hits_aabb};
use crate::sim::particles::{Burst, ParticlePool};

const SERPENT_SEGMENTS: usize = 5;
const SERPENT_SEGMENT_SPACING: f32 = 20.0;
const SHOCKWAVE_DAMAGE: f32 = 15.0;
const SHOCKWAVE_LIFE: u32 = 60;
const SHOCKWAVE_SIZE: Vec2 = Vec2::new(30.0, 20.0);
const DECOY_DAMAGE: f32 = 10.0;
/// Decoy trails the real position by this many ticks
const DECOY_DELAY: usize = 15;
const RING_DAMAGE: f32 = 12.0;
const RING_MAX_RADIUS: f32 = 300.0;
const RING_BAND: f32 = 10.0;
const ORB_DAMAGE: f32 = 10.0;
const ORB_RADIUS: f32 = 8.0;
const BULLET_DAMAGE: f32 = 8.0;
const BULLET_RADIUS: f32 = 4.0;
const BULLET_LIFE: u32 = 90;

/// Moving hazard with a lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
}

impl Projectile {
    fn step(&mut self, scale: f32) {
        self.pos += self.vel * scale;
        self.life = self.life.saturating_sub(1);
    }
}

/// Expanding damage ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingWave {
    pub center: Vec2,
    pub radius: f32,
    /// Already dealt its damage
    pub hit: bool,
}

/// Ground charge plus a leap-slam; a tail of segments trails the head
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerpentPattern {
    pub segments: Vec<Vec2>,
    pub leaping: bool,
}

impl BossBehavior for SerpentPattern {
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        let p = core.phase_f();
        let dx = ctx.player.center().x - core.center().x;
        core.body.vel.x = core.facing.sign() * (1.5 + p);

        if dx.abs() < 200.0 && core.attack_timer == 0 && core.grounded {
            core.body.vel.y = -12.0;
            self.leaping = true;
            core.attack_timer = core.phase_cooldown(100, 15);
        }
    }

    fn after_move(&mut self, core: &mut BossCore, landed: bool, ctx: &mut BossContext<'_>) {
        if self.leaping && landed {
            self.leaping = false;
            ctx.camera.shake(10.0);
            let feet = Vec2::new(core.center().x, core.body.bottom());
            ctx.fx.burst(Burst::Hit, feet, core.color());
        }

        if self.segments.is_empty() {
            self.segments = vec![core.center(); SERPENT_SEGMENTS];
        }
        let mut lead = core.center() - Vec2::new(core.facing.sign() * SERPENT_SEGMENT_SPACING, 0.0);
        for seg in self.segments.iter_mut() {
            seg.x = lerp(seg.x, lead.x, 0.3);
            seg.y = lerp(seg.y, lead.y, 0.3);
            lead = *seg - Vec2::new(core.facing.sign() * SERPENT_SEGMENT_SPACING, 0.0);
        }
    }

    fn shift(&mut self, dx: f32) {
        for seg in self.segments.iter_mut() {
            seg.x -= dx;
        }
    }

    fn parts(&self, _core: &BossCore) -> Vec<BossPart> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, &center)| BossPart {
                center,
                radius: 20.0 - i as f32 * 2.5,
                kind: PartKind::Segment,
            })
            .collect()
    }
}

/// Hover above the player, then swoop down
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhoenixPattern {
    pub swooping: bool,
}

impl BossBehavior for PhoenixPattern {
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        let p = core.phase_f();
        let dir = core.facing.sign();
        let dx = ctx.player.center().x - core.center().x;

        if self.swooping {
            core.body.vel = Vec2::new(dir * (4.0 + p), 3.0 + p);
            if core.body.pos.y > ctx.player.top() + 50.0 || dx.abs() < 20.0 {
                self.swooping = false;
                core.body.vel.y = -6.0;
            }
            return;
        }

        let hover_y = ctx.player.top() - 120.0;
        core.body.vel.x = (core.body.vel.x + dir * 0.1) * 0.95;
        core.body.vel.y = (hover_y - core.body.pos.y) * 0.05;

        if core.attack_timer == 0 {
            self.swooping = true;
            core.attack_timer = core.phase_cooldown(80, 10);
        }
    }
}

fn shockwave_rect(wave: &Projectile) -> Aabb {
    Aabb::new(wave.pos - Vec2::new(SHOCKWAVE_SIZE.x * 0.5, 0.0), SHOCKWAVE_SIZE)
}

/// Heavy walk with a stomp that sends shockwaves along the ground
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GolemPattern {
    pub stomping: bool,
    pub shockwaves: Vec<Projectile>,
}

impl BossBehavior for GolemPattern {
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        let p = core.phase_f();
        let dx = ctx.player.center().x - core.center().x;
        core.body.vel.x = core.facing.sign() * (0.8 + 0.3 * p);

        if dx.abs() < 150.0 && core.attack_timer == 0 && core.grounded {
            core.body.vel.y = -8.0;
            self.stomping = true;
            core.attack_timer = core.phase_cooldown(120, 20);
        }
    }

    fn after_move(&mut self, core: &mut BossCore, landed: bool, ctx: &mut BossContext<'_>) {
        for wave in self.shockwaves.iter_mut() {
            wave.step(ctx.scale);
        }
        self.shockwaves.retain(|w| w.life > 0);

        if self.stomping && landed {
            self.stomping = false;
            ctx.camera.shake(12.0);
            let speed = 5.0 + core.phase_f();
            let origin = Vec2::new(core.center().x, core.body.bottom() - SHOCKWAVE_SIZE.y);
            for dir in [-1.0, 1.0] {
                self.shockwaves.push(Projectile {
                    pos: origin,
                    vel: Vec2::new(dir * speed, 0.0),
                    life: SHOCKWAVE_LIFE,
                });
            }
            ctx.fx.burst(Burst::Explosion, origin, core.color());
        }
    }

    fn strike(&mut self, _core: &BossCore, player: &Aabb) -> Option<f32> {
        let idx = self
            .shockwaves
            .iter()
            .position(|w| shockwave_rect(w).overlaps(player))?;
        self.shockwaves.swap_remove(idx);
        Some(SHOCKWAVE_DAMAGE)
    }

    fn shift(&mut self, dx: f32) {
        for w in self.shockwaves.iter_mut() {
            w.pos.x -= dx;
        }
    }

    fn parts(&self, _core: &BossCore) -> Vec<BossPart> {
        self.shockwaves
            .iter()
            .map(|w| BossPart {
                center: w.pos + Vec2::new(0.0, SHOCKWAVE_SIZE.y * 0.5),
                radius: SHOCKWAVE_SIZE.x * 0.5,
                kind: PartKind::Shockwave,
            })
            .collect()
    }
}

/// Teleports to the player's flank; from phase 2 a delayed mirrored decoy joins in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecterPattern {
    pub history: VecDeque<Vec2>,
    /// Top-left of the decoy, when one is showing
    pub decoy: Option<Vec2>,
}

impl BossBehavior for SpecterPattern {
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        let p = core.phase_f();
        core.body.vel.x = core.facing.sign() * (1.0 + 0.5 * p);
        core.body.vel.y *= 0.9;

        if core.attack_timer == 0 {
            let side = if ctx.rng.chance(0.5) { -1.0 } else { 1.0 };
            let target = Vec2::new(
                ctx.player.center().x + side * 150.0 - core.body.size.x * 0.5,
                ctx.player.top() - 50.0,
            );
            ctx.fx.burst(Burst::SwitchForm, core.center(), core.color());
            core.body.pos = target;
            core.body.vel = Vec2::ZERO;
            core.attack_timer = core.phase_cooldown(90, 15);
        }
    }

    fn after_move(&mut self, core: &mut BossCore, _landed: bool, ctx: &mut BossContext<'_>) {
        self.history.push_back(core.body.pos);
        while self.history.len() > DECOY_DELAY {
            self.history.pop_front();
        }

        self.decoy = match self.history.front() {
            Some(old) if core.phase >= 2 && self.history.len() == DECOY_DELAY => {
                let mirror_x = ctx.player.center().x * 2.0 - old.x - core.body.size.x;
                Some(Vec2::new(mirror_x, old.y))
            }
            _ => None,
        };
    }

    fn strike(&mut self, core: &BossCore, player: &Aabb) -> Option<f32> {
        let decoy = self.decoy?;
        Aabb::new(decoy, core.body.size)
            .overlaps(player)
            .then_some(DECOY_DAMAGE)
    }

    fn shift(&mut self, dx: f32) {
        for pos in self.history.iter_mut() {
            pos.x -= dx;
        }
        if let Some(decoy) = self.decoy.as_mut() {
            decoy.x -= dx;
        }
    }

    fn parts(&self, core: &BossCore) -> Vec<BossPart> {
        self.decoy
            .map(|pos| BossPart {
                center: pos + core.body.size * 0.5,
                radius: core.body.size.x * 0.5,
                kind: PartKind::Decoy,
            })
            .into_iter()
            .collect()
    }
}

/// Bobbing hover that releases expanding rings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OraclePattern {
    pub waves: Vec<RingWave>,
}

impl BossBehavior for OraclePattern {
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        let p = core.phase_f();
        core.body.pos.y += (ctx.frame as f32 * 0.03).sin() * 0.5 * ctx.scale;
        core.body.vel = Vec2::new(core.facing.sign() * 0.5, 0.0);

        if core.attack_timer == 0 {
            self.waves.push(RingWave {
                center: core.center(),
                radius: 0.0,
                hit: false,
            });
            core.attack_timer = core.phase_cooldown(100, 15);
        }

        let growth = (3.0 + p) * ctx.scale;
        for wave in self.waves.iter_mut() {
            wave.radius += growth;
        }
        self.waves.retain(|w| w.radius < RING_MAX_RADIUS);
    }

    fn strike(&mut self, _core: &BossCore, player: &Aabb) -> Option<f32> {
        let wave = self
            .waves
            .iter_mut()
            .find(|w| !w.hit && ring_hits_aabb(w.center, w.radius, RING_BAND, player))?;
        wave.hit = true;
        Some(RING_DAMAGE)
    }

    fn shift(&mut self, dx: f32) {
        for w in self.waves.iter_mut() {
            w.center.x -= dx;
        }
    }

    fn parts(&self, _core: &BossCore) -> Vec<BossPart> {
        self.waves
            .iter()
            .map(|w| BossPart {
                center: w.center,
                radius: w.radius,
                kind: PartKind::Ring,
            })
            .collect()
    }
}

/// Orbits the player and spawns homing orbs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeerPattern {
    pub orbs: Vec<Projectile>,
}

impl BossBehavior for SeerPattern {
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        let t = ctx.frame as f32;
        let player = ctx.player.center();
        let orbit = Vec2::new(
            player.x + (t * 0.02).cos() * 200.0,
            ctx.player.top() - 100.0 + (t * 0.03).sin() * 50.0,
        );
        core.body.pos = orbit - core.body.size * 0.5;
        core.body.vel = Vec2::ZERO;

        if core.attack_timer == 0 {
            self.orbs.push(Projectile {
                pos: core.center(),
                vel: Vec2::ZERO,
                life: 120 + 30 * core.phase as u32,
            });
            core.attack_timer = core.phase_cooldown(60, 10);
        }

        for orb in self.orbs.iter_mut() {
            orb.vel += (player - orb.pos).normalize_or_zero() * 0.3 * ctx.scale;
            orb.vel *= 0.98;
            orb.step(ctx.scale);
        }
        self.orbs.retain(|o| o.life > 0);
    }

    fn strike(&mut self, _core: &BossCore, player: &Aabb) -> Option<f32> {
        let idx = self
            .orbs
            .iter()
            .position(|o| circle_hits_aabb(o.pos, ORB_RADIUS, player))?;
        self.orbs.swap_remove(idx);
        Some(ORB_DAMAGE)
    }

    fn shift(&mut self, dx: f32) {
        for o in self.orbs.iter_mut() {
            o.pos.x -= dx;
        }
    }

    fn parts(&self, _core: &BossCore) -> Vec<BossPart> {
        self.orbs
            .iter()
            .map(|o| BossPart {
                center: o.pos,
                radius: ORB_RADIUS,
                kind: PartKind::Orb,
            })
            .collect()
    }
}

/// Central hover firing rotating radial bursts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CosmosPattern {
    pub rotation: f32,
    pub bullets: Vec<Projectile>,
}

impl BossBehavior for CosmosPattern {
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        let p = core.phase_f();
        core.body.pos.y = 200.0 + (ctx.frame as f32 * 0.02).sin() * 30.0;
        core.body.vel = Vec2::new((ctx.player.center().x - core.center().x) * 0.01, 0.0);
        self.rotation = (self.rotation + (0.02 + 0.01 * p) * ctx.scale).rem_euclid(TAU);

        if core.attack_timer == 0 {
            let count = 6 + 3 * core.phase as u32;
            let speed = 2.0 + p;
            for i in 0..count {
                let angle = self.rotation + i as f32 * TAU / count as f32;
                self.bullets.push(Projectile {
                    pos: core.center(),
                    vel: Vec2::from_angle(angle) * speed,
                    life: BULLET_LIFE,
                });
            }
            ctx.camera.shake(2.0);
            core.attack_timer = core.phase_cooldown(30, 5);
        }

        for b in self.bullets.iter_mut() {
            b.step(ctx.scale);
        }
        self.bullets.retain(|b| b.life > 0);
    }

    fn strike(&mut self, _core: &BossCore, player: &Aabb) -> Option<f32> {
        let idx = self
            .bullets
            .iter()
            .position(|b| circle_hits_aabb(b.pos, BULLET_RADIUS, player))?;
        self.bullets.swap_remove(idx);
        Some(BULLET_DAMAGE)
    }

    fn shift(&mut self, dx: f32) {
        for b in self.bullets.iter_mut() {
            b.pos.x -= dx;
        }
    }

    fn parts(&self, _core: &BossCore) -> Vec<BossPart> {
        self.bullets
            .iter()
            .map(|b| BossPart {
                center: b.pos,
                radius: BULLET_RADIUS,
                kind: PartKind::Bullet,
            })
            .collect()
    }

    fn on_defeat(&mut self, core: &BossCore, fx: &mut ParticlePool) {
        self.bullets.clear();
        fx.burst(Burst::Death, core.center(), core.color());
        fx.burst(Burst::Explosion, core.center(), core.color());
    }
}

/// Closed set of boss behaviours, one per world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BossPattern {
    Serpent(SerpentPattern),
    Phoenix(PhoenixPattern),
    Golem(GolemPattern),
    Specter(SpecterPattern),
    Oracle(OraclePattern),
    Seer(SeerPattern),
    Cosmos(CosmosPattern),
}

impl BossPattern {
    pub fn for_kind(kind: BossKind) -> Self {
        match kind {
            BossKind::Serpent => BossPattern::Serpent(SerpentPattern::default()),
            BossKind::Phoenix => BossPattern::Phoenix(PhoenixPattern::default()),
            BossKind::Golem => BossPattern::Golem(GolemPattern::default()),
            BossKind::Specter => BossPattern::Specter(SpecterPattern::default()),
            BossKind::Oracle => BossPattern::Oracle(OraclePattern::default()),
            BossKind::Seer => BossPattern::Seer(SeerPattern::default()),
            BossKind::Cosmos => BossPattern::Cosmos(CosmosPattern::default()),
        }
    }

    fn behavior(&mut self) -> &mut dyn BossBehavior {
        match self {
            BossPattern::Serpent(p) => p,
            BossPattern::Phoenix(p) => p,
            BossPattern::Golem(p) => p,
            BossPattern::Specter(p) => p,
            BossPattern::Oracle(p) => p,
            BossPattern::Seer(p) => p,
            BossPattern::Cosmos(p) => p,
        }
    }

    fn behavior_ref(&self) -> &dyn BossBehavior {
        match self {
            BossPattern::Serpent(p) => p,
            BossPattern::Phoenix(p) => p,
            BossPattern::Golem(p) => p,
            BossPattern::Specter(p) => p,
            BossPattern::Oracle(p) => p,
            BossPattern::Seer(p) => p,
            BossPattern::Cosmos(p) => p,
        }
    }
}

impl BossBehavior for BossPattern {
    fn update_phase(&mut self, core: &mut BossCore, ctx: &mut BossContext<'_>) {
        self.behavior().update_phase(core, ctx);
    }

    fn after_move(&mut self, core: &mut BossCore, landed: bool, ctx: &mut BossContext<'_>) {
        self.behavior().after_move(core, landed, ctx);
    }

    fn strike(&mut self, core: &BossCore, player: &Aabb) -> Option<f32> {
        self.behavior().strike(core, player)
    }

    fn shift(&mut self, dx: f32) {
        self.behavior().shift(dx);
    }

    fn parts(&self, core: &BossCore) -> Vec<BossPart> {
        self.behavior_ref().parts(core)
    }

    fn on_defeat(&mut self, core: &BossCore, fx: &mut ParticlePool) {
        self.behavior().on_defeat(core, fx);
    }
}
