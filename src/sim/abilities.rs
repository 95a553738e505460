//! Chakra powers
//!
//! Seven slots, one per world, unlocked by beating that world's boss.
//! Activation is all-or-nothing: a locked slot, a running cooldown or too
//! little energy rejects the request without touching any state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::CameraRig;
use super::clock::Clock;
use super::enemy::Enemy;
use super::events::{EventQueue, GameEvent};
use super::particles::{Burst, EmitOptions, ParticlePool};
use super::player::Player;
use crate::consts::ABILITY_COUNT;
use crate::scale_ticks;
use crate::tuning::Tuning;

/// Per-tick horizontal velocity multiplier while Flow Surge runs
pub const FLOW_SURGE_BOOST: f32 = 1.04;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    /// Damage and stun every enemy within `radius`
    Slam { radius: f32, damage: f32, stun: u32 },
    /// Compounding horizontal speed for the duration
    FlowSurge,
    /// Shield timer set to the duration
    Shield,
    Heal { amount: f32 },
    /// Forward piercing band
    Beam { length: f32, half_height: f32, damage: f32 },
    /// Global time scale for the duration
    SlowMotion { scale: f32 },
    /// Invincibility plus damage to every enemy
    Alignment { invincibility: u32, damage: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityDef {
    pub name: &'static str,
    pub cost: f32,
    pub cooldown: u32,
    /// Active window in ticks
    pub duration: u32,
    pub effect: AbilityEffect,
}

pub static ABILITIES: [AbilityDef; ABILITY_COUNT] = [
    AbilityDef {
        name: "Grounding Slam",
        cost: 40.0,
        cooldown: 180,
        duration: 20,
        effect: AbilityEffect::Slam {
            radius: 200.0,
            damage: 30.0,
            stun: 60,
        },
    },
    AbilityDef {
        name: "Flow Surge",
        cost: 35.0,
        cooldown: 150,
        duration: 120,
        effect: AbilityEffect::FlowSurge,
    },
    AbilityDef {
        name: "Radiant Shield",
        cost: 45.0,
        cooldown: 200,
        duration: 180,
        effect: AbilityEffect::Shield,
    },
    AbilityDef {
        name: "Harmonic Heal",
        cost: 50.0,
        cooldown: 240,
        duration: 1,
        effect: AbilityEffect::Heal { amount: 40.0 },
    },
    AbilityDef {
        name: "Resonance Wave",
        cost: 35.0,
        cooldown: 120,
        duration: 10,
        effect: AbilityEffect::Beam {
            length: 400.0,
            half_height: 80.0,
            damage: 40.0,
        },
    },
    AbilityDef {
        name: "Astral Sight",
        cost: 40.0,
        cooldown: 300,
        duration: 180,
        effect: AbilityEffect::SlowMotion { scale: 0.4 },
    },
    AbilityDef {
        name: "Cosmic Alignment",
        cost: 60.0,
        cooldown: 600,
        duration: 120,
        effect: AbilityEffect::Alignment {
            invincibility: 120,
            damage: 50.0,
        },
    },
];

/// Everything an effect may touch
pub struct AbilityContext<'a> {
    pub player: &'a mut Player,
    pub enemies: &'a mut [Enemy],
    pub fx: &'a mut ParticlePool,
    pub camera: &'a mut dyn CameraRig,
    pub clock: &'a mut Clock,
    pub events: &'a mut EventQueue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityTracker {
    pub unlocked: [bool; ABILITY_COUNT],
    /// Ticks until each slot is ready
    pub cooldowns: [u32; ABILITY_COUNT],
    /// Slot currently in its active window (UI indicator)
    pub active: Option<usize>,
    pub active_timer: u32,
}

impl AbilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock `slot`. Returns true the first time.
    pub fn unlock(&mut self, slot: usize) -> bool {
        match self.unlocked.get_mut(slot) {
            Some(flag) if !*flag => {
                *flag = true;
                log::info!("Unlocked {}", ABILITIES[slot].name);
                true
            }
            _ => false,
        }
    }

    pub fn is_unlocked(&self, slot: usize) -> bool {
        self.unlocked.get(slot).copied().unwrap_or(false)
    }

    /// Effective energy cost of `slot`, `None` past the last slot
    pub fn cost(slot: usize, t: &Tuning) -> Option<f32> {
        ABILITIES
            .get(slot)
            .map(|def| def.cost * t.abilities.cost_mult)
    }

    pub fn can_activate(&self, slot: usize, energy: f32, t: &Tuning) -> bool {
        let ready = self.cooldowns.get(slot) == Some(&0);
        match Self::cost(slot, t) {
            Some(cost) => self.is_unlocked(slot) && ready && energy >= cost,
            None => false,
        }
    }

    /// Try to fire `slot`. Rejections leave every piece of state untouched.
    pub fn activate(&mut self, slot: usize, ctx: &mut AbilityContext<'_>, t: &Tuning) -> bool {
        if !self.can_activate(slot, ctx.player.energy, t) {
            return false;
        }
        let (Some(def), Some(cost)) = (ABILITIES.get(slot), Self::cost(slot, t)) else {
            return false;
        };

        ctx.player.energy -= cost;
        self.cooldowns[slot] = scale_ticks(def.cooldown, t.abilities.cooldown_mult);
        self.active = Some(slot);
        self.active_timer = def.duration;

        apply_effect(def, ctx);
        ctx.events.push(GameEvent::AbilityActivated { slot });
        log::debug!("{} activated", def.name);
        true
    }

    pub fn update(&mut self) {
        for cd in self.cooldowns.iter_mut() {
            *cd = cd.saturating_sub(1);
        }
        if self.active_timer > 0 {
            self.active_timer -= 1;
            if self.active_timer == 0 {
                self.active = None;
            }
        }
    }
}

fn apply_effect(def: &AbilityDef, ctx: &mut AbilityContext<'_>) {
    let origin = ctx.player.center();
    let color = ctx.player.form.glow_color();

    match def.effect {
        AbilityEffect::Slam {
            radius,
            damage,
            stun,
        } => {
            for enemy in ctx.enemies.iter_mut().filter(|e| !e.dead) {
                let delta = enemy.body.center() - origin;
                if delta.length_squared() < radius * radius {
                    hit_enemy(enemy, damage, delta.x.signum(), ctx.events);
                    enemy.stun(stun);
                }
            }
            ctx.camera.shake(10.0);
            ctx.fx.burst(Burst::Explosion, origin, color);
        }
        AbilityEffect::FlowSurge => {
            ctx.player.flow_surge_timer = def.duration;
            ctx.fx.burst(Burst::SwitchForm, origin, color);
        }
        AbilityEffect::Shield => {
            ctx.player.shield_timer = def.duration;
            ctx.fx.burst(Burst::Collect, origin, color);
        }
        AbilityEffect::Heal { amount } => {
            ctx.player.heal(amount);
            ctx.fx.emit(origin, color, 20, 4.0, 30, EmitOptions::gravity(-0.05));
        }
        AbilityEffect::Beam {
            length,
            half_height,
            damage,
        } => {
            let dir = ctx.player.facing.sign();
            for enemy in ctx.enemies.iter_mut().filter(|e| !e.dead) {
                let delta = enemy.body.center() - origin;
                let ahead = delta.x * dir;
                if ahead > 0.0 && ahead < length && delta.y.abs() < half_height {
                    hit_enemy(enemy, damage, dir, ctx.events);
                }
            }
            for step in 0..8 {
                let at = origin + Vec2::new(dir * length * step as f32 / 8.0, 0.0);
                ctx.fx.emit(at, color, 3, 3.0, 15, EmitOptions::default());
            }
        }
        AbilityEffect::SlowMotion { scale } => {
            ctx.clock.set_slow_motion(scale, def.duration);
        }
        AbilityEffect::Alignment {
            invincibility,
            damage,
        } => {
            ctx.player.invincible = ctx.player.invincible.max(invincibility);
            for enemy in ctx.enemies.iter_mut().filter(|e| !e.dead) {
                let dir = (enemy.body.center().x - origin.x).signum();
                hit_enemy(enemy, damage, dir, ctx.events);
            }
            ctx.camera.shake(15.0);
            ctx.fx.burst(Burst::Death, origin, color);
        }
    }
}

fn hit_enemy(enemy: &mut Enemy, damage: f32, dir: f32, events: &mut EventQueue) {
    enemy.take_damage(damage, dir);
    events.push(GameEvent::EnemyHit {
        kind: enemy.kind,
        pos: enemy.body.center(),
        damage,
    });
}
