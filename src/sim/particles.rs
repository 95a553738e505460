//! Fixed-capacity particle pool
//!
//! Slots are allocated once. Emitting flips inactive slots to active via a
//! ring cursor; when every slot is busy the slot under the cursor is
//! recycled, so the pool never grows. Slots are addressed by index.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chakra::Color;
use super::rng::Prng;
use crate::tuning::{EmitPreset, ParticlePresets, ParticleTuning};

/// One pooled particle (visual only, never references an entity)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
    pub size_decay: f32,
    pub gravity: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            active: false,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Color::WHITE,
            life: 0,
            max_life: 0,
            size: 0.0,
            size_decay: 0.95,
            gravity: 0.0,
        }
    }
}

impl Particle {
    /// Remaining life as 0..=1 (renderer alpha)
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Optional per-burst overrides
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmitOptions {
    pub size: Option<f32>,
    pub size_decay: Option<f32>,
    pub gravity: f32,
}

impl EmitOptions {
    pub fn gravity(gravity: f32) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }
}

/// Named presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    Jump,
    Dash,
    SwitchForm,
    Collect,
    Hit,
    Explosion,
    Death,
}

impl Burst {
    fn preset(self, presets: &ParticlePresets) -> EmitPreset {
        match self {
            Burst::Jump => presets.jump,
            Burst::Dash => presets.dash,
            Burst::SwitchForm => presets.switch_form,
            Burst::Collect => presets.collect,
            Burst::Hit => presets.hit,
            Burst::Explosion => presets.explosion,
            Burst::Death => presets.death,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    cursor: usize,
    size_decay: f32,
    min_size: f32,
    #[serde(skip)]
    presets: ParticlePresets,
    rng: Prng,
}

impl ParticlePool {
    pub fn new(tuning: &ParticleTuning, rng: Prng) -> Self {
        Self {
            slots: vec![Particle::default(); tuning.pool_size.max(1)],
            cursor: 0,
            size_decay: tuning.size_decay,
            min_size: tuning.min_size,
            presets: tuning.presets.clone(),
            rng,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Claim a slot: first inactive slot from the cursor, else recycle the cursor slot
    pub fn acquire(&mut self) -> usize {
        let len = self.slots.len();
        for i in 0..len {
            let idx = (self.cursor + i) % len;
            if !self.slots[idx].active {
                self.cursor = (idx + 1) % len;
                return idx;
            }
        }
        let idx = self.cursor;
        self.cursor = (self.cursor + 1) % len;
        idx
    }

    /// Return a slot to the pool early
    pub fn release(&mut self, index: usize) {
        if let Some(p) = self.slots.get_mut(index) {
            p.active = false;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index)
    }

    /// Emit `count` particles with random velocity in a `speed`-wide box
    pub fn emit(
        &mut self,
        pos: Vec2,
        color: Color,
        count: u32,
        speed: f32,
        life: u32,
        opts: EmitOptions,
    ) {
        for _ in 0..count {
            let idx = self.acquire();
            let vel = Vec2::new(
                (self.rng.next_f32() - 0.5) * speed,
                (self.rng.next_f32() - 0.5) * speed,
            );
            let size = match opts.size {
                Some(size) => size,
                None => self.rng.next_f32() * 3.0 + 1.0,
            };
            self.slots[idx] = Particle {
                active: true,
                pos,
                vel,
                color,
                life,
                max_life: life,
                size,
                size_decay: opts.size_decay.unwrap_or(self.size_decay),
                gravity: opts.gravity,
            };
        }
    }

    pub fn burst(&mut self, kind: Burst, pos: Vec2, color: Color) {
        let preset = kind.preset(&self.presets);
        self.emit(pos, color, preset.count, preset.speed, preset.life, EmitOptions::default());
    }

    /// Offset every active particle (camera scroll)
    pub fn shift(&mut self, dx: f32, dy: f32) {
        let offset = Vec2::new(dx, dy);
        for p in self.slots.iter_mut().filter(|p| p.active) {
            p.pos -= offset;
        }
    }

    /// Step every active particle; `scale` is the slow-motion factor
    pub fn update(&mut self, scale: f32) {
        for p in self.slots.iter_mut().filter(|p| p.active) {
            p.pos += p.vel * scale;
            p.vel.y += p.gravity * scale;
            p.life = p.life.saturating_sub(1);
            p.size *= p.size_decay;
            if p.life == 0 || p.size < self.min_size {
                p.active = false;
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(size: usize) -> ParticlePool {
        let tuning = ParticleTuning {
            pool_size: size,
            ..Default::default()
        };
        ParticlePool::new(&tuning, Prng::new(3))
    }

    #[test]
    fn test_emit_activates_slots() {
        let mut p = pool(500);
        p.emit(Vec2::ZERO, Color::WHITE, 30, 12.0, 25, EmitOptions::default());
        assert_eq!(p.active_count(), 30);
    }

    #[test]
    fn test_saturation_recycles_instead_of_growing() {
        let mut p = pool(16);
        p.emit(Vec2::ZERO, Color::WHITE, 40, 5.0, 100, EmitOptions::default());
        assert_eq!(p.capacity(), 16);
        assert_eq!(p.active_count(), 16);
    }

    #[test]
    fn test_life_expiry_deactivates() {
        let mut p = pool(8);
        let opts = EmitOptions {
            size: Some(3.0),
            size_decay: Some(1.0),
            gravity: 0.0,
        };
        p.emit(Vec2::ZERO, Color::WHITE, 4, 2.0, 3, opts);
        p.update(1.0);
        p.update(1.0);
        assert_eq!(p.active_count(), 4);
        p.update(1.0);
        assert_eq!(p.active_count(), 0);
    }

    #[test]
    fn test_small_size_deactivates() {
        let mut p = pool(4);
        let opts = EmitOptions {
            size: Some(0.105),
            ..Default::default()
        };
        p.emit(Vec2::ZERO, Color::WHITE, 1, 2.0, 100, opts);
        p.update(1.0);
        assert_eq!(p.active_count(), 0);
    }

    #[test]
    fn test_acquire_release_by_index() {
        let mut p = pool(4);
        p.emit(Vec2::ZERO, Color::WHITE, 4, 1.0, 50, EmitOptions::default());
        p.release(1);
        assert_eq!(p.active_count(), 3);
        assert_eq!(p.acquire(), 1);
    }

    #[test]
    fn test_gravity_and_shift() {
        let mut p = pool(2);
        let opts = EmitOptions {
            size: Some(2.0),
            size_decay: Some(1.0),
            gravity: 0.5,
        };
        p.emit(Vec2::new(100.0, 100.0), Color::WHITE, 1, 0.0, 10, opts);
        p.update(1.0);
        p.update(1.0);
        let before = *p.iter_active().next().unwrap();
        assert!((before.vel.y - 1.0).abs() < 1e-6);
        p.shift(40.0, 0.0);
        let after = p.iter_active().next().unwrap();
        assert!((before.pos.x - after.pos.x - 40.0).abs() < 1e-4);
    }
}
