//! Enemy AI
//!
//! Per-type stat tables and a five-state machine:
//! PATROL -> CHASE -> {ATTACK | HURT} -> CHASE, with DEAD terminal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chakra::Color;
use super::geometry::{Aabb, Body, Facing};
use super::terrain::{Platform, surfaces};
use crate::tuning::RunModifiers;

/// Ticks an enemy stays in HURT after a hit
pub const HURT_TICKS: u32 = 12;
/// Ticks an enemy stays in ATTACK
pub const ATTACK_TICKS: u32 = 30;
/// Death fade-out before removal
pub const DEATH_FADE_TICKS: u32 = 30;
pub const HURT_FLASH_TICKS: u32 = 8;
/// Chase is abandoned beyond this multiple of the chase range
pub const CHASE_HYSTERESIS: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Drifter: grounded skirmisher
    Light,
    /// Floater: ignores gravity, chases vertically
    Flying,
    /// Brute: slow and tough
    Heavy,
}

/// Static per-type stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub size: Vec2,
    pub max_hp: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub contact_damage: f32,
    pub chase_range: f32,
    pub attack_range: f32,
    pub patrol_distance: f32,
    pub gravity: f32,
    pub score: u32,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Light => EnemyStats {
                size: Vec2::new(35.0, 40.0),
                max_hp: 60.0,
                patrol_speed: 1.5,
                chase_speed: 3.0,
                contact_damage: 15.0,
                chase_range: 250.0,
                attack_range: 40.0,
                patrol_distance: 120.0,
                gravity: 0.6,
                score: 50,
            },
            EnemyKind::Flying => EnemyStats {
                size: Vec2::new(28.0, 28.0),
                max_hp: 30.0,
                patrol_speed: 1.0,
                chase_speed: 2.5,
                contact_damage: 10.0,
                chase_range: 200.0,
                attack_range: 30.0,
                patrol_distance: 80.0,
                gravity: 0.0,
                score: 30,
            },
            EnemyKind::Heavy => EnemyStats {
                size: Vec2::new(45.0, 55.0),
                max_hp: 120.0,
                patrol_speed: 0.8,
                chase_speed: 2.0,
                contact_damage: 25.0,
                chase_range: 180.0,
                attack_range: 50.0,
                patrol_distance: 100.0,
                gravity: 0.6,
                score: 80,
            },
        }
    }

    pub fn color(self) -> Color {
        match self {
            EnemyKind::Light => Color(0xff3333),
            EnemyKind::Flying => Color(0xff66ff),
            EnemyKind::Heavy => Color(0xff6600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Patrol,
    Chase,
    Attack,
    Hurt,
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub body: Body,
    /// Stats after run modifiers
    pub stats: EnemyStats,
    pub hp: f32,
    pub max_hp: f32,
    pub state: EnemyState,
    pub state_timer: u32,
    pub hurt_flash: u32,
    pub facing: Facing,
    /// Patrol oscillates around this x
    pub patrol_origin: f32,
    pub grounded: bool,
    pub dead: bool,
    pub death_timer: u32,
    /// Already struck by the current player swing
    pub hit_this_swing: bool,
    /// Kill rewards granted
    pub rewarded: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, facing: Facing, mods: &RunModifiers) -> Self {
        let mut stats = kind.stats();
        stats.max_hp *= mods.enemy_hp_mult();
        stats.patrol_speed *= mods.enemy_speed_mult();
        stats.chase_speed *= mods.enemy_speed_mult();
        Self {
            kind,
            body: Body::new(pos, stats.size),
            stats,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            state: EnemyState::Patrol,
            state_timer: 0,
            hurt_flash: 0,
            facing,
            patrol_origin: pos.x,
            grounded: false,
            dead: false,
            death_timer: 0,
            hit_this_swing: false,
            rewarded: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Aabb {
        self.body.rect()
    }

    /// Apply damage with a knockback impulse. Returns true if this hit killed it.
    pub fn take_damage(&mut self, amount: f32, knockback_dir: f32) -> bool {
        if self.dead {
            return false;
        }
        self.hp = (self.hp - amount).max(0.0);
        self.hurt_flash = HURT_FLASH_TICKS;
        self.state = EnemyState::Hurt;
        self.state_timer = HURT_TICKS;
        self.body.vel = Vec2::new(knockback_dir * 5.0, -3.0);

        if self.hp <= 0.0 {
            self.dead = true;
            self.death_timer = DEATH_FADE_TICKS;
            self.state = EnemyState::Dead;
            return true;
        }
        false
    }

    /// Hold in HURT for `ticks` (no-op on the dead)
    pub fn stun(&mut self, ticks: u32) {
        if !self.dead {
            self.state = EnemyState::Hurt;
            self.state_timer = ticks;
        }
    }

    pub fn update(&mut self, player_pos: Vec2, platforms: &[Platform], scale: f32) {
        if self.dead {
            self.death_timer = self.death_timer.saturating_sub(1);
            return;
        }

        self.state_timer = self.state_timer.saturating_sub(1);
        self.hurt_flash = self.hurt_flash.saturating_sub(1);
        self.body.vel.y += self.stats.gravity * scale;

        let delta = player_pos - self.body.pos;
        let dist_sq = delta.length_squared();
        let chase_sq = self.stats.chase_range * self.stats.chase_range;

        match self.state {
            EnemyState::Patrol => {
                self.patrol();
                if dist_sq < chase_sq {
                    self.state = EnemyState::Chase;
                }
            }
            EnemyState::Chase => {
                self.chase(delta);
                let leash = self.stats.chase_range * CHASE_HYSTERESIS;
                if dist_sq > leash * leash {
                    self.state = EnemyState::Patrol;
                }
                if dist_sq < self.stats.attack_range * self.stats.attack_range {
                    self.state = EnemyState::Attack;
                    self.state_timer = ATTACK_TICKS;
                }
            }
            EnemyState::Attack | EnemyState::Hurt => {
                if self.state_timer == 0 {
                    self.state = EnemyState::Chase;
                }
            }
            EnemyState::Dead => {}
        }

        self.body.integrate(scale);

        if self.stats.gravity > 0.0 {
            self.grounded = self.body.land(surfaces(platforms));
        }
    }

    fn patrol(&mut self) {
        self.body.vel.x = self.facing.sign() * self.stats.patrol_speed;
        let offset = self.body.pos.x - self.patrol_origin;
        if offset > self.stats.patrol_distance {
            self.facing = Facing::Left;
        } else if offset < -self.stats.patrol_distance {
            self.facing = Facing::Right;
        }
    }

    fn chase(&mut self, delta: Vec2) {
        if delta != Vec2::ZERO {
            let dir = delta.normalize();
            self.body.vel.x = dir.x * self.stats.chase_speed;
            if self.stats.gravity == 0.0 {
                self.body.vel.y = dir.y * self.stats.chase_speed;
            }
        }
        self.facing = Facing::toward(delta.x);
    }

    /// Contact damage check (ignored while the player is invincible)
    pub fn touches_player(&self, player: &Aabb, player_invincible: bool) -> bool {
        !self.dead && !player_invincible && self.rect().overlaps(player)
    }

    /// Melee check against an open attack window
    pub fn struck_by(&self, hitbox: Option<Aabb>) -> bool {
        match hitbox {
            Some(hb) => !self.dead && !self.hit_this_swing && self.rect().overlaps(&hb),
            None => false,
        }
    }

    /// Dead and faded out
    pub fn is_removable(&self) -> bool {
        self.dead && self.death_timer == 0
    }

    /// Follow the camera scroll
    pub fn shift(&mut self, dx: f32) {
        self.body.shift_x(dx);
        self.patrol_origin -= dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(kind: EnemyKind, x: f32, y: f32) -> Enemy {
        Enemy::new(kind, Vec2::new(x, y), Facing::Right, &RunModifiers::default())
    }

    #[test]
    fn test_patrol_to_chase_and_back() {
        let mut e = spawn(EnemyKind::Flying, 0.0, 100.0);
        let far = Vec2::new(1000.0, 100.0);
        e.update(far, &[], 1.0);
        assert_eq!(e.state, EnemyState::Patrol);

        let near = Vec2::new(150.0, 100.0);
        e.update(near, &[], 1.0);
        assert_eq!(e.state, EnemyState::Chase);

        // Inside the hysteresis band: keep chasing
        let band = Vec2::new(e.body.pos.x + 260.0, 100.0);
        e.update(band, &[], 1.0);
        assert_eq!(e.state, EnemyState::Chase);

        let gone = Vec2::new(e.body.pos.x + 400.0, 100.0);
        e.update(gone, &[], 1.0);
        assert_eq!(e.state, EnemyState::Patrol);
    }

    #[test]
    fn test_chase_to_attack_then_back() {
        let mut e = spawn(EnemyKind::Flying, 0.0, 100.0);
        e.state = EnemyState::Chase;
        e.update(Vec2::new(10.0, 100.0), &[], 1.0);
        assert_eq!(e.state, EnemyState::Attack);
        assert_eq!(e.state_timer, ATTACK_TICKS);

        for _ in 0..ATTACK_TICKS {
            e.update(Vec2::new(e.body.pos.x + 10.0, 100.0), &[], 1.0);
        }
        assert_eq!(e.state, EnemyState::Chase);
    }

    #[test]
    fn test_flying_chases_vertically_grounded_does_not() {
        let mut floater = spawn(EnemyKind::Flying, 0.0, 100.0);
        floater.state = EnemyState::Chase;
        floater.update(Vec2::new(0.0, 250.0), &[], 1.0);
        assert!(floater.body.vel.y > 0.0);
        assert_eq!(floater.body.vel.x, 0.0);

        let mut drifter = spawn(EnemyKind::Light, 0.0, 100.0);
        drifter.state = EnemyState::Chase;
        drifter.update(Vec2::new(0.0, -100.0), &[], 1.0);
        // Only gravity acts vertically
        assert!((drifter.body.vel.y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_hurt_then_recover() {
        let mut e = spawn(EnemyKind::Heavy, 0.0, 100.0);
        assert!(!e.take_damage(25.0, 1.0));
        assert_eq!(e.state, EnemyState::Hurt);
        assert_eq!(e.body.vel, Vec2::new(5.0, -3.0));
        for _ in 0..HURT_TICKS {
            e.update(Vec2::new(5000.0, 0.0), &[], 1.0);
        }
        assert_eq!(e.state, EnemyState::Chase);
    }

    #[test]
    fn test_death_fades_before_removal() {
        let mut e = spawn(EnemyKind::Flying, 0.0, 100.0);
        assert!(e.take_damage(100.0, -1.0));
        assert_eq!(e.hp, 0.0);
        assert_eq!(e.state, EnemyState::Dead);
        assert!(!e.is_removable());

        // Damage on the dead is a no-op
        assert!(!e.take_damage(10.0, 1.0));
        assert_eq!(e.hp, 0.0);

        for _ in 0..DEATH_FADE_TICKS {
            e.update(Vec2::ZERO, &[], 1.0);
        }
        assert!(e.is_removable());
    }

    #[test]
    fn test_patrol_turns_back_toward_anchor() {
        let mut e = spawn(EnemyKind::Flying, 0.0, 100.0);
        let far = Vec2::new(5000.0, 100.0);
        let mut max_offset: f32 = 0.0;
        for _ in 0..400 {
            e.update(far, &[], 1.0);
            max_offset = max_offset.max((e.body.pos.x - e.patrol_origin).abs());
        }
        assert!(max_offset <= e.stats.patrol_distance + 2.0 * e.stats.patrol_speed);
    }

    #[test]
    fn test_swing_flag_blocks_repeat_hits() {
        let mut e = spawn(EnemyKind::Light, 100.0, 100.0);
        let hb = Some(Aabb::from_xywh(90.0, 100.0, 45.0, 40.0));
        assert!(e.struck_by(hb));
        e.hit_this_swing = true;
        assert!(!e.struck_by(hb));
        assert!(!e.struck_by(None));
    }

    #[test]
    fn test_modifiers_scale_spawned_stats() {
        let mods = RunModifiers {
            enemy_hp_mult: Some(1.3),
            enemy_speed_mult: Some(0.8),
            ..Default::default()
        };
        let e = Enemy::new(EnemyKind::Light, Vec2::ZERO, Facing::Left, &mods);
        assert!((e.max_hp - 78.0).abs() < 1e-4);
        assert!((e.stats.chase_speed - 2.4).abs() < 1e-5);
    }

    #[test]
    fn test_grounded_enemy_lands() {
        let mut e = spawn(EnemyKind::Light, 50.0, 255.0);
        let platforms = [Platform::new(0.0, 300.0, 300.0, 20.0, 0)];
        for _ in 0..20 {
            e.update(Vec2::new(5000.0, 0.0), &platforms, 1.0);
        }
        assert!(e.grounded);
        assert_eq!(e.body.bottom(), 300.0);
    }
}
