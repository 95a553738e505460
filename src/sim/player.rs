//! Player controller
//!
//! Two zodiac forms with separate physics profiles, multi-jump with a
//! variable-height cut, energy-gated dash, melee attack window, post-hit
//! invincibility, knockback lock and a decaying score combo.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chakra::Color;
use super::events::{EventQueue, GameEvent};
use super::geometry::{Aabb, Body, Facing};
use super::input::Actions;
use super::particles::{Burst, ParticlePool};
use super::terrain::{Platform, Shard, ShardKind, surfaces};
use crate::tuning::{FormStats, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZodiacForm {
    /// Fire: heavy and fast
    #[default]
    Aires,
    /// Water: floaty, double jump
    Koidon,
}

impl ZodiacForm {
    pub fn toggled(self) -> Self {
        match self {
            ZodiacForm::Aires => ZodiacForm::Koidon,
            ZodiacForm::Koidon => ZodiacForm::Aires,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZodiacForm::Aires => "AIRES [FIRE]",
            ZodiacForm::Koidon => "KOIDON [WATER]",
        }
    }

    pub fn main_color(self) -> Color {
        match self {
            ZodiacForm::Aires => Color(0xff2a00),
            ZodiacForm::Koidon => Color(0x00f7ff),
        }
    }

    pub fn glow_color(self) -> Color {
        match self {
            ZodiacForm::Aires => Color(0xff8800),
            ZodiacForm::Koidon => Color(0x0044ff),
        }
    }
}

/// What `take_damage` did with a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible or already dead
    Ignored,
    /// Shield ate the hit
    Absorbed,
    Applied,
}

/// Everything the player touches during its update
pub struct PlayerWorld<'a> {
    pub tuning: &'a Tuning,
    pub platforms: &'a [Platform],
    pub shards: &'a mut [Shard],
    pub fx: &'a mut ParticlePool,
    pub events: &'a mut EventQueue,
    pub frame: u64,
    /// Slow-motion factor for integration
    pub scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub grounded: bool,
    pub facing: Facing,

    pub form: ZodiacForm,
    pub jumps: u32,
    pub max_jumps: u32,
    /// Jump button still held since the last jump
    pub jump_held: bool,

    pub energy: f32,
    pub max_energy: f32,
    pub shards_collected: u32,

    pub hp: f32,
    pub max_hp: f32,
    /// Remaining invincibility ticks
    pub invincible: u32,
    pub knockback_timer: u32,

    pub dashing: bool,
    pub dash_timer: u32,
    pub dash_cooldown: u32,

    pub attacking: bool,
    pub attack_timer: u32,
    pub attack_cooldown: u32,
    pub attack_box: Aabb,

    /// Radiant Shield ticks remaining
    pub shield_timer: u32,
    /// Flow Surge ticks remaining
    pub flow_surge_timer: u32,

    pub score: u64,
    pub combo: u32,
    pub combo_timer: u32,
}

impl Player {
    pub fn new(t: &Tuning) -> Self {
        let p = &t.player;
        let pos = Vec2::new(p.start_x, t.screen.height - 150.0);
        Self {
            body: Body::new(pos, Vec2::new(p.width, p.height)),
            grounded: false,
            facing: Facing::Right,
            form: ZodiacForm::Aires,
            jumps: 0,
            max_jumps: t.forms.aires.max_jumps,
            jump_held: false,
            energy: p.energy_max,
            max_energy: p.energy_max,
            shards_collected: 0,
            hp: p.max_hp,
            max_hp: p.max_hp,
            invincible: 0,
            knockback_timer: 0,
            dashing: false,
            dash_timer: 0,
            dash_cooldown: 0,
            attacking: false,
            attack_timer: 0,
            attack_cooldown: 0,
            attack_box: Aabb::new(pos, Vec2::new(p.attack_width, p.attack_height)),
            shield_timer: 0,
            flow_surge_timer: 0,
            score: 0,
            combo: 0,
            combo_timer: 0,
        }
    }

    pub fn stats<'a>(&self, t: &'a Tuning) -> &'a FormStats {
        t.forms.get(self.form)
    }

    #[inline]
    pub fn rect(&self) -> Aabb {
        self.body.rect()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn switch_form(&mut self, t: &Tuning) {
        self.form = self.form.toggled();
        self.max_jumps = self.stats(t).max_jumps;
    }

    /// Jump if grounded or jumps remain; returns whether it happened
    pub fn jump(&mut self, t: &Tuning) -> bool {
        if !(self.grounded || self.jumps < self.max_jumps) {
            return false;
        }
        self.body.vel.y = self.stats(t).jump_force;
        self.jumps += 1;
        self.grounded = false;
        self.jump_held = true;
        true
    }

    /// Early release shortens the arc
    pub fn release_jump(&mut self, t: &Tuning) {
        if self.jump_held && self.body.vel.y < 0.0 {
            self.body.vel.y *= t.player.jump_cut;
        }
        self.jump_held = false;
    }

    pub fn dash(&mut self, t: &Tuning) -> bool {
        let p = &t.player;
        if self.energy < p.dash_cost || self.dashing || self.dash_cooldown > 0 {
            return false;
        }
        self.dashing = true;
        self.dash_timer = p.dash_duration;
        self.dash_cooldown = p.dash_cooldown;
        self.energy -= p.dash_cost;
        self.body.vel = Vec2::new(self.facing.sign() * self.stats(t).dash_speed, 0.0);
        true
    }

    pub fn attack(&mut self, t: &Tuning) -> bool {
        if self.attacking || self.attack_cooldown > 0 {
            return false;
        }
        self.attacking = true;
        self.attack_timer = t.player.attack_duration;
        self.attack_cooldown = t.player.attack_cooldown;
        self.place_attack_box();
        true
    }

    /// Melee hitbox while the attack window is open
    pub fn active_hitbox(&self) -> Option<Aabb> {
        self.attacking.then_some(self.attack_box)
    }

    fn place_attack_box(&mut self) {
        let size = self.attack_box.size;
        let x = match self.facing {
            Facing::Right => self.body.pos.x + self.body.size.x,
            Facing::Left => self.body.pos.x - size.x,
        };
        let y = self.body.pos.y + (self.body.size.y - size.y) / 2.0;
        self.attack_box.pos = Vec2::new(x, y);
    }

    /// Apply a hit. A zero `knockback_dir` skips the knockback kick.
    pub fn take_damage(&mut self, amount: f32, knockback_dir: f32, t: &Tuning) -> DamageOutcome {
        if self.invincible > 0 || self.is_dead() {
            return DamageOutcome::Ignored;
        }
        if self.shield_timer > 0 {
            self.shield_timer = self.shield_timer.saturating_sub(t.player.shield_hit_cost);
            return DamageOutcome::Absorbed;
        }

        self.hp = (self.hp - amount).max(0.0);
        self.invincible = t.player.invincibility_ticks;
        self.combo = 0;
        self.combo_timer = 0;

        if knockback_dir != 0.0 {
            self.body.vel = Vec2::new(
                knockback_dir * t.player.knockback_force,
                -t.player.knockback_lift,
            );
            self.knockback_timer = t.player.knockback_lock_ticks;
        }
        DamageOutcome::Applied
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn add_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, self.max_energy);
    }

    /// Award points through the combo multiplier; returns points gained
    pub fn add_score(&mut self, points: u32, t: &Tuning) -> u64 {
        self.combo += 1;
        self.combo_timer = t.player.combo_window;
        let multiplier = self.combo.min(t.player.max_combo_multiplier) as u64;
        let gained = points as u64 * multiplier;
        self.score += gained;
        gained
    }

    /// Flow Surge: horizontal velocity compounds while active
    pub fn apply_flow_surge(&mut self, boost: f32) {
        if self.flow_surge_timer > 0 {
            self.flow_surge_timer -= 1;
            self.body.vel.x *= boost;
        }
    }

    /// Per-tick update. Returns the number of token shards picked up.
    pub fn update(&mut self, held: &Actions, world: &mut PlayerWorld<'_>) -> u32 {
        let t = world.tuning;
        let p = &t.player;
        let stats = *self.stats(t);

        self.invincible = self.invincible.saturating_sub(1);
        self.shield_timer = self.shield_timer.saturating_sub(1);

        if self.combo_timer > 0 {
            self.combo_timer -= 1;
            if self.combo_timer == 0 {
                self.combo = 0;
            }
        }

        self.dash_cooldown = self.dash_cooldown.saturating_sub(1);
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);

        if self.attacking {
            self.attack_timer = self.attack_timer.saturating_sub(1);
            if self.attack_timer == 0 {
                self.attacking = false;
            }
        }

        // Movement: dash burst, knockback lock, or steering
        if self.dash_timer > 0 {
            self.dash_timer -= 1;
            if world.frame % 2 == 0 {
                world
                    .fx
                    .burst(Burst::Dash, self.center(), self.form.main_color());
            }
        } else {
            self.dashing = false;

            if self.knockback_timer > 0 {
                self.knockback_timer -= 1;
            } else if held.right {
                self.body.vel.x = (self.body.vel.x + p.acceleration).min(stats.speed);
                self.facing = Facing::Right;
            } else if held.left {
                self.body.vel.x = (self.body.vel.x - p.acceleration).max(-stats.speed);
                self.facing = Facing::Left;
            } else {
                self.body.vel.x *= p.deceleration;
            }

            self.body.vel.y += stats.gravity * world.scale;

            if self.jump_held && !held.jump {
                self.release_jump(t);
            }
        }

        self.body.integrate(world.scale);

        self.grounded = self.body.land(surfaces(world.platforms));

        let floor = t.screen.height;
        if self.body.bottom() > floor {
            self.body.pos.y = floor - self.body.size.y;
            self.body.vel.y = 0.0;
            self.grounded = true;
        }
        if self.grounded {
            self.jumps = 0;
        }

        self.body.pos.x = self
            .body
            .pos
            .x
            .clamp(0.0, (t.screen.width - self.body.size.x).max(0.0));

        if self.attacking {
            self.place_attack_box();
        }

        let tokens = self.collect_shards(world);

        if self.energy < self.max_energy {
            self.energy = (self.energy + p.energy_regen).min(self.max_energy);
        }

        tokens
    }

    fn collect_shards(&mut self, world: &mut PlayerWorld<'_>) -> u32 {
        let t = world.tuning;
        let me = self.rect();
        let mut tokens = 0;

        for shard in world.shards.iter_mut() {
            if shard.collected || !me.overlaps(&shard.rect()) {
                continue;
            }
            shard.collected = true;
            self.shards_collected += 1;
            self.add_score(t.player.shard_score, t);

            match shard.kind {
                ShardKind::Health => self.heal(t.player.health_shard_heal),
                ShardKind::Energy => self.add_energy(t.player.energy_shard_reward),
                ShardKind::Token => tokens += 1,
            }

            world.fx.burst(Burst::Collect, shard.pos, Color::WHITE);
            world.events.push(GameEvent::ShardCollected {
                kind: shard.kind,
                pos: shard.pos,
            });
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::Prng;

    struct Rig {
        tuning: Tuning,
        platforms: Vec<Platform>,
        shards: Vec<Shard>,
        fx: ParticlePool,
        events: EventQueue,
        frame: u64,
    }

    impl Rig {
        fn new() -> Self {
            let tuning = Tuning::default();
            let fx = ParticlePool::new(&tuning.particles, Prng::new(1));
            Self {
                tuning,
                platforms: Vec::new(),
                shards: Vec::new(),
                fx,
                events: EventQueue::new(),
                frame: 0,
            }
        }

        fn step(&mut self, player: &mut Player, held: Actions) -> u32 {
            self.frame += 1;
            let mut world = PlayerWorld {
                tuning: &self.tuning,
                platforms: &self.platforms,
                shards: &mut self.shards,
                fx: &mut self.fx,
                events: &mut self.events,
                frame: self.frame,
                scale: 1.0,
            };
            player.update(&held, &mut world)
        }
    }

    #[test]
    fn test_dash_denied_without_energy() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        player.energy = 15.0;
        assert!(!player.dash(&t));
        assert!(!player.dashing);
        assert_eq!(player.energy, 15.0);
    }

    #[test]
    fn test_dash_spends_energy_and_bursts() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        player.body.vel.y = 5.0;
        assert!(player.dash(&t));
        assert_eq!(player.energy, 80.0);
        assert_eq!(player.body.vel, Vec2::new(25.0, 0.0));
        // Already dashing / on cooldown
        assert!(!player.dash(&t));
        assert_eq!(player.energy, 80.0);
    }

    #[test]
    fn test_variable_jump_cut() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        player.grounded = true;
        assert!(player.jump(&t));
        assert_eq!(player.body.vel.y, -16.0);
        player.release_jump(&t);
        assert!((player.body.vel.y - (-6.4)).abs() < 1e-5);
        // A second release changes nothing
        player.release_jump(&t);
        assert!((player.body.vel.y - (-6.4)).abs() < 1e-5);
    }

    #[test]
    fn test_releasing_button_mid_air_cuts_jump() {
        let mut rig = Rig::new();
        let mut player = Player::new(&rig.tuning);
        player.grounded = true;
        player.jump(&rig.tuning);
        rig.step(&mut player, Actions::default());
        // gravity first, then the cut: (-16 + 0.8) * 0.4
        assert!((player.body.vel.y - (-6.08)).abs() < 1e-4);
        assert!(!player.jump_held);
    }

    #[test]
    fn test_jump_budget_per_form() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        player.grounded = false;
        player.jumps = 1;
        assert!(!player.jump(&t), "Aires has a single jump");

        player.switch_form(&t);
        assert_eq!(player.form, ZodiacForm::Koidon);
        assert_eq!(player.max_jumps, 2);
        assert!(player.jump(&t));
        assert_eq!(player.body.vel.y, -12.0);
        assert!(!player.jump(&t));
    }

    #[test]
    fn test_combo_multiplier_and_decay() {
        let mut rig = Rig::new();
        let mut player = Player::new(&rig.tuning);
        let t = rig.tuning.clone();

        assert_eq!(player.add_score(50, &t), 50);
        assert_eq!(player.add_score(50, &t), 100);
        assert_eq!(player.add_score(50, &t), 150);
        assert_eq!(player.combo, 3);
        assert_eq!(player.score, 300);

        for _ in 0..119 {
            rig.step(&mut player, Actions::default());
        }
        assert_eq!(player.combo, 3);
        rig.step(&mut player, Actions::default());
        assert_eq!(player.combo, 0);
    }

    #[test]
    fn test_combo_multiplier_caps() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        for _ in 0..12 {
            player.add_score(10, &t);
        }
        assert_eq!(player.add_score(10, &t), 100);
    }

    #[test]
    fn test_damage_invincibility_and_knockback() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        player.combo = 4;

        assert_eq!(player.take_damage(15.0, -1.0, &t), DamageOutcome::Applied);
        assert_eq!(player.hp, 85.0);
        assert_eq!(player.combo, 0);
        assert_eq!(player.invincible, 60);
        assert_eq!(player.body.vel, Vec2::new(-8.0, -6.0));
        assert_eq!(player.knockback_timer, 10);

        assert_eq!(player.take_damage(15.0, 1.0, &t), DamageOutcome::Ignored);
        assert_eq!(player.hp, 85.0);
    }

    #[test]
    fn test_shield_absorbs_flat_chunk() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        player.shield_timer = 100;
        assert_eq!(player.take_damage(99.0, 1.0, &t), DamageOutcome::Absorbed);
        assert_eq!(player.hp, 100.0);
        assert_eq!(player.shield_timer, 70);
        assert_eq!(player.invincible, 0);
    }

    #[test]
    fn test_hp_clamps_at_zero() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        player.take_damage(250.0, 0.0, &t);
        assert_eq!(player.hp, 0.0);
        assert!(player.is_dead());
        player.invincible = 0;
        assert_eq!(player.take_damage(10.0, 0.0, &t), DamageOutcome::Ignored);
        assert_eq!(player.hp, 0.0);
    }

    #[test]
    fn test_lands_on_platform_and_resets_jumps() {
        let mut rig = Rig::new();
        let mut player = Player::new(&rig.tuning);
        player.body.pos = Vec2::new(100.0, 240.0);
        player.jumps = 1;
        rig.platforms.push(Platform::new(80.0, 300.0, 200.0, 20.0, 0));

        for _ in 0..10 {
            rig.step(&mut player, Actions::default());
        }
        assert!(player.grounded);
        assert_eq!(player.jumps, 0);
        assert_eq!(player.body.pos.y, 250.0);
    }

    #[test]
    fn test_floor_and_wall_clamp() {
        let mut rig = Rig::new();
        let mut player = Player::new(&rig.tuning);
        player.body.pos = Vec2::new(2.0, 700.0);
        player.body.vel = Vec2::new(-20.0, 10.0);
        player.knockback_timer = 5;
        rig.step(&mut player, Actions::default());
        assert_eq!(player.body.pos.x, 0.0);
        assert_eq!(player.body.bottom(), 720.0);
        assert!(player.grounded);
    }

    #[test]
    fn test_steering_accelerates_to_form_speed() {
        let mut rig = Rig::new();
        let mut player = Player::new(&rig.tuning);
        let right = Actions {
            right: true,
            ..Default::default()
        };
        for _ in 0..20 {
            rig.step(&mut player, right);
        }
        assert_eq!(player.body.vel.x, 8.0);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_attack_hitbox_in_front() {
        let t = Tuning::default();
        let mut player = Player::new(&t);
        player.body.pos = Vec2::new(200.0, 300.0);
        player.facing = Facing::Left;
        assert!(player.attack(&t));
        let hb = player.active_hitbox().unwrap();
        assert_eq!(hb.pos, Vec2::new(155.0, 305.0));
        assert!(!player.attack(&t));
    }

    #[test]
    fn test_shard_pickup_effects() {
        let mut rig = Rig::new();
        let mut player = Player::new(&rig.tuning);
        player.body.pos = Vec2::new(300.0, 670.0);
        player.hp = 90.0;
        player.energy = 50.0;
        let at = Vec2::new(305.0, 690.0);
        rig.shards.push(Shard::new(at, ShardKind::Health, 15.0));
        rig.shards.push(Shard::new(at, ShardKind::Energy, 15.0));
        rig.shards.push(Shard::new(at, ShardKind::Token, 15.0));

        let tokens = rig.step(&mut player, Actions::default());
        assert_eq!(tokens, 1);
        assert_eq!(player.hp, 100.0);
        assert!((player.energy - 60.1).abs() < 1e-4);
        assert!(rig.shards.iter().all(|s| s.collected));
        assert_eq!(player.combo, 3);
        assert_eq!(player.score, 10 + 20 + 30);
        assert_eq!(rig.events.len(), 3);
    }

    #[test]
    fn test_energy_regen_never_exceeds_max() {
        let mut rig = Rig::new();
        let mut player = Player::new(&rig.tuning);
        player.energy = 99.95;
        rig.step(&mut player, Actions::default());
        assert_eq!(player.energy, 100.0);
    }
}
