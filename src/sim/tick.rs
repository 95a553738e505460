//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Strict order:
//! actions, player, pickups and particles, enemies (reverse order so dead
//! ones can be dropped in place), boss, powers, kill rewards, camera scroll
//! with trimming and replenishment, clock, death check.

use glam::Vec2;

use super::abilities::{AbilityContext, FLOW_SURGE_BOOST};
use super::boss::{Boss, BossContext};
use super::camera::CameraRig;
use super::chakra::Color;
use super::events::GameEvent;
use super::input::TickInput;
use super::particles::Burst;
use super::player::{DamageOutcome, PlayerWorld};
use super::state::{GamePhase, GameState};
use super::terrain::{Shard, ShardKind};
use crate::consts::ABILITY_COUNT;

const HIT_COLOR: Color = Color(0xff4444);

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, camera: &mut dyn CameraRig) {
    state.events.clear();

    // Handle pause toggle
    match state.phase {
        GamePhase::Playing if input.pressed.pause => {
            state.phase = GamePhase::Paused;
            return;
        }
        GamePhase::Paused if input.pressed.pause || input.pressed.confirm => {
            state.phase = GamePhase::Playing;
        }
        _ => {}
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    handle_actions(state, input, camera);
    update_player(state, input);
    update_pickups(state);
    update_enemies(state, camera);
    update_boss(state, camera);
    update_powers(state, input, camera);
    reward_kills(state);

    camera.update();
    let dx = camera.follow(&state.player.rect());
    if dx > 0.0 {
        scroll_world(state, dx);
    }

    state.clock.advance();

    if state.player.is_dead() {
        let score = state.player.score;
        state.phase = GamePhase::GameOver;
        state.final_score = Some(score);
        state
            .particles
            .burst(Burst::Death, state.player.center(), state.player.form.main_color());
        camera.shake(15.0);
        state.events.push(GameEvent::PlayerDied { score });
        log::info!(
            "Game over in {} with score {} ({} tokens)",
            state.generator.location_label(),
            score,
            state.economy.tokens
        );
    }
}

/// Edge-triggered actions
fn handle_actions(state: &mut GameState, input: &TickInput, camera: &mut dyn CameraRig) {
    let t = &state.tuning;
    let player = &mut state.player;
    let pressed = &input.pressed;

    if pressed.jump && player.jump(t) {
        let feet = Vec2::new(player.center().x, player.body.bottom());
        state.particles.burst(Burst::Jump, feet, player.form.main_color());
        state.events.push(GameEvent::Jumped { pos: feet });
    }
    if pressed.dash && player.dash(t) {
        camera.shake(5.0);
        state.events.push(GameEvent::Dashed);
    }
    if pressed.switch_form {
        player.switch_form(t);
        state
            .particles
            .burst(Burst::SwitchForm, player.center(), player.form.glow_color());
        state.events.push(GameEvent::FormSwitched { form: player.form });
    }
    if pressed.attack && player.attack(t) {
        state.events.push(GameEvent::Attacked);
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let tokens = {
        let mut world = PlayerWorld {
            tuning: &state.tuning,
            platforms: &state.platforms,
            shards: &mut state.shards,
            fx: &mut state.particles,
            events: &mut state.events,
            frame: state.clock.frame,
            scale: state.clock.scale,
        };
        state.player.update(&input.held, &mut world)
    };
    if tokens > 0 {
        let amount = tokens * state.tuning.economy.shard_tokens;
        grant_tokens(state, amount);
    }
}

fn update_pickups(state: &mut GameState) {
    let s = &state.tuning.shard;
    for shard in state.shards.iter_mut() {
        shard.update(state.clock.frame, s.bob_amplitude, s.bob_speed);
    }
    state.shards.retain(|s| !s.collected);
    state.particles.update(state.clock.scale);
}

fn update_enemies(state: &mut GameState, camera: &mut dyn CameraRig) {
    let scale = state.clock.scale;
    let damage = state.tuning.player.attack_damage;

    for i in (0..state.enemies.len()).rev() {
        let hitbox = state.player.active_hitbox();
        let player_rect = state.player.rect();
        let invincible = state.player.invincible > 0;

        let enemy = &mut state.enemies[i];
        enemy.update(state.player.body.pos, &state.platforms, scale);

        // Player attack hits enemy
        if enemy.struck_by(hitbox) {
            enemy.hit_this_swing = true;
            enemy.take_damage(damage, state.player.facing.sign());
            state.particles.burst(Burst::Hit, enemy.body.center(), enemy.kind.color());
            state.events.push(GameEvent::EnemyHit {
                kind: enemy.kind,
                pos: enemy.body.center(),
                damage,
            });
            camera.shake(3.0);
        }
        if hitbox.is_none() {
            enemy.hit_this_swing = false;
        }

        // Contact damage
        let contact = enemy.touches_player(&player_rect, invincible).then(|| {
            let dir = if player_rect.left() < enemy.body.pos.x { -1.0 } else { 1.0 };
            (enemy.stats.contact_damage, dir)
        });
        let removable = enemy.is_removable();

        if let Some((amount, dir)) = contact {
            damage_player(state, amount, dir, camera, 6.0);
        }
        if removable {
            state.enemies.swap_remove(i);
        }
    }
}

fn update_boss(state: &mut GameState, camera: &mut dyn CameraRig) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    let mut ctx = BossContext {
        player: state.player.rect(),
        frame: state.clock.frame,
        scale: state.clock.scale,
        floor: state.tuning.screen.height,
        rng: &mut state.boss_rng,
        camera: &mut *camera,
        fx: &mut state.particles,
    };
    boss.update(&state.platforms, &mut ctx);

    let hitbox = state.player.active_hitbox();
    if boss.core.struck_by(hitbox) {
        boss.core.hit_this_swing = true;
        let hit = boss.take_damage(state.tuning.player.attack_damage);
        if hit.applied {
            state.particles.burst(Burst::Hit, boss.core.center(), boss.core.color());
            state.events.push(GameEvent::BossHit {
                kind: boss.kind(),
                hp: boss.core.hp,
            });
            camera.shake(4.0);
        }
        if let Some(phase) = hit.phase_changed {
            state.events.push(GameEvent::BossPhaseChanged {
                kind: boss.kind(),
                phase,
            });
            log::info!("{:?} enters phase {}", boss.kind(), phase);
        }
    }
    if hitbox.is_none() {
        boss.core.hit_this_swing = false;
    }

    if boss.is_defeated() {
        if let Some(boss) = state.boss.take() {
            defeat_boss(state, boss, camera);
        }
        return;
    }

    let player_rect = state.player.rect();
    let invincible = state.player.invincible > 0;
    let dir = if player_rect.left() < boss.core.body.pos.x { -1.0 } else { 1.0 };
    let contact = boss.contact_damage(&player_rect, invincible);
    let hazard = boss.hazard_damage(&player_rect, invincible);

    if let Some(amount) = contact {
        damage_player(state, amount, dir, camera, 8.0);
    }
    if let Some(amount) = hazard {
        damage_player(state, amount, dir, camera, 4.0);
    }
}

fn defeat_boss(state: &mut GameState, mut boss: Boss, camera: &mut dyn CameraRig) {
    let world = boss.core.world;
    boss.on_defeat(&mut state.particles);
    camera.shake(20.0);

    state.player.add_score(boss.core.score, &state.tuning);
    let bounty = state.tuning.economy.boss_tokens;
    grant_tokens(state, bounty);

    if state.abilities.unlock(world) {
        state.events.push(GameEvent::AbilityUnlocked { slot: world });
    }
    state.events.push(GameEvent::BossDefeated {
        kind: boss.kind(),
        world,
    });
    log::info!("{:?} defeated in {}", boss.kind(), state.generator.location_label());

    state.generator.advance_world();
    state.platforms_generated = 0;
    state.events.push(GameEvent::WorldEntered {
        world: state.generator.world,
        ng_plus: state.generator.ng_plus,
    });
}

fn update_powers(state: &mut GameState, input: &TickInput, camera: &mut dyn CameraRig) {
    for slot in 0..ABILITY_COUNT {
        if !input.pressed.powers[slot] {
            continue;
        }
        let mut ctx = AbilityContext {
            player: &mut state.player,
            enemies: &mut state.enemies,
            fx: &mut state.particles,
            camera: &mut *camera,
            clock: &mut state.clock,
            events: &mut state.events,
        };
        state.abilities.activate(slot, &mut ctx, &state.tuning);
    }
    state.abilities.update();
    state.player.apply_flow_surge(FLOW_SURGE_BOOST);
}

/// Score, tokens and drops for every enemy that died this tick, however it died
fn reward_kills(state: &mut GameState) {
    let t = &state.tuning;
    let mut tokens = 0;

    for enemy in state.enemies.iter_mut() {
        if !enemy.dead || enemy.rewarded {
            continue;
        }
        enemy.rewarded = true;

        let pos = enemy.body.center();
        let score = state.player.add_score(enemy.stats.score, t);
        state.events.push(GameEvent::EnemyKilled {
            kind: enemy.kind,
            pos,
            score,
            combo: state.player.combo,
        });
        state.particles.burst(Burst::Explosion, pos, enemy.kind.color());
        tokens += t.economy.kill_tokens;

        if state.drop_rng.chance(t.shard.drop_chance) {
            let kind = if state.drop_rng.chance(t.shard.drop_energy_chance) {
                ShardKind::Energy
            } else {
                ShardKind::Health
            };
            let drop_pos = Vec2::new(pos.x, enemy.body.pos.y);
            state.shards.push(Shard::new(drop_pos, kind, t.shard.size));
            state.events.push(GameEvent::ShardDropped { kind, pos: drop_pos });
        }
    }

    if tokens > 0 {
        grant_tokens(state, tokens);
    }
}

fn damage_player(
    state: &mut GameState,
    amount: f32,
    dir: f32,
    camera: &mut dyn CameraRig,
    shake: f32,
) {
    match state.player.take_damage(amount, dir, &state.tuning) {
        DamageOutcome::Applied => {
            camera.shake(shake);
            state.particles.burst(Burst::Hit, state.player.center(), HIT_COLOR);
            state.events.push(GameEvent::PlayerDamaged {
                amount,
                hp: state.player.hp,
            });
        }
        DamageOutcome::Absorbed => state.events.push(GameEvent::ShieldAbsorbed),
        DamageOutcome::Ignored => {}
    }
}

fn grant_tokens(state: &mut GameState, amount: u32) {
    let gained = state.economy.add_tokens(amount);
    if gained > 0 {
        state.events.push(GameEvent::TokensEarned {
            amount: gained,
            total: state.economy.tokens,
        });
    }
}

/// Shift every entity left by `dx`, trim what fell off the trailing edge and
/// stream replacements. Returns the number of platforms replaced.
pub fn scroll_world(state: &mut GameState, dx: f32) -> usize {
    state.player.body.shift_x(dx);
    for platform in state.platforms.iter_mut() {
        platform.rect.pos.x -= dx;
    }
    for shard in state.shards.iter_mut() {
        shard.pos.x -= dx;
    }
    for enemy in state.enemies.iter_mut() {
        enemy.shift(dx);
    }
    if let Some(boss) = state.boss.as_mut() {
        boss.shift(dx);
    }
    state.particles.shift(dx, 0.0);
    state.generator.shift(dx);

    // Platforms are ordered, so everything off-screen is a prefix
    let cutoff = state.tuning.platform.platform_cutoff;
    let trimmed = state
        .platforms
        .iter()
        .take_while(|p| p.right() < cutoff)
        .count();
    if trimmed > 0 {
        state.platforms.drain(..trimmed);
        for _ in 0..trimmed {
            add_next_platform(state);
        }
    }

    maybe_spawn_boss(state);

    let entity_cutoff = state.tuning.platform.entity_cutoff;
    state
        .shards
        .retain(|s| s.pos.x > entity_cutoff && !s.collected);
    state.enemies.retain(|e| e.body.pos.x > entity_cutoff);

    trimmed
}

/// Stream one platform and advance the room on schedule
pub fn add_next_platform(state: &mut GameState) {
    let next = state.generator.generate_next_platform();
    state.platforms.push(next.platform);
    state.shards.extend(next.shard);
    state.enemies.extend(next.enemy);
    state.platforms_generated += 1;

    let every = state.tuning.platform.room_advance_every.max(1);
    if state.platforms_generated % every == 0
        && state.boss.is_none()
        && !state.generator.is_boss_room()
    {
        let world_changed = state.generator.advance_room();
        state.platforms_generated = 0;
        if world_changed {
            state.events.push(GameEvent::WorldEntered {
                world: state.generator.world,
                ng_plus: state.generator.ng_plus,
            });
        } else {
            state.events.push(GameEvent::RoomAdvanced {
                world: state.generator.world,
                room: state.generator.room,
            });
        }
    }
}

fn maybe_spawn_boss(state: &mut GameState) {
    if state.boss.is_some()
        || !state.generator.is_boss_room()
        || state.platforms_generated <= state.tuning.platform.boss_after_platforms
    {
        return;
    }
    let world = state.generator.world;
    let pos = Vec2::new(
        state.player.body.pos.x + state.tuning.screen.width * 0.6,
        state.tuning.screen.height - 200.0,
    );
    let boss = Boss::spawn(world, pos);
    log::info!(
        "{} awakens in {}",
        super::chakra::chakra(world).boss_name,
        state.generator.location_label()
    );
    state.events.push(GameEvent::BossSpawned {
        kind: boss.kind(),
        world,
    });
    state.boss = Some(boss);
}
