//! Procedural level generation
//!
//! A state machine over (world, room). Rooms are built from a queue of
//! shaped segments; during play, single platforms are streamed at the
//! cursor independently of that queue. Every random choice goes through the
//! generator's own seeded stream, so a seed always yields the same level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chakra::{Chakra, chakra};
use super::enemy::{Enemy, EnemyKind};
use super::geometry::Facing;
use super::rng::{Prng, streams};
use super::terrain::{Platform, Shard, ShardKind};
use crate::consts::{NG_PLUS_DIFFICULTY_STEP, WORLD_COUNT};
use crate::tuning::{PlatformTuning, RunModifiers, ShardTuning, Tuning};

/// Segment shape policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Flat,
    Ascend,
    Descend,
    Gaps,
    Mixed,
    /// Wide contiguous floor for boss fights
    Arena,
}

impl SegmentKind {
    /// Shapes available to normal rooms
    pub const NORMAL: [SegmentKind; 5] = [
        SegmentKind::Flat,
        SegmentKind::Ascend,
        SegmentKind::Descend,
        SegmentKind::Gaps,
        SegmentKind::Mixed,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub length: u32,
}

/// Initial content of a room
#[derive(Debug, Clone, Default)]
pub struct RoomBatch {
    pub platforms: Vec<Platform>,
    pub shards: Vec<Shard>,
    pub enemies: Vec<Enemy>,
}

/// One streamed platform with its optional pickup and enemy
#[derive(Debug, Clone)]
pub struct NextPlatform {
    pub platform: Platform,
    pub shard: Option<Shard>,
    pub enemy: Option<Enemy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelGenerator {
    rng: Prng,
    /// Chakra index, 0..7
    pub world: usize,
    /// Room within the world, 0-based
    pub room: u32,
    pub ng_plus: u32,
    pub difficulty: f32,
    /// Right edge and top of the last platform placed
    cursor: Vec2,
    pub platforms_in_room: u32,
    modifiers: RunModifiers,
    platform: PlatformTuning,
    shard: ShardTuning,
    screen_height: f32,
}

impl LevelGenerator {
    pub fn new(seed: u64, tuning: &Tuning, modifiers: &RunModifiers) -> Self {
        Self {
            rng: Prng::stream(seed, streams::LEVEL),
            world: 0,
            room: 0,
            ng_plus: 0,
            difficulty: 1.0,
            cursor: Vec2::new(0.0, tuning.screen.height - 150.0),
            platforms_in_room: 0,
            modifiers: modifiers.clone(),
            platform: tuning.platform.clone(),
            shard: tuning.shard.clone(),
            screen_height: tuning.screen.height,
        }
    }

    pub fn world_data(&self) -> &'static Chakra {
        chakra(self.world)
    }

    pub fn total_rooms(&self) -> u32 {
        self.world_data().rooms
    }

    /// The last room of each world hosts its boss
    pub fn is_boss_room(&self) -> bool {
        self.room + 1 >= self.total_rooms()
    }

    /// e.g. `MULADHARA 2/4 NG+1`
    pub fn location_label(&self) -> String {
        let world = self.world_data();
        let mut label = format!(
            "{} {}/{}",
            world.name.to_uppercase(),
            self.room + 1,
            self.total_rooms()
        );
        if self.ng_plus > 0 {
            label.push_str(&format!(" NG+{}", self.ng_plus));
        }
        label
    }

    /// Cursor x (right edge of the newest platform)
    pub fn cursor_x(&self) -> f32 {
        self.cursor.x
    }

    /// Follow the world scroll
    pub fn shift(&mut self, dx: f32) {
        self.cursor.x -= dx;
    }

    /// Build the opening batch for the current room
    pub fn generate_room(&mut self) -> RoomBatch {
        self.platforms_in_room = 0;
        self.cursor = Vec2::new(0.0, self.screen_height - 150.0);

        let mut batch = RoomBatch::default();
        for segment in self.plan_segments() {
            self.build_segment(segment, &mut batch);
        }
        log::debug!(
            "Generated {} with {} platforms, {} shards, {} enemies",
            self.location_label(),
            batch.platforms.len(),
            batch.shards.len(),
            batch.enemies.len()
        );
        batch
    }

    fn plan_segments(&mut self) -> Vec<Segment> {
        let mut remaining = self.platform.room_length;
        if self.is_boss_room() {
            return vec![Segment {
                kind: SegmentKind::Arena,
                length: remaining,
            }];
        }

        let mut segments = Vec::new();
        while remaining > 0 {
            let kind = self
                .rng
                .pick(&SegmentKind::NORMAL)
                .copied()
                .unwrap_or(SegmentKind::Flat);
            let length = self
                .rng
                .int_inclusive(self.platform.segment_min_len, self.platform.segment_max_len)
                .min(remaining)
                .max(1);
            segments.push(Segment { kind, length });
            remaining -= length;
        }
        segments
    }

    fn build_segment(&mut self, segment: Segment, batch: &mut RoomBatch) {
        let diff = self.difficulty;
        let width_bonus = self.modifiers.platform_width_bonus();
        let variance = self.modifiers.height_variance();
        let arena = segment.kind == SegmentKind::Arena;

        for i in 0..segment.length {
            self.platforms_in_room += 1;

            let (gap, width, y_shift) = match segment.kind {
                SegmentKind::Flat => (
                    self.rng.range(60.0, 100.0) * diff,
                    self.rng.range(150.0, 250.0) * width_bonus,
                    self.rng.range(-20.0, 20.0),
                ),
                SegmentKind::Ascend => (
                    self.rng.range(50.0, 90.0) * diff,
                    self.rng.range(120.0, 200.0) * width_bonus,
                    -self.rng.range(30.0, 70.0),
                ),
                SegmentKind::Descend => (
                    self.rng.range(60.0, 120.0) * diff,
                    self.rng.range(130.0, 220.0) * width_bonus,
                    self.rng.range(30.0, 70.0),
                ),
                SegmentKind::Gaps => (
                    self.rng.range(100.0, 180.0) * diff,
                    self.rng.range(80.0, 140.0) * width_bonus,
                    self.rng.range(-40.0, 40.0),
                ),
                SegmentKind::Mixed => (
                    self.rng.range(60.0, 140.0) * diff,
                    self.rng.range(120.0, 220.0) * width_bonus,
                    self.rng.range(-60.0, 60.0),
                ),
                SegmentKind::Arena => (0.0, self.rng.range(300.0, 500.0), 0.0),
            };

            let lead = if i == 0 && !arena {
                self.platform.segment_lead_gap
            } else {
                gap
            };
            let x = self.cursor.x + lead;
            let y = self.clamp_y(self.cursor.y + y_shift * variance);
            let platform = Platform::new(x, y, width, self.platform.height, self.world);

            if let Some(shard) = self.roll_shard(&platform) {
                batch.shards.push(shard);
            }

            let chance = self.platform.enemy_chance_segment * self.modifiers.enemy_density() * diff;
            let roll = self.rng.next_f32();
            if roll < chance && width > self.platform.enemy_min_width && !arena {
                batch.enemies.push(self.spawn_enemy(&platform));
            }

            self.cursor = Vec2::new(platform.right(), y);
            batch.platforms.push(platform);
        }
    }

    /// Stream one platform at the cursor
    pub fn generate_next_platform(&mut self) -> NextPlatform {
        let diff = self.difficulty;
        let p = &self.platform;
        let (min_gap, max_gap, min_w, max_w, jitter) =
            (p.min_gap, p.max_gap, p.min_width, p.max_width, p.y_jitter);

        let gap = self.rng.range(min_gap, max_gap) * diff;
        let width = self.rng.range(min_w, max_w) * self.modifiers.platform_width_bonus();
        let y_shift = self.rng.range(-jitter, jitter) * self.modifiers.height_variance();
        let y = self.clamp_y(self.cursor.y + y_shift);
        let x = self.cursor.x + gap;

        let platform = Platform::new(x, y, width, self.platform.height, self.world);
        self.cursor = Vec2::new(platform.right(), y);
        self.platforms_in_room += 1;

        let shard = self.roll_shard(&platform);

        let chance = self.platform.enemy_chance_stream * diff * self.modifiers.enemy_density();
        let roll = self.rng.next_f32();
        let enemy = (roll < chance && width > self.platform.enemy_min_width)
            .then(|| self.spawn_enemy(&platform));

        NextPlatform {
            platform,
            shard,
            enemy,
        }
    }

    /// Jump to a starting location; the room is clamped to the world's boss room
    pub fn start_at(&mut self, world: usize, room: u32) {
        self.world = world % WORLD_COUNT;
        self.room = room.min(self.total_rooms() - 1);
        self.platforms_in_room = 0;
    }

    /// Move to the next room. Returns true when that crossed into a new world.
    pub fn advance_room(&mut self) -> bool {
        self.room += 1;
        self.platforms_in_room = 0;
        if self.room >= self.total_rooms() {
            return self.advance_world();
        }
        log::debug!("Entering {}", self.location_label());
        false
    }

    /// Move to the next world, wrapping into New Game Plus after the seventh
    pub fn advance_world(&mut self) -> bool {
        self.world += 1;
        self.room = 0;
        self.platforms_in_room = 0;
        if self.world >= WORLD_COUNT {
            self.world = 0;
            self.ng_plus += 1;
            self.difficulty = 1.0 + self.ng_plus as f32 * NG_PLUS_DIFFICULTY_STEP;
            log::info!(
                "New Game Plus {} (difficulty x{:.1})",
                self.ng_plus,
                self.difficulty
            );
        }
        log::info!("Entering {}", self.world_data().name);
        true
    }

    fn clamp_y(&self, y: f32) -> f32 {
        let max_y = (self.screen_height - self.platform.floor_margin).max(self.platform.min_y);
        y.clamp(self.platform.min_y, max_y)
    }

    /// Nested rolls: token is rarest, then health, energy otherwise
    fn roll_shard(&mut self, platform: &Platform) -> Option<Shard> {
        let spawn = self.shard.spawn_chance * self.modifiers.shard_spawn_rate();
        if self.rng.next_f32() >= spawn {
            return None;
        }
        let kind = if self.rng.next_f32() < self.shard.token_chance * self.modifiers.token_drop_mult() {
            ShardKind::Token
        } else if self.rng.next_f32() < self.shard.health_chance * self.modifiers.health_drop_rate() {
            ShardKind::Health
        } else {
            ShardKind::Energy
        };
        let rect = &platform.rect;
        let pos = Vec2::new(rect.left() + rect.size.x * 0.5, rect.top() - 40.0);
        Some(Shard::new(pos, kind, self.shard.size))
    }

    fn spawn_enemy(&mut self, platform: &Platform) -> Enemy {
        let palette = self.world_data().enemy_types;
        let kind = self
            .rng
            .pick(palette)
            .copied()
            .unwrap_or(EnemyKind::Light);
        let facing = if self.rng.chance(0.5) {
            Facing::Right
        } else {
            Facing::Left
        };
        let rect = &platform.rect;
        let pos = Vec2::new(rect.left() + rect.size.x * 0.3, rect.top() - 60.0);
        Enemy::new(kind, pos, facing, &self.modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> LevelGenerator {
        LevelGenerator::new(seed, &Tuning::default(), &RunModifiers::default())
    }

    fn fingerprint(batch: &RoomBatch) -> Vec<(f32, f32, f32)> {
        batch
            .platforms
            .iter()
            .map(|p| (p.rect.pos.x, p.rect.pos.y, p.rect.size.x))
            .collect()
    }

    #[test]
    fn test_same_seed_same_level() {
        let mut a = generator(1234);
        let mut b = generator(1234);
        let ra = a.generate_room();
        let rb = b.generate_room();
        assert_eq!(fingerprint(&ra), fingerprint(&rb));
        assert_eq!(ra.shards.len(), rb.shards.len());
        assert_eq!(ra.enemies.len(), rb.enemies.len());
        for _ in 0..50 {
            let na = a.generate_next_platform();
            let nb = b.generate_next_platform();
            assert_eq!(na.platform, nb.platform);
            assert_eq!(na.shard.map(|s| s.pos), nb.shard.map(|s| s.pos));
            assert_eq!(na.enemy.map(|e| e.body.pos), nb.enemy.map(|e| e.body.pos));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let ra = generator(1).generate_room();
        let rb = generator(2).generate_room();
        assert_ne!(fingerprint(&ra), fingerprint(&rb));
    }

    #[test]
    fn test_room_has_target_length_and_band() {
        let mut level = generator(99);
        let room = level.generate_room();
        assert_eq!(room.platforms.len(), 25);
        assert_eq!(level.platforms_in_room, 25);
        for p in &room.platforms {
            assert!(p.rect.top() >= 180.0 && p.rect.top() <= 600.0);
        }
        // Platforms march rightwards
        for pair in room.platforms.windows(2) {
            assert!(pair[1].rect.left() >= pair[0].right());
        }
    }

    #[test]
    fn test_enemies_only_on_wide_platforms_from_palette() {
        let mut level = generator(7);
        let palette = level.world_data().enemy_types;
        for _ in 0..300 {
            let next = level.generate_next_platform();
            if let Some(enemy) = next.enemy {
                assert!(next.platform.rect.size.x > 100.0);
                assert!(palette.contains(&enemy.kind));
            }
        }
    }

    #[test]
    fn test_boss_room_is_single_arena() {
        let mut level = generator(5);
        while !level.is_boss_room() {
            assert!(!level.advance_room());
        }
        assert_eq!(level.room, 3);
        let room = level.generate_room();
        assert_eq!(room.platforms.len(), 25);
        assert!(room.enemies.is_empty());
        // Contiguous floor
        for pair in room.platforms.windows(2) {
            assert_eq!(pair[1].rect.left(), pair[0].right());
            assert_eq!(pair[1].rect.top(), pair[0].rect.top());
        }
    }

    #[test]
    fn test_advance_room_past_end_enters_next_world() {
        let mut level = generator(5);
        for _ in 0..3 {
            assert!(!level.advance_room());
        }
        assert!(level.advance_room());
        assert_eq!(level.world, 1);
        assert_eq!(level.room, 0);
    }

    #[test]
    fn test_ng_plus_wraps_and_scales_difficulty() {
        let mut level = generator(5);
        for _ in 0..7 {
            level.advance_world();
        }
        assert_eq!(level.world, 0);
        assert_eq!(level.ng_plus, 1);
        assert_eq!(level.difficulty, 1.5);
        assert_eq!(level.location_label(), "MULADHARA 1/4 NG+1");
    }

    #[test]
    fn test_location_label() {
        let mut level = generator(5);
        level.advance_room();
        assert_eq!(level.location_label(), "MULADHARA 2/4");
    }

    #[test]
    fn test_modifiers_widen_platforms() {
        let mods = RunModifiers {
            platform_width_bonus: Some(1.5),
            ..Default::default()
        };
        let mut level = LevelGenerator::new(3, &Tuning::default(), &mods);
        for _ in 0..100 {
            let w = level.generate_next_platform().platform.rect.size.x;
            assert!((180.0..330.0).contains(&w));
        }
    }

    #[test]
    fn test_no_shards_when_spawn_rate_zero() {
        let mods = RunModifiers {
            shard_spawn_rate: Some(0.0),
            ..Default::default()
        };
        let mut level = LevelGenerator::new(3, &Tuning::default(), &mods);
        let room = level.generate_room();
        assert!(room.shards.is_empty());
    }
}
