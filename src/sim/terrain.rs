//! Platforms and collectible shards

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chakra::{Color, chakra};
use super::geometry::Aabb;

/// A solid platform; only its top band is collidable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Aabb,
    /// World whose palette this platform uses
    pub theme: usize,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, theme: usize) -> Self {
        Self {
            rect: Aabb::from_xywh(x, y, width, height),
            theme,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.rect.right()
    }

    pub fn color(&self) -> Color {
        chakra(self.theme).platform_color
    }

    pub fn glow(&self) -> Color {
        chakra(self.theme).glow
    }
}

/// Surfaces iterator for the shared landing routine
pub fn surfaces(platforms: &[Platform]) -> impl Iterator<Item = &Aabb> {
    platforms.iter().map(|p| &p.rect)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShardKind {
    /// Refills chakra energy
    Energy,
    Health,
    /// Star token for the meta economy
    Token,
}

impl ShardKind {
    pub fn color(self) -> Color {
        match self {
            ShardKind::Energy => Color(0xffe600),
            ShardKind::Health => Color(0x4ade80),
            ShardKind::Token => Color(0xf5c542),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shard {
    pub pos: Vec2,
    /// Rest height the bob oscillates around
    pub base_y: f32,
    pub size: f32,
    pub kind: ShardKind,
    pub collected: bool,
    pub float_offset: f32,
}

impl Shard {
    pub fn new(pos: Vec2, kind: ShardKind, size: f32) -> Self {
        Self {
            pos,
            base_y: pos.y,
            size,
            kind,
            collected: false,
            // Spread bob phases without consuming randomness
            float_offset: (pos.x * 0.137).rem_euclid(std::f32::consts::TAU),
        }
    }

    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }

    /// Gentle vertical bob while uncollected
    pub fn update(&mut self, frame: u64, amplitude: f32, speed: f32) {
        if self.collected {
            return;
        }
        let phase = frame as f32 * speed + self.float_offset;
        self.pos.y = self.base_y + phase.sin() * amplitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_bob_stays_within_amplitude() {
        let mut shard = Shard::new(Vec2::new(123.0, 200.0), ShardKind::Energy, 15.0);
        for frame in 0..200 {
            shard.update(frame, 6.0, 0.1);
            assert!((shard.pos.y - 200.0).abs() <= 6.0 + 1e-4);
        }
    }

    #[test]
    fn test_collected_shard_stops_bobbing() {
        let mut shard = Shard::new(Vec2::new(0.0, 100.0), ShardKind::Token, 15.0);
        shard.collected = true;
        shard.update(37, 6.0, 0.1);
        assert_eq!(shard.pos.y, 100.0);
    }

    #[test]
    fn test_platform_theme_color() {
        let p = Platform::new(0.0, 300.0, 150.0, 20.0, 9);
        assert_eq!(p.color(), chakra(2).platform_color);
        assert_eq!(p.right(), 150.0);
    }
}
