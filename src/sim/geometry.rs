//! Collision primitives shared by the player, enemies and bosses
//!
//! Everything here works in screen space with +y pointing down. Overlap
//! tests are strict, so rectangles that only touch edges do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::LANDING_TOLERANCE;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Closest point inside the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.pos, self.pos + self.size)
    }

    /// Distance from `p` to the farthest corner
    pub fn farthest_distance(&self, p: Vec2) -> f32 {
        let far_x = if p.x < self.center().x { self.right() } else { self.left() };
        let far_y = if p.y < self.center().y { self.bottom() } else { self.top() };
        p.distance(Vec2::new(far_x, far_y))
    }
}

/// Circle vs rectangle overlap
pub fn circle_hits_aabb(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    center.distance_squared(rect.clamp_point(center)) < radius * radius
}

/// Thin expanding ring vs rectangle: true when the ring's band crosses the rectangle
pub fn ring_hits_aabb(center: Vec2, radius: f32, band: f32, rect: &Aabb) -> bool {
    let near = center.distance(rect.clamp_point(center));
    let far = rect.farthest_distance(center);
    near <= radius + band && far >= radius - band
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Face toward a horizontal delta (zero or negative faces left)
    pub fn toward(dx: f32) -> Self {
        if dx > 0.0 { Facing::Right } else { Facing::Left }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Position, velocity and extent of a physics entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Advance position by velocity; `scale` is the slow-motion factor
    #[inline]
    pub fn integrate(&mut self, scale: f32) {
        self.pos += self.vel * scale;
    }

    /// Would this body land on `surface` this tick?
    ///
    /// Horizontal overlap, feet inside the surface's top band, and not moving up.
    pub fn lands_on(&self, surface: &Aabb) -> bool {
        let bottom = self.bottom();
        self.pos.x < surface.right()
            && self.pos.x + self.size.x > surface.left()
            && bottom > surface.top()
            && bottom < surface.bottom() + LANDING_TOLERANCE
            && self.vel.y >= 0.0
    }

    /// Snap onto every surface whose top band the feet entered. Returns true if grounded.
    pub fn land<'a>(&mut self, surfaces: impl IntoIterator<Item = &'a Aabb>) -> bool {
        let mut grounded = false;
        for surface in surfaces {
            if self.lands_on(surface) {
                grounded = true;
                self.vel.y = 0.0;
                self.pos.y = surface.top() - self.size.y;
            }
        }
        grounded
    }

    pub fn shift_x(&mut self, dx: f32) {
        self.pos.x -= dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let touching = Aabb::from_xywh(10.0, 0.0, 10.0, 10.0);
        let inside = Aabb::from_xywh(5.0, 5.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_landing_snaps_to_top() {
        let platform = Aabb::from_xywh(0.0, 300.0, 200.0, 20.0);
        let mut body = Body::new(Vec2::new(50.0, 255.0), Vec2::new(30.0, 50.0));
        body.vel.y = 4.0;
        assert!(body.land([&platform]));
        assert_eq!(body.pos.y, 250.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_rising_body_passes_through() {
        let platform = Aabb::from_xywh(0.0, 300.0, 200.0, 20.0);
        let mut body = Body::new(Vec2::new(50.0, 255.0), Vec2::new(30.0, 50.0));
        body.vel.y = -10.0;
        assert!(!body.land([&platform]));
        assert_eq!(body.pos.y, 255.0);
    }

    #[test]
    fn test_feet_below_band_do_not_land() {
        let platform = Aabb::from_xywh(0.0, 300.0, 200.0, 20.0);
        // Feet at 345: below top + height + tolerance (340)
        let body = Body {
            pos: Vec2::new(50.0, 295.0),
            vel: Vec2::new(0.0, 2.0),
            size: Vec2::new(30.0, 50.0),
        };
        assert!(!body.lands_on(&platform));
    }

    #[test]
    fn test_circle_and_ring_hits() {
        let rect = Aabb::from_xywh(100.0, 0.0, 20.0, 20.0);
        assert!(circle_hits_aabb(Vec2::new(95.0, 10.0), 8.0, &rect));
        assert!(!circle_hits_aabb(Vec2::new(80.0, 10.0), 8.0, &rect));

        let origin = Vec2::new(0.0, 10.0);
        assert!(ring_hits_aabb(origin, 105.0, 4.0, &rect));
        assert!(!ring_hits_aabb(origin, 60.0, 4.0, &rect));
        assert!(!ring_hits_aabb(origin, 200.0, 4.0, &rect));
    }
}
