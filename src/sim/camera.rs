//! Camera collaborator
//!
//! The world scrolls instead of the camera: `follow` reports how far the
//! world should shift left this tick and the orchestrator applies it.
//! Shake is a purely visual offset the renderer reads back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::rng::{Prng, streams};
use crate::tuning::CameraTuning;

/// What the simulation needs from a camera
pub trait CameraRig {
    /// Scroll amount for this tick given the target's box (0 when idle)
    fn follow(&mut self, target: &Aabb) -> f32;
    /// Request a shake of the given intensity
    fn shake(&mut self, intensity: f32);
    /// Per-tick decay
    fn update(&mut self);
}

/// Side-scrolling follow camera with trauma-style shake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowCamera {
    screen_width: f32,
    threshold: f32,
    lerp: f32,
    shake_decay: f32,
    shake_max: f32,
    /// Total distance scrolled so far
    pub world_x: f32,
    pub shake_intensity: f32,
    /// Renderer offset for the current frame
    pub shake_offset: Vec2,
    rng: Prng,
}

impl FollowCamera {
    pub fn new(tuning: &CameraTuning, screen_width: f32, seed: u64) -> Self {
        Self {
            screen_width,
            threshold: tuning.follow_threshold,
            lerp: tuning.lerp,
            shake_decay: tuning.shake_decay,
            shake_max: tuning.shake_max,
            world_x: 0.0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
            rng: Prng::stream(seed, streams::CAMERA),
        }
    }
}

impl CameraRig for FollowCamera {
    fn follow(&mut self, target: &Aabb) -> f32 {
        let desired = target.left() - self.screen_width * self.threshold;
        if desired > 0.0 {
            let dx = desired * self.lerp;
            self.world_x += dx;
            dx
        } else {
            0.0
        }
    }

    fn shake(&mut self, intensity: f32) {
        self.shake_intensity = (self.shake_intensity + intensity).min(self.shake_max);
    }

    fn update(&mut self) {
        if self.shake_intensity > 0.5 {
            self.shake_offset = Vec2::new(
                (self.rng.next_f32() - 0.5) * self.shake_intensity,
                (self.rng.next_f32() - 0.5) * self.shake_intensity,
            );
            self.shake_intensity *= self.shake_decay;
        } else {
            self.shake_intensity = 0.0;
            self.shake_offset = Vec2::ZERO;
        }
    }
}

/// Camera that never scrolls and ignores shake (headless tests, replays)
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCamera;

impl CameraRig for StaticCamera {
    fn follow(&mut self, _target: &Aabb) -> f32 {
        0.0
    }

    fn shake(&mut self, _intensity: f32) {}

    fn update(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> FollowCamera {
        FollowCamera::new(&CameraTuning::default(), 1280.0, 7)
    }

    #[test]
    fn test_follow_only_past_threshold() {
        let mut cam = camera();
        let behind = Aabb::from_xywh(400.0, 0.0, 30.0, 50.0);
        assert_eq!(cam.follow(&behind), 0.0);

        // threshold = 1280 * 0.4 = 512
        let ahead = Aabb::from_xywh(612.0, 0.0, 30.0, 50.0);
        let dx = cam.follow(&ahead);
        assert!((dx - 8.0).abs() < 1e-4);
        assert!((cam.world_x - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_shake_caps_and_decays() {
        let mut cam = camera();
        cam.shake(15.0);
        cam.shake(15.0);
        assert_eq!(cam.shake_intensity, 20.0);

        cam.update();
        assert!((cam.shake_intensity - 18.0).abs() < 1e-4);
        assert!(cam.shake_offset.x.abs() <= 10.0);

        for _ in 0..200 {
            cam.update();
        }
        assert_eq!(cam.shake_intensity, 0.0);
        assert_eq!(cam.shake_offset, Vec2::ZERO);
    }
}
