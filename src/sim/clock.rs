//! Simulation clock and slow-motion time scale

use serde::{Deserialize, Serialize};

/// Frame counter plus the integration scale.
///
/// The tick count itself never stretches: slow motion only shrinks the
/// per-tick movement, timers still count whole ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    /// Ticks since the run started
    pub frame: u64,
    /// Integration multiplier (1.0 = normal speed)
    pub scale: f32,
    /// Ticks of slow motion left
    pub slow_ticks: u32,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            frame: 0,
            scale: 1.0,
            slow_ticks: 0,
        }
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_slow_motion(&mut self, scale: f32, ticks: u32) {
        self.scale = scale;
        self.slow_ticks = ticks;
    }

    pub fn is_slowed(&self) -> bool {
        self.slow_ticks > 0
    }

    /// End-of-tick bookkeeping
    pub fn advance(&mut self) {
        self.frame += 1;
        if self.slow_ticks > 0 {
            self.slow_ticks -= 1;
            if self.slow_ticks == 0 {
                self.scale = 1.0;
            }
        }
    }
}
