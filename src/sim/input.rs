//! Per-tick input snapshot
//!
//! The input collaborator samples devices once per tick and hands the core
//! both the held state and the edge-triggered presses.

use serde::{Deserialize, Serialize};

use crate::consts::ABILITY_COUNT;

/// Action booleans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub attack: bool,
    pub dash: bool,
    pub switch_form: bool,
    pub pause: bool,
    pub confirm: bool,
    /// Chakra power slots 1-7
    pub powers: [bool; ABILITY_COUNT],
}

impl Actions {
    /// Actions set in `self` but not in `prev`
    pub fn rising_from(&self, prev: &Actions) -> Actions {
        let mut powers = [false; ABILITY_COUNT];
        for (i, p) in powers.iter_mut().enumerate() {
            *p = self.powers[i] && !prev.powers[i];
        }
        Actions {
            left: self.left && !prev.left,
            right: self.right && !prev.right,
            up: self.up && !prev.up,
            down: self.down && !prev.down,
            jump: self.jump && !prev.jump,
            attack: self.attack && !prev.attack,
            dash: self.dash && !prev.dash,
            switch_form: self.switch_form && !prev.switch_form,
            pause: self.pause && !prev.pause,
            confirm: self.confirm && !prev.confirm,
            powers,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Currently held
    pub held: Actions,
    /// Pressed this tick
    pub pressed: Actions,
}

impl TickInput {
    /// Build from two consecutive held snapshots
    pub fn from_frames(prev: &Actions, now: &Actions) -> Self {
        Self {
            held: *now,
            pressed: now.rising_from(prev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_detection() {
        let prev = Actions {
            jump: true,
            ..Default::default()
        };
        let mut now = Actions {
            jump: true,
            dash: true,
            ..Default::default()
        };
        now.powers[3] = true;

        let input = TickInput::from_frames(&prev, &now);
        assert!(input.held.jump);
        assert!(!input.pressed.jump);
        assert!(input.pressed.dash);
        assert!(input.pressed.powers[3]);
        assert!(!input.pressed.powers[0]);
    }
}
