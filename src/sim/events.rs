//! Outbound domain events
//!
//! The simulation records what happened during a tick; audio, HUD and
//! notification layers drain the queue afterwards and never write back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::BossKind;
use super::enemy::EnemyKind;
use super::player::ZodiacForm;
use super::terrain::ShardKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped {
        pos: Vec2,
    },
    Dashed,
    Attacked,
    FormSwitched {
        form: ZodiacForm,
    },
    EnemyHit {
        kind: EnemyKind,
        pos: Vec2,
        damage: f32,
    },
    EnemyKilled {
        kind: EnemyKind,
        pos: Vec2,
        /// Points awarded after the combo multiplier
        score: u64,
        combo: u32,
    },
    ShardCollected {
        kind: ShardKind,
        pos: Vec2,
    },
    ShardDropped {
        kind: ShardKind,
        pos: Vec2,
    },
    PlayerDamaged {
        amount: f32,
        hp: f32,
    },
    ShieldAbsorbed,
    BossSpawned {
        kind: BossKind,
        world: usize,
    },
    BossHit {
        kind: BossKind,
        hp: f32,
    },
    BossPhaseChanged {
        kind: BossKind,
        phase: u8,
    },
    BossDefeated {
        kind: BossKind,
        world: usize,
    },
    AbilityActivated {
        slot: usize,
    },
    AbilityUnlocked {
        slot: usize,
    },
    TokensEarned {
        amount: u32,
        total: u32,
    },
    RoomAdvanced {
        world: usize,
        room: u32,
    },
    WorldEntered {
        world: usize,
        ng_plus: u32,
    },
    PlayerDied {
        score: u64,
    },
}

/// Per-tick event buffer (cleared at the start of every tick)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Hand every pending event to the caller
    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
