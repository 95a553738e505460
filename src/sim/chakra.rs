//! Static world data: the seven chakra worlds
//!
//! Looked up by world index modulo 7 so New Game Plus wraps cleanly.

use serde::{Deserialize, Serialize};

use super::boss::BossKind;
use super::enemy::EnemyKind;
use crate::consts::WORLD_COUNT;

/// Packed 0xRRGGBB color handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);

    pub fn rgb(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Earth,
    Water,
    Fire,
    Air,
    Ether,
    Light,
    Cosmic,
}

/// One world's reference data
#[derive(Debug)]
pub struct Chakra {
    pub index: usize,
    pub name: &'static str,
    pub short_name: &'static str,
    pub color: Color,
    pub glow: Color,
    pub platform_color: Color,
    /// Resonant frequency (Hz)
    pub frequency: u32,
    pub element: Element,
    /// Name of the power unlocked by clearing this world
    pub power: &'static str,
    pub enemy_types: &'static [EnemyKind],
    pub boss: BossKind,
    pub boss_name: &'static str,
    pub rooms: u32,
}

use EnemyKind::{Flying, Heavy, Light};

pub static CHAKRAS: [Chakra; WORLD_COUNT] = [
    Chakra {
        index: 0,
        name: "Muladhara",
        short_name: "Root",
        color: Color(0xff0000),
        glow: Color(0xff4444),
        platform_color: Color(0xcc0000),
        frequency: 396,
        element: Element::Earth,
        power: "Grounding Slam",
        enemy_types: &[Light, Heavy],
        boss: BossKind::Serpent,
        boss_name: "Muladhara Serpent",
        rooms: 4,
    },
    Chakra {
        index: 1,
        name: "Svadhishthana",
        short_name: "Sacral",
        color: Color(0xff8800),
        glow: Color(0xffaa44),
        platform_color: Color(0xcc6600),
        frequency: 417,
        element: Element::Water,
        power: "Flow Surge",
        enemy_types: &[Light, Flying],
        boss: BossKind::Phoenix,
        boss_name: "Svadhishthana Phoenix",
        rooms: 4,
    },
    Chakra {
        index: 2,
        name: "Manipura",
        short_name: "Solar",
        color: Color(0xffee00),
        glow: Color(0xffff44),
        platform_color: Color(0xccaa00),
        frequency: 528,
        element: Element::Fire,
        power: "Radiant Shield",
        enemy_types: &[Flying, Heavy],
        boss: BossKind::Golem,
        boss_name: "Manipura Golem",
        rooms: 4,
    },
    Chakra {
        index: 3,
        name: "Anahata",
        short_name: "Heart",
        color: Color(0x00ff44),
        glow: Color(0x44ff88),
        platform_color: Color(0x00cc33),
        frequency: 639,
        element: Element::Air,
        power: "Harmonic Heal",
        enemy_types: &[Light, Flying, Heavy],
        boss: BossKind::Specter,
        boss_name: "Anahata Specter",
        rooms: 5,
    },
    Chakra {
        index: 4,
        name: "Vishuddha",
        short_name: "Throat",
        color: Color(0x00ccff),
        glow: Color(0x44ddff),
        platform_color: Color(0x0099cc),
        frequency: 741,
        element: Element::Ether,
        power: "Resonance Wave",
        enemy_types: &[Flying, Heavy],
        boss: BossKind::Oracle,
        boss_name: "Vishuddha Oracle",
        rooms: 4,
    },
    Chakra {
        index: 5,
        name: "Ajna",
        short_name: "Third Eye",
        color: Color(0x6600ff),
        glow: Color(0x8844ff),
        platform_color: Color(0x4400cc),
        frequency: 852,
        element: Element::Light,
        power: "Astral Sight",
        enemy_types: &[Light, Flying, Heavy],
        boss: BossKind::Seer,
        boss_name: "Ajna Seer",
        rooms: 5,
    },
    Chakra {
        index: 6,
        name: "Sahasrara",
        short_name: "Crown",
        color: Color(0xcc00ff),
        glow: Color(0xee44ff),
        platform_color: Color(0x9900cc),
        frequency: 963,
        element: Element::Cosmic,
        power: "Cosmic Alignment",
        enemy_types: &[Light, Flying, Heavy],
        boss: BossKind::Cosmos,
        boss_name: "Sahasrara Cosmos",
        rooms: 5,
    },
];

/// World data for any index (wraps modulo 7)
#[inline]
pub fn chakra(index: usize) -> &'static Chakra {
    &CHAKRAS[index % WORLD_COUNT]
}
