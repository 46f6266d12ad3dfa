//! Output mode, scale and key selections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether control input is quantized before reaching the oscillator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Continuous,
    Discrete,
}

/// Selectable scales, each a set of semitone offsets from the key's root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    #[default]
    #[serde(rename = "chromatic")]
    Chromatic,
    #[serde(rename = "diatonic major")]
    DiatonicMajor,
    #[serde(rename = "pentatonic major")]
    PentatonicMajor,
    #[serde(rename = "pentatonic minor")]
    PentatonicMinor,
    #[serde(rename = "blues")]
    Blues,
}

impl Scale {
    pub const ALL: [Scale; 5] = [
        Scale::Chromatic,
        Scale::DiatonicMajor,
        Scale::PentatonicMajor,
        Scale::PentatonicMinor,
        Scale::Blues,
    ];

    /// Semitone offsets (0..12) belonging to the scale.
    pub fn degrees(self) -> &'static [u8] {
        match self {
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::DiatonicMajor => &[0, 2, 4, 5, 7, 9, 11],
            Scale::PentatonicMajor => &[0, 2, 4, 7, 9],
            Scale::PentatonicMinor => &[0, 3, 5, 7, 10],
            Scale::Blues => &[0, 3, 5, 6, 7, 10],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scale::Chromatic => "chromatic",
            Scale::DiatonicMajor => "diatonic major",
            Scale::PentatonicMajor => "pentatonic major",
            Scale::PentatonicMinor => "pentatonic minor",
            Scale::Blues => "blues",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scale::ALL
            .into_iter()
            .find(|scale| scale.name() == s)
            .ok_or_else(|| format!("unknown scale '{}'", s))
    }
}

/// Musical key, listed in selector order (A first).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    A,
    #[serde(rename = "A#")]
    ASharp,
    B,
    #[default]
    C,
    #[serde(rename = "C#")]
    CSharp,
    D,
    #[serde(rename = "D#")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    #[serde(rename = "G#")]
    GSharp,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::A,
        Key::ASharp,
        Key::B,
        Key::C,
        Key::CSharp,
        Key::D,
        Key::DSharp,
        Key::E,
        Key::F,
        Key::FSharp,
        Key::G,
        Key::GSharp,
    ];

    /// Semitones above C, used as the note table rotation.
    pub fn offset(self) -> usize {
        match self {
            Key::C => 0,
            Key::CSharp => 1,
            Key::D => 2,
            Key::DSharp => 3,
            Key::E => 4,
            Key::F => 5,
            Key::FSharp => 6,
            Key::G => 7,
            Key::GSharp => 8,
            Key::A => 9,
            Key::ASharp => 10,
            Key::B => 11,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::A => "A",
            Key::ASharp => "A#",
            Key::B => "B",
            Key::C => "C",
            Key::CSharp => "C#",
            Key::D => "D",
            Key::DSharp => "D#",
            Key::E => "E",
            Key::F => "F",
            Key::FSharp => "F#",
            Key::G => "G",
            Key::GSharp => "G#",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| format!("unknown key '{}'", s))
    }
}
