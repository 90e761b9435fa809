//! GBT Player bytecode definitions
//!
//! Every channel command starts with a header byte whose top bits say which
//! fields follow. The volume flag lives in the header together with the
//! 4-bit volume, so it never changes the command length.

use serde::Serialize;

/// Header flag bits
pub mod flag {
    pub const HAS_VOLUME: u8 = 1 << 4;
    pub const HAS_INSTRUMENT: u8 = 1 << 5;
    pub const HAS_EFFECT: u8 = 1 << 6;
    pub const HAS_NOTE: u8 = 1 << 7;
    /// Channel 4 has no note; its kit byte takes the note's place
    pub const HAS_KIT: u8 = 1 << 7;
    pub const VOLUME_MASK: u8 = 0x0F;
}

/// Command length indexed by `header >> 5` (note, effect, instrument)
pub const SIZES: [usize; 8] = [1, 2, 3, 3, 2, 3, 4, 4];

/// Longest possible command
pub const MAX_COMMAND_SIZE: usize = 4;

/// Length in bytes of the command starting with `header`
pub fn command_len(header: u8) -> usize {
    SIZES[(header >> 5) as usize]
}

/// Hardware effect opcodes (low nibble of the instrument/effect byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EffectId {
    Pan = 0,
    Arpeggio = 1,
    NoteCut = 2,
    Vibrato = 3,
    VolumeSlide = 4,
    PatternJump = 8,
    BreakSetStep = 9,
    Speed = 10,
    Event = 15,
}

impl EffectId {
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Pan,
            1 => Self::Arpeggio,
            2 => Self::NoteCut,
            3 => Self::Vibrato,
            4 => Self::VolumeSlide,
            8 => Self::PatternJump,
            9 => Self::BreakSetStep,
            10 => Self::Speed,
            15 => Self::Event,
            _ => return None,
        })
    }
}

/// Initial-state sub-command tags
pub mod state {
    pub const DONE: u8 = 0;
    pub const SPEED: u8 = 1;
    pub const PANNING: u8 = 2;
    pub const CHANNEL3_INSTRUMENT: u8 = 3;

    /// Channel-3 instrument flag: the waveform has 64 entries
    pub const WAVE_64: u8 = 1 << 7;
    pub const WAVE_INDEX_MASK: u8 = 0x07;
}

/// Volume-slide parameter: direction bit (set = volume rises)
pub const VOLUME_SLIDE_UP: u8 = 1 << 3;

/// Channel-3 volume register codes
pub mod wave_volume {
    pub const MUTE: u8 = 0;
    pub const FULL: u8 = 1;
    pub const HALF: u8 = 2;
    pub const QUARTER: u8 = 3;
    pub const THREE_QUARTERS: u8 = 4;
}

/// One encoded channel command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    bytes: [u8; MAX_COMMAND_SIZE],
}

impl Command {
    /// The empty command (header 0)
    pub const NOP: Command = Command {
        bytes: [0; MAX_COMMAND_SIZE],
    };

    pub fn from_raw(bytes: [u8; MAX_COMMAND_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn header(&self) -> u8 {
        self.bytes[0]
    }

    pub fn len(&self) -> usize {
        command_len(self.header())
    }

    pub fn is_empty(&self) -> bool {
        self.header() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::NOP
    }
}
