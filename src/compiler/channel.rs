//! Per-channel command encoding
//!
//! The four hardware channels share one command layout and differ only in
//! what leads the command (a note or a noise kit), how wide the instrument
//! field is, and how volume is quantized.

use super::effect::EffectTranslator;
use super::note::{volume_to_gb, volume_to_gb_wave};
use crate::error::RowFault;
use crate::gbt::commands::{flag, Command, MAX_COMMAND_SIZE};
use crate::s3m::pattern::NOTE_CUT;
use crate::s3m::Effect;

/// Note field of a channel command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    /// Index into the driver's frequency table
    Index(u8),
    /// Silence the channel
    Cut,
}

impl Note {
    fn byte(self) -> u8 {
        match self {
            Note::Index(index) => index,
            Note::Cut => NOTE_CUT,
        }
    }
}

/// What the channel's command leads with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    /// Pitched channel: note byte, instrument packed next to the effect
    Note,
    /// Noise channel: a kit byte selects the timbre
    Kit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeCurve {
    /// 16 linear steps
    Linear,
    /// The wave channel's five output levels
    Wave,
}

impl VolumeCurve {
    pub fn quantize(self, volume: u8) -> u8 {
        match self {
            VolumeCurve::Linear => volume_to_gb(volume),
            VolumeCurve::Wave => volume_to_gb_wave(volume),
        }
    }
}

/// Fields of one channel for one row, after front-end conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelInput {
    pub note: Option<Note>,
    /// 1-based instrument number, 0 = none
    pub instrument: u8,
    /// Raw tracker volume (0-64)
    pub volume: Option<u8>,
    pub effect: Option<Effect>,
}

/// Capabilities of one hardware channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEncoder {
    /// 1-based channel number
    pub number: u8,
    pub lead: Lead,
    pub instrument_mask: u8,
    pub volume_curve: VolumeCurve,
}

/// Pulse 1, pulse 2, wave and noise
pub const CHANNELS: [ChannelEncoder; 4] = [
    ChannelEncoder {
        number: 1,
        lead: Lead::Note,
        instrument_mask: 0x03,
        volume_curve: VolumeCurve::Linear,
    },
    ChannelEncoder {
        number: 2,
        lead: Lead::Note,
        instrument_mask: 0x03,
        volume_curve: VolumeCurve::Linear,
    },
    ChannelEncoder {
        number: 3,
        lead: Lead::Note,
        instrument_mask: 0x07,
        volume_curve: VolumeCurve::Wave,
    },
    ChannelEncoder {
        number: 4,
        lead: Lead::Kit,
        instrument_mask: 0x0F,
        volume_curve: VolumeCurve::Linear,
    },
];

impl ChannelEncoder {
    /// Build the command for one row
    pub fn encode(
        &self,
        input: &ChannelInput,
        translator: &EffectTranslator,
    ) -> Result<Command, RowFault> {
        let mut bytes = [0u8; MAX_COMMAND_SIZE];
        let mut ptr = 1;

        match self.lead {
            Lead::Note => {
                if let Some(note) = input.note {
                    bytes[0] |= flag::HAS_NOTE;
                    bytes[ptr] = note.byte();
                    ptr += 1;
                }
                // Shares its byte with the effect number
                if input.instrument > 0 {
                    bytes[0] |= flag::HAS_INSTRUMENT;
                    bytes[ptr] = (input.instrument & self.instrument_mask) << 4;
                }
            }
            Lead::Kit => {
                if let Some(kit) = self.kit(input)? {
                    bytes[0] |= flag::HAS_KIT;
                    bytes[ptr] = kit;
                    ptr += 1;
                }
            }
        }

        if let Some(effect) = input.effect {
            if let Some(translation) = translator.translate(self.number, effect)? {
                bytes[0] |= flag::HAS_EFFECT;
                bytes[ptr] |= translation.id as u8 & 0x0F;
                ptr += 1;
                bytes[ptr] = translation.param;
            }
        }

        if let Some(volume) = input.volume {
            bytes[0] |= flag::HAS_VOLUME;
            bytes[0] |= self.volume_curve.quantize(volume) & flag::VOLUME_MASK;
        }

        Ok(Command::from_raw(bytes))
    }

    fn kit(&self, input: &ChannelInput) -> Result<Option<u8>, RowFault> {
        match (input.note, input.instrument) {
            (Some(Note::Cut), 0) => Ok(Some(NOTE_CUT)),
            (Some(Note::Cut), _) => Err(RowFault::NoteCutWithKit),
            (_, 0) => Ok(None),
            (_, instrument) => Ok(Some(instrument & self.instrument_mask)),
        }
    }
}
