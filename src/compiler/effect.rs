//! Tracker effect to GBT effect translation
//!
//! The S3M profile is strict: anything the driver can't reproduce is a row
//! error. The Protracker profile serves old MOD songs and ignores what it
//! can't convert, with a warning.

use super::note::{bcd_to_decimal, pan_to_gb, speed_to_gb};
use crate::error::RowFault;
use crate::gbt::commands::{EffectId, VOLUME_SLIDE_UP};
use crate::s3m::Effect;
use tracing::warn;

/// Wave channel, the one without a volume envelope
const WAVE_CHANNEL: u8 = 3;

/// Protracker speed values above this are BPM changes
const PROTRACKER_MAX_SPEED: u8 = 0x1F;

/// Effect rules of a source format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectProfile {
    S3m,
    Protracker,
}

/// A hardware effect and its re-encoded parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub id: EffectId,
    pub param: u8,
}

impl Translation {
    fn new(id: EffectId, param: u8) -> Option<Self> {
        Some(Self { id, param })
    }
}

/// Maps tracker effects onto the driver's effect table
#[derive(Debug, Clone, Copy)]
pub struct EffectTranslator {
    pub profile: EffectProfile,
    pub speed_conversion: bool,
}

impl EffectTranslator {
    pub fn new(profile: EffectProfile, speed_conversion: bool) -> Self {
        Self {
            profile,
            speed_conversion,
        }
    }

    /// Translate `effect` for 1-based `channel`
    ///
    /// `Ok(None)` means the effect is dropped without producing a command.
    pub fn translate(&self, channel: u8, effect: Effect) -> Result<Option<Translation>, RowFault> {
        match self.profile {
            EffectProfile::S3m => self.translate_s3m(channel, effect),
            EffectProfile::Protracker => self.translate_protracker(channel, effect),
        }
    }

    fn translate_s3m(&self, channel: u8, effect: Effect) -> Result<Option<Translation>, RowFault> {
        let param = effect.param;

        match effect.letter() {
            'A' => {
                if param == 0 {
                    return Err(RowFault::ZeroSpeed);
                }
                Ok(Translation::new(
                    EffectId::Speed,
                    speed_to_gb(param, self.speed_conversion),
                ))
            }
            // TODO: reject jumps past the last order once orders are known here
            'B' => Ok(Translation::new(EffectId::PatternJump, param)),
            'C' => Ok(Translation::new(
                EffectId::BreakSetStep,
                bcd_to_decimal(param),
            )),
            'D' => volume_slide(channel, param),
            'H' => Ok(Translation::new(EffectId::Vibrato, param)),
            'J' => Ok(Translation::new(EffectId::Arpeggio, param)),
            'S' => {
                let sub_param = param & 0x0F;
                match param >> 4 {
                    0x8 => Ok(Translation::new(EffectId::Pan, pan_to_gb(sub_param, channel))),
                    0xC => Ok(Translation::new(EffectId::NoteCut, sub_param)),
                    0xF => Ok(Translation::new(EffectId::Event, sub_param)),
                    _ => Err(unsupported(effect)),
                }
            }
            _ => Err(unsupported(effect)),
        }
    }

    fn translate_protracker(&self, channel: u8, effect: Effect) -> Result<Option<Translation>, RowFault> {
        let param = effect.param;

        let translation = match effect.command {
            0x0 => Translation::new(EffectId::Arpeggio, param),
            0xB => Translation::new(EffectId::PatternJump, param),
            0xD => Translation::new(EffectId::BreakSetStep, bcd_to_decimal(param)),
            0xE if param >> 4 == 0x8 => {
                Translation::new(EffectId::Pan, pan_to_gb(param & 0x0F, channel))
            }
            0xE if param >> 4 == 0xC => Translation::new(EffectId::NoteCut, param & 0x0F),
            0xF if param == 0 => return Err(RowFault::ZeroSpeed),
            0xF if param > PROTRACKER_MAX_SPEED => {
                warn!("Unsupported BPM speed effect: F{:02X}", param);
                None
            }
            0xF => Translation::new(EffectId::Speed, speed_to_gb(param, self.speed_conversion)),
            _ => {
                warn!("Unsupported effect: {:X}{:02X}", effect.command, param);
                None
            }
        };
        Ok(translation)
    }
}

/// Only pure "delay" slides map onto the hardware envelope
fn volume_slide(channel: u8, param: u8) -> Result<Option<Translation>, RowFault> {
    if channel == WAVE_CHANNEL {
        return Err(RowFault::VolumeSlideOnWaveChannel);
    }
    // D00 continues the previous slide, which the envelope already does
    if param == 0 {
        return Ok(None);
    }

    let upper = param >> 4;
    let lower = param & 0x0F;

    if upper == 0xF || lower == 0xF {
        return Err(RowFault::FineVolumeSlide);
    }

    let (direction, amount) = if lower == 0 {
        (VOLUME_SLIDE_UP, upper)
    } else if upper == 0 {
        (0, lower)
    } else {
        return Err(RowFault::InvalidVolumeSlide(param));
    };

    let delay = 8i8 - amount as i8;
    if delay <= 0 {
        return Err(RowFault::VolumeSlideTooSteep);
    }

    Ok(Translation::new(EffectId::VolumeSlide, direction | delay as u8))
}

fn unsupported(effect: Effect) -> RowFault {
    RowFault::UnsupportedEffect {
        effect: effect.letter(),
        param: effect.param,
    }
}
