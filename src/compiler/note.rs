//! Note, volume and panning conversions

use crate::error::RowFault;
use crate::gbt::commands::wave_volume;
use crate::s3m::pattern::NOTE_CUT;

/// Lowest S3M note GBT Player can play (C-2)
pub const LOWEST_NOTE: u8 = 32;

/// Octaves covered by the driver's frequency table
pub const OCTAVES: u8 = 6;

/// Number of note indices the driver knows about
pub const NOTE_COUNT: u8 = OCTAVES * 12;

/// Convert an S3M note (octave in the high nibble, semitone in the low
/// nibble) into the driver's linear note index
///
/// The note-cut marker is passed through unchanged.
pub fn s3m_note_to_gb(note: u8) -> Result<u8, RowFault> {
    if note == NOTE_CUT {
        return Ok(note);
    }
    if note > 0x7F {
        return Err(RowFault::NoteTooHigh);
    }
    let Some(relative) = note.checked_sub(LOWEST_NOTE) else {
        return Err(RowFault::NoteTooLow);
    };
    let semitone = relative & 0x0F;
    let octave = relative >> 4;
    if semitone >= 12 {
        return Err(RowFault::InvalidNote(note));
    }
    let index = semitone + octave * 12;
    if index >= NOTE_COUNT {
        return Err(RowFault::NoteTooHigh);
    }
    Ok(index)
}

/// Linear 6-bit to 4-bit volume (channels 1, 2 and 4)
pub fn volume_to_gb(volume: u8) -> u8 {
    (volume >> 2).min(15)
}

/// Channel 3 only has mute, 25%, 50%, 75% and 100%
pub fn volume_to_gb_wave(volume: u8) -> u8 {
    match volume_to_gb(volume) {
        0..=3 => wave_volume::MUTE,
        4..=6 => wave_volume::QUARTER,
        7..=9 => wave_volume::HALF,
        10..=12 => wave_volume::THREE_QUARTERS,
        _ => wave_volume::FULL,
    }
}

/// Convert a tracker pan position (0-15) into the channel's bits of the
/// combined left/right enable register
///
/// `channel` is 1-based. Left enables live in bits 4-7, right enables in
/// bits 0-3.
pub fn pan_to_gb(pan: u8, channel: u8) -> u8 {
    let (left, right) = match pan {
        0..=3 => (true, false),
        4..=11 => (true, true),
        _ => (false, true),
    };

    let mut mask = 0;
    if left {
        mask |= 1 << (3 + channel);
    }
    if right {
        mask |= 1 << (channel - 1);
    }
    mask
}

/// Decode a BCD byte (used by pattern break rows)
pub fn bcd_to_decimal(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Scale an Amiga 50 Hz speed to the 60 Hz tick
pub fn speed_to_gb(speed: u8, speed_conversion: bool) -> u8 {
    if speed_conversion {
        ((speed as u16 * 60) / 50).min(u8::MAX as u16) as u8
    } else {
        speed
    }
}
