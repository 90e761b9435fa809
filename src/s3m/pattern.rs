//! Packed pattern decoding

use super::cursor::ByteCursor;
use super::header::{paragraph, ROWS_PER_PATTERN};
use crate::error::{Error, Result};

/// Cell header bit: note and instrument bytes follow
pub const CELL_HAS_NOTE: u8 = 1 << 5;
/// Cell header bit: volume byte follows
pub const CELL_HAS_VOLUME: u8 = 1 << 6;
/// Cell header bit: effect and parameter bytes follow
pub const CELL_HAS_EFFECT: u8 = 1 << 7;
/// Cell header channel field
pub const CELL_CHANNEL_MASK: u8 = 0x1F;

/// Channels GBT Player can drive
pub const MAX_CHANNELS: u8 = 4;

/// S3M note value for "note cut" (^^)
pub const NOTE_CUT: u8 = 0xFE;
/// S3M note value for "no note"
pub const NOTE_NONE: u8 = 0xFF;

/// Note + instrument pair of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteInstrument {
    /// Octave in the high nibble, semitone in the low nibble
    pub note: u8,
    /// 1-based instrument number, 0 = none
    pub instrument: u8,
}

/// Tracker effect as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effect {
    /// 1 = 'A', 2 = 'B', ...
    pub command: u8,
    pub param: u8,
}

impl Effect {
    /// Build an effect from its tracker letter
    pub fn from_letter(letter: char, param: u8) -> Self {
        let command = (letter as u8).wrapping_sub(b'A').wrapping_add(1);
        Self { command, param }
    }

    /// Effect letter as shown in the tracker, '?' if out of range
    pub fn letter(&self) -> char {
        match self.command {
            1..=26 => (b'A' + self.command - 1) as char,
            _ => '?',
        }
    }
}

/// One channel's fields for one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// 0-based channel index
    pub channel: u8,
    pub note: Option<NoteInstrument>,
    pub volume: Option<u8>,
    pub effect: Option<Effect>,
}

impl Cell {
    /// The end-of-row marker
    pub const END_OF_ROW: Cell = Cell {
        channel: 0,
        note: None,
        volume: None,
        effect: None,
    };

    pub fn is_end_of_row(&self) -> bool {
        *self == Self::END_OF_ROW
    }
}

/// A decoded pattern: cells in disk order with in-band row markers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    pub cells: Vec<Cell>,
}

impl Pattern {
    /// 64 rows with nothing in them
    pub fn empty() -> Self {
        Self {
            cells: vec![Cell::END_OF_ROW; ROWS_PER_PATTERN],
        }
    }

    /// Number of end-of-row markers
    pub fn row_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_end_of_row()).count()
    }
}

/// Decode the pattern at a paragraph pointer (0 = empty pattern)
pub fn load_pattern(data: &[u8], pointer: u16) -> Result<Pattern> {
    if pointer == 0 {
        return Ok(Pattern::empty());
    }

    let base = paragraph(pointer as u32);
    let mut cursor = ByteCursor::at(data, base)?;

    // The length prefix counts itself
    let size = cursor.read_u16le()? as usize;
    if size < 2 {
        return Err(Error::format(format!(
            "pattern at 0x{:X} has an invalid length ({})",
            base, size
        )));
    }
    let body = cursor.read_bytes(size - 2)?;

    decode_cells(body)
}

/// Decode a packed cell stream
pub fn decode_cells(body: &[u8]) -> Result<Pattern> {
    let mut cursor = ByteCursor::new(body);
    let mut cells = Vec::new();

    while !cursor.is_eof() {
        let header = cursor.read_u8()?;
        if header == 0 {
            cells.push(Cell::END_OF_ROW);
            continue;
        }

        let channel = header & CELL_CHANNEL_MASK;
        if channel >= MAX_CHANNELS {
            return Err(Error::format(format!(
                "channel {} is used; only channels 1-{} are supported",
                channel + 1,
                MAX_CHANNELS
            )));
        }

        let mut cell = Cell {
            channel,
            ..Cell::default()
        };

        if header & CELL_HAS_NOTE != 0 {
            let note = cursor.read_u8()?;
            let instrument = cursor.read_u8()?;
            cell.note = Some(NoteInstrument { note, instrument });
        }
        if header & CELL_HAS_VOLUME != 0 {
            cell.volume = Some(cursor.read_u8()?);
        }
        if header & CELL_HAS_EFFECT != 0 {
            let command = cursor.read_u8()?;
            let param = cursor.read_u8()?;
            cell.effect = Some(Effect { command, param });
        }

        cells.push(cell);
    }

    Ok(Pattern { cells })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pointer_is_64_silent_rows() {
        let pattern = load_pattern(&[], 0).unwrap();
        assert_eq!(pattern.cells.len(), 64);
        assert_eq!(pattern.row_count(), 64);
    }

    #[test]
    fn test_field_order() {
        let body = [
            0xE1, 0x40, 0x03, 0x20, 0x04, 0x05, // ch 2: note, ins, vol, effect
            0x42, 0x30, // ch 3: volume only
            0x00,
        ];
        let pattern = decode_cells(&body).unwrap();
        assert_eq!(
            pattern.cells[0],
            Cell {
                channel: 1,
                note: Some(NoteInstrument {
                    note: 0x40,
                    instrument: 3
                }),
                volume: Some(0x20),
                effect: Some(Effect {
                    command: 4,
                    param: 5
                }),
            }
        );
        assert_eq!(pattern.cells[1].channel, 2);
        assert_eq!(pattern.cells[1].volume, Some(0x30));
        assert!(pattern.cells[2].is_end_of_row());
    }

    #[test]
    fn test_channel_above_four_is_rejected() {
        let body = [0x44, 0x10, 0x00];
        assert!(matches!(decode_cells(&body), Err(Error::Format(_))));
    }

    #[test]
    fn test_truncated_cell() {
        let body = [0xA0, 0x40];
        assert!(decode_cells(&body).is_err());
    }

    #[test]
    fn test_load_from_pointer() {
        let mut data = vec![0u8; 0x10];
        data.extend_from_slice(&[5, 0, 0x41, 0x10, 0x00]);
        let pattern = load_pattern(&data, 1).unwrap();
        assert_eq!(pattern.cells.len(), 2);
        assert_eq!(pattern.cells[0].volume, Some(0x10));
    }

    #[test]
    fn test_effect_letters() {
        assert_eq!(Effect::from_letter('A', 0).command, 1);
        assert_eq!(Effect { command: 19, param: 0 }.letter(), 'S');
        assert_eq!(Effect { command: 0, param: 0 }.letter(), '?');
    }
}
