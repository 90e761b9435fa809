//! Legacy 4-channel Protracker (M.K.) modules
//!
//! GBT Player used to take MOD files before moving to S3M. Only the
//! original 31-sample, 4-channel layout is understood.

pub mod period;

use crate::error::{Error, Result};
use crate::s3m::{ByteCursor, Effect};

pub use period::period_to_note;

/// "M.K." signature
pub const MAGIC: &[u8; 4] = b"M.K.";

/// Rows per pattern
pub const ROWS: usize = 64;
/// Channels per row
pub const CHANNELS: usize = 4;
/// Bytes per cell
pub const CELL_SIZE: usize = 4;
/// Bytes per pattern
pub const PATTERN_SIZE: usize = ROWS * CHANNELS * CELL_SIZE;
/// Entries in the pattern table
pub const ORDER_SLOTS: usize = 128;
/// Sample headers between the song name and the song length
pub const SAMPLE_HEADERS: usize = 31;
pub const SAMPLE_HEADER_SIZE: usize = 30;

/// Protracker effect number of "set volume"
pub const EFFECT_SET_VOLUME: u8 = 0xC;

/// Byte offsets in the file
pub mod offset {
    pub const NAME: usize = 0;
    pub const SONG_LENGTH: usize = 950;
    pub const PATTERN_TABLE: usize = 952;
    pub const MAGIC: usize = 1080;
    pub const PATTERNS: usize = 1084;
}

/// One channel of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModCell {
    /// 1-based sample number, 0 = none
    pub sample: u8,
    /// Amiga period, 0 = no note
    pub period: u16,
    /// Effect number in `command`, 0x000 = none
    pub effect: Effect,
}

impl ModCell {
    pub fn from_bytes(b: [u8; CELL_SIZE]) -> Self {
        Self {
            sample: (b[0] & 0xF0) | (b[2] >> 4),
            period: ((b[0] as u16 & 0x0F) << 8) | b[1] as u16,
            effect: Effect {
                command: b[2] & 0x0F,
                param: b[3],
            },
        }
    }

    pub fn has_effect(&self) -> bool {
        self.effect.command != 0 || self.effect.param != 0
    }
}

/// A parsed Protracker module
#[derive(Debug, Clone)]
pub struct ModModule<'a> {
    data: &'a [u8],
    pub name: String,
    /// Number of orders actually played
    pub song_length: usize,
    pub pattern_table: Vec<u8>,
}

impl<'a> ModModule<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset::NAME)?;
        let name = cursor.read_string(20)?;

        // Sample headers carry nothing the driver can use
        cursor.skip(SAMPLE_HEADERS * SAMPLE_HEADER_SIZE)?;
        let song_length = cursor.read_u8()? as usize;
        if song_length > ORDER_SLOTS {
            return Err(Error::format(format!(
                "song length {} exceeds {} orders",
                song_length, ORDER_SLOTS
            )));
        }

        // Restart position, unused
        cursor.skip(1)?;
        let pattern_table = cursor.read_bytes(ORDER_SLOTS)?.to_vec();

        if cursor.read_bytes(4)? != MAGIC {
            return Err(Error::format(
                "only 4 channel MOD files with 31 samples are supported",
            ));
        }

        Ok(Self {
            data,
            name,
            song_length,
            pattern_table,
        })
    }

    /// Pattern indices in play order
    pub fn orders(&self) -> &[u8] {
        &self.pattern_table[..self.song_length]
    }

    /// Patterns stored in the file
    pub fn pattern_count(&self) -> usize {
        self.pattern_table
            .iter()
            .max()
            .map_or(0, |&max| max as usize + 1)
    }

    /// Read the cells of one row
    pub fn row(&self, pattern: usize, row: usize) -> Result<[ModCell; CHANNELS]> {
        let base = offset::PATTERNS + pattern * PATTERN_SIZE + row * CHANNELS * CELL_SIZE;
        let mut cursor = ByteCursor::at(self.data, base)?;

        let mut cells = [ModCell::default(); CHANNELS];
        for cell in &mut cells {
            let bytes = cursor.read_bytes(CELL_SIZE)?;
            *cell = ModCell::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        Ok(cells)
    }
}
