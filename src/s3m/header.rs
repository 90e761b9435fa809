//! S3M container layout constants

/// "SCRM" signature of the song header
pub const SONG_MAGIC: &[u8; 4] = b"SCRM";

/// "SCRS" signature of a sampled instrument record
pub const SAMPLE_MAGIC: &[u8; 4] = b"SCRS";

/// End-of-name marker byte
pub const EOF_MARKER: u8 = 0x1A;

/// The only tempo GBT Player can play (150 BPM is a 60 Hz tick)
pub const REQUIRED_TEMPO: u8 = 150;

/// Default-pan flag value announcing the per-channel pan table
pub const CUSTOM_PAN_FLAG: u8 = 252;

/// Number of channel-settings and pan-table slots in the header
pub const CHANNEL_SLOTS: usize = 32;

/// Channel settings at or above this value are disabled or AdLib channels
pub const CHANNEL_DISABLED_MIN: u8 = 16;

/// Bit in a pan-table entry marking the low nibble as valid
pub const PAN_ENTRY_VALID: u8 = 1 << 5;

/// Pan value used when a channel has no custom panning
pub const CENTER_PAN: u8 = 8;

/// Instrument type tag of a sampled instrument
pub const INSTRUMENT_SAMPLE: u8 = 1;

/// Rows in every S3M pattern
pub const ROWS_PER_PATTERN: usize = 64;

/// Byte offsets in the song header
pub mod offset {
    /// Song name (28 bytes)
    pub const SONG_NAME: usize = 0x00;
    /// 0x1A marker
    pub const EOF_MARKER: usize = 0x1C;
    /// Order, instrument and pattern counts (u16 each)
    pub const ORDER_COUNT: usize = 0x20;
    /// "SCRM"
    pub const MAGIC: usize = 0x2C;
    /// Initial speed (ticks per row)
    pub const INITIAL_SPEED: usize = 0x31;
    /// Initial tempo (BPM)
    pub const INITIAL_TEMPO: usize = 0x32;
    /// Default-pan flag
    pub const DEFAULT_PAN: usize = 0x35;
    /// Channel settings (32 bytes)
    pub const CHANNEL_SETTINGS: usize = 0x40;
    /// Order list, followed by the pointer tables
    pub const ORDERS: usize = 0x60;
}

/// Field offsets inside an instrument record
pub mod instrument {
    /// Type tag
    pub const TYPE: usize = 0x00;
    /// DOS filename (12 bytes)
    pub const FILENAME: usize = 0x01;
    /// Mixed-endian paragraph pointer to the sample data
    pub const SAMPLE_POINTER: usize = 0x0D;
    /// Sample length in bytes
    pub const LENGTH: usize = 0x10;
    /// Default volume (0-64)
    pub const VOLUME: usize = 0x1C;
    /// Sample name (28 bytes)
    pub const NAME: usize = 0x30;
    /// "SCRS"
    pub const MAGIC: usize = 0x4C;
}

/// Convert a paragraph pointer into a byte offset
pub fn paragraph(pointer: u32) -> usize {
    pointer as usize * 16
}
