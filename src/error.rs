use std::io;

/// Reason a single cell could not be translated to GBT bytecode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowFault {
    #[error("Speed must not be zero")]
    ZeroSpeed,

    #[error("Unsupported effect: {effect}{param:02X}")]
    UnsupportedEffect { effect: char, param: u8 },

    #[error("Volume slide not supported in channel 3")]
    VolumeSlideOnWaveChannel,

    #[error("Fine volume slide not supported")]
    FineVolumeSlide,

    #[error("Volume slide too steep")]
    VolumeSlideTooSteep,

    #[error("Invalid volume slide arguments: {0:02X}")]
    InvalidVolumeSlide(u8),

    #[error("Note too low")]
    NoteTooLow,

    #[error("Note too high")]
    NoteTooHigh,

    #[error("Invalid note: {0:02X}")]
    InvalidNote(u8),

    #[error("Note cut + Instrument in the same row")]
    NoteCutWithKit,
}

/// A row fault pinned to its location in the song
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Pattern {pattern} | Row {row} | Channel {channel} | {fault}")]
pub struct RowConversionError {
    pub pattern: usize,
    pub row: usize,
    /// 1-based, matching the tracker's channel numbering
    pub channel: u8,
    #[source]
    pub fault: RowFault,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid module: {0}")]
    Format(String),

    #[error(transparent)]
    RowConversion(#[from] RowConversionError),

    #[error("Unknown module format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn format(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
