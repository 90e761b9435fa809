//! Compiled song model

use serde::Serialize;

/// One exported pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPattern {
    /// Pattern index in the source module
    pub index: usize,
    /// One byte stream per row: channel 1, 2, 3 and 4 commands back to back
    pub rows: Vec<Vec<u8>>,
}

/// Everything the driver needs to play a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledSong {
    /// C identifier prefix
    pub name: String,
    /// Referenced patterns in ascending index order
    pub patterns: Vec<CompiledPattern>,
    /// Startup command stream; MOD songs have none
    pub init_state: Option<Vec<u8>>,
    /// Pattern index of each played order
    pub orders: Vec<usize>,
}

impl CompiledSong {
    pub fn pattern(&self, index: usize) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|p| p.index == index)
    }

    /// Total bytes of pattern data
    pub fn pattern_bytes(&self) -> usize {
        self.patterns
            .iter()
            .flat_map(|p| &p.rows)
            .map(Vec::len)
            .sum()
    }
}
