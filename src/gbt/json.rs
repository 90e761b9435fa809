//! JSON views of a compiled song

use super::reader::{decode_row, DecodedCommand};
use super::song::CompiledSong;
use crate::compiler::CompileOptions;
use crate::error::Result;
use serde::Serialize;

/// Top-level JSON structure for a compiled song
#[derive(Debug, Clone, Serialize)]
pub struct SongJson {
    pub name: String,
    pub options: CompileOptions,
    /// Raw startup stream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_state: Option<Vec<u8>>,
    pub orders: Vec<usize>,
    pub patterns: Vec<PatternJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternJson {
    pub index: usize,
    pub bytes: usize,
    pub rows: Vec<RowJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowJson {
    pub row: usize,
    /// Non-empty commands only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<DecodedCommand>,
}

impl SongJson {
    /// Decode every row of `song`
    pub fn new(song: &CompiledSong, options: CompileOptions) -> Result<Self> {
        let patterns = song
            .patterns
            .iter()
            .map(|pattern| {
                let rows = pattern
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(row, bytes)| {
                        let commands = decode_row(bytes)?
                            .into_iter()
                            .filter(|c| !c.is_empty())
                            .collect();
                        Ok(RowJson { row, commands })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(PatternJson {
                    index: pattern.index,
                    bytes: pattern.rows.iter().map(Vec::len).sum(),
                    rows,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: song.name.clone(),
            options,
            init_state: song.init_state.clone(),
            orders: song.orders.clone(),
            patterns,
        })
    }
}
