//! Module compiler - translates tracker patterns into GBT Player bytecode
//!
//! Parsing, translation and encoding run in one pass over an in-memory copy
//! of the module. A single bad cell aborts the whole song; no partial output
//! is ever produced.

pub mod channel;
pub mod effect;
pub mod note;
pub mod row;

use crate::error::{Error, Result, RowConversionError, RowFault};
use crate::gbt::commands::{state, Command, MAX_COMMAND_SIZE};
use crate::gbt::writer::CWriter;
use crate::gbt::{CompiledPattern, CompiledSong};
use crate::protracker::{self, ModModule};
use crate::s3m::header::{self as s3m_header, SONG_MAGIC};
use crate::s3m::{Instrument, S3mModule};
use channel::{ChannelEncoder, ChannelInput};
use effect::{EffectProfile, EffectTranslator};
use flate2::read::GzDecoder;
use note::{pan_to_gb, speed_to_gb};
use row::{mod_channel_input, s3m_channel_input, split_rows};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// First 1-based instrument slot preloaded into the wave channel
pub const WAVE_INSTRUMENT_FIRST: u8 = 8;
/// Last 1-based instrument slot preloaded into the wave channel
pub const WAVE_INSTRUMENT_LAST: u8 = 15;

/// Wave RAM sizes (in 8-bit source samples) the driver accepts
pub const WAVE_SHORT: usize = 32;
pub const WAVE_LONG: usize = 64;

/// Source module format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    S3m,
    Mod,
}

impl Format {
    /// Guess the format from a file name (`song.s3m`, `song.mod.gz`, ...)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "s3m" => Some(Format::S3m),
            "mod" => Some(Format::Mod),
            "gz" => Self::from_path(Path::new(path.file_stem()?)),
            _ => None,
        }
    }

    /// Guess the format from the file signature
    pub fn sniff(data: &[u8]) -> Option<Self> {
        let s3m_magic = data.get(s3m_header::offset::MAGIC..s3m_header::offset::MAGIC + 4);
        let mod_magic = data.get(protracker::offset::MAGIC..protracker::offset::MAGIC + 4);

        if s3m_magic == Some(&SONG_MAGIC[..]) {
            Some(Format::S3m)
        } else if mod_magic == Some(&protracker::MAGIC[..]) {
            Some(Format::Mod)
        } else {
            None
        }
    }

    /// Extension first, then signature
    pub fn detect(path: &Path, data: &[u8]) -> Result<Self> {
        Self::from_path(path)
            .or_else(|| Self::sniff(data))
            .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))
    }

    /// MOD songs were written for 50 Hz Amiga timing
    pub fn default_speed_conversion(self) -> bool {
        matches!(self, Format::Mod)
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s3m" => Ok(Format::S3m),
            "mod" => Ok(Format::Mod),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// Behavior switches supplied by the asset pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Scale speeds from 50 Hz to 60 Hz ticks; `None` leaves it to the format
    pub speed_conversion: Option<bool>,
    /// Embed wave instruments 8-15 in the initial state
    pub export_instruments: bool,
}

impl CompileOptions {
    /// Whether speeds are scaled when compiling `format`
    pub fn speed_conversion_for(&self, format: Format) -> bool {
        self.speed_conversion
            .unwrap_or_else(|| format.default_speed_conversion())
    }
}

/// Main compiler state
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    pub options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Compile a module image of a known format
    pub fn compile(&self, data: &[u8], format: Format, name: &str) -> Result<CompiledSong> {
        match format {
            Format::S3m => self.compile_s3m(data, name),
            Format::Mod => self.compile_mod(data, name),
        }
    }

    /// Compile a module file and write the C source to `output`
    ///
    /// Without an explicit `format` it is detected from the file.
    pub fn compile_file(
        &self,
        input: &Path,
        output: &Path,
        name: &str,
        format: Option<Format>,
    ) -> Result<CompiledSong> {
        let data = read_module(input)?;
        let format = match format {
            Some(format) => format,
            None => Format::detect(input, &data)?,
        };
        let song = self.compile(&data, format, name)?;

        let file = File::create(output)?;
        CWriter::new(BufWriter::new(file)).write_song(&song)?;
        info!("Wrote {}", output.display());

        Ok(song)
    }

    pub fn compile_s3m(&self, data: &[u8], name: &str) -> Result<CompiledSong> {
        let module = S3mModule::parse(data)?;
        info!("Song name: '{}'", module.name);
        info!("Num. orders: {}", module.orders.len());
        info!("Num. patterns: {}", module.pattern_count());
        info!("Num. instruments: {}", module.instruments.len());

        let translator = EffectTranslator::new(
            EffectProfile::S3m,
            self.options.speed_conversion_for(Format::S3m),
        );
        let referenced: BTreeSet<usize> = module.valid_orders().collect();

        for &order in &module.orders {
            if order as usize >= module.pattern_count() {
                debug!("Skipping order entry {}", order);
            }
        }

        info!("Exporting patterns...");
        let mut patterns = Vec::with_capacity(referenced.len());
        for index in 0..module.pattern_count() {
            if !referenced.contains(&index) {
                info!("Pattern {} is not referenced, skipping", index);
                continue;
            }
            let pattern = module.pattern(index)?;
            let rows = split_rows(&pattern)
                .iter()
                .enumerate()
                .map(|(row, fields)| {
                    encode_row(&translator, index, row, |encoder| {
                        let cell = &fields.cells[encoder_index(encoder)];
                        s3m_channel_input(cell, encoder.lead, |n| module.instrument(n))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            debug!("Pattern {}: {} rows", index, rows.len());
            patterns.push(CompiledPattern { index, rows });
        }

        info!("Exporting initial state...");
        let init_state = self.initial_state(&module)?;

        let song = CompiledSong {
            name: name.to_string(),
            patterns,
            init_state: Some(init_state),
            orders: module.valid_orders().collect(),
        };
        info!("Pattern data: {} bytes", song.pattern_bytes());
        Ok(song)
    }

    pub fn compile_mod(&self, data: &[u8], name: &str) -> Result<CompiledSong> {
        let module = ModModule::parse(data)?;
        info!("Song name: '{}'", module.name);
        info!("Song length: {}", module.song_length);

        let translator = EffectTranslator::new(
            EffectProfile::Protracker,
            self.options.speed_conversion_for(Format::Mod),
        );
        let referenced: BTreeSet<usize> = module.orders().iter().map(|&o| o as usize).collect();

        info!("Exporting patterns...");
        let mut patterns = Vec::with_capacity(referenced.len());
        for &index in &referenced {
            let rows = (0..protracker::ROWS)
                .map(|row| {
                    let cells = module.row(index, row)?;
                    encode_row(&translator, index, row, |encoder| {
                        mod_channel_input(&cells[encoder_index(encoder)], encoder.lead)
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            patterns.push(CompiledPattern { index, rows });
        }

        Ok(CompiledSong {
            name: name.to_string(),
            patterns,
            init_state: None,
            orders: module.orders().iter().map(|&o| o as usize).collect(),
        })
    }

    /// Startup speed, panning and optional wave instruments
    fn initial_state(&self, module: &S3mModule<'_>) -> Result<Vec<u8>> {
        let mut stream = vec![
            state::SPEED,
            speed_to_gb(
                module.initial_speed,
                self.options.speed_conversion_for(Format::S3m),
            ),
            state::PANNING,
        ];

        if module.custom_pan {
            info!("Song contains custom panning values");
        }
        for (i, &pan) in module.channel_pans.iter().enumerate() {
            stream.push(pan_to_gb(pan, i as u8 + 1));
        }

        if self.options.export_instruments {
            for number in WAVE_INSTRUMENT_FIRST..=WAVE_INSTRUMENT_LAST {
                let Some(instrument) = module.instrument(number) else {
                    continue;
                };
                info!("Exporting instrument {} '{}' to channel 3", number, instrument.name);
                stream.push(state::CHANNEL3_INSTRUMENT);
                stream.extend(wave_instrument(module.data(), number, instrument)?);
            }
        }

        stream.push(state::DONE);
        Ok(stream)
    }
}

/// Flag byte plus packed 4-bit samples of a wave-channel instrument
pub fn wave_instrument(data: &[u8], number: u8, instrument: &Instrument) -> Result<Vec<u8>> {
    let sample = instrument.sample(data)?;

    let mut flag = (number - WAVE_INSTRUMENT_FIRST) & state::WAVE_INDEX_MASK;
    match sample.len() {
        WAVE_SHORT => {}
        WAVE_LONG => flag |= state::WAVE_64,
        len => {
            return Err(Error::format(format!(
                "invalid sample length in instrument {} '{}' ({} bytes, expected {} or {})",
                number, instrument.name, len, WAVE_SHORT, WAVE_LONG
            )))
        }
    }

    let mut out = Vec::with_capacity(1 + sample.len() / 2);
    out.push(flag);
    out.extend(
        sample
            .chunks_exact(2)
            .map(|pair| (pair[0] & 0xF0) | (pair[1] >> 4)),
    );
    Ok(out)
}

fn encoder_index(encoder: &ChannelEncoder) -> usize {
    encoder.number as usize - 1
}

/// Encode the four channels of one row back to back
///
/// `input` builds each channel's fields; any fault is pinned to this
/// pattern, row and channel.
fn encode_row<F>(
    translator: &EffectTranslator,
    pattern: usize,
    row: usize,
    mut input: F,
) -> Result<Vec<u8>>
where
    F: FnMut(&ChannelEncoder) -> std::result::Result<ChannelInput, RowFault>,
{
    let mut bytes = Vec::with_capacity(channel::CHANNELS.len() * MAX_COMMAND_SIZE);

    for encoder in &channel::CHANNELS {
        let command: Command = input(encoder)
            .and_then(|fields| encoder.encode(&fields, translator))
            .map_err(|fault| RowConversionError {
                pattern,
                row,
                channel: encoder.number,
                fault,
            })?;
        bytes.extend_from_slice(command.as_bytes());
    }

    Ok(bytes)
}

/// Read a module file, decompressing gzip transparently
pub fn read_module(path: &Path) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    // Check for gzip magic (0x1f 0x8b) whatever the extension says
    if data.starts_with(&[0x1F, 0x8B]) {
        let mut decoder = GzDecoder::new(data.as_slice());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        debug!(
            "Decompressed {} ({} -> {} bytes)",
            path.display(),
            data.len(),
            decompressed.len()
        );
        return Ok(decompressed);
    }

    Ok(data)
}

/// Compile a module image straight to C source
///
/// The format is taken from the file signature.
pub fn convert(data: &[u8], name: &str, options: CompileOptions) -> Result<String> {
    let format = Format::sniff(data)
        .ok_or_else(|| Error::UnknownFormat("unrecognized module signature".to_string()))?;
    let song = Compiler::new(options).compile(data, format, name)?;
    crate::gbt::to_c_source(&song)
}
