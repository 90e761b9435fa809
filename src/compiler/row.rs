//! Row accumulation and front-end cell conversion

use super::channel::{ChannelInput, Lead, Note};
use super::note::s3m_note_to_gb;
use crate::error::RowFault;
use crate::protracker::{period_to_note, ModCell, EFFECT_SET_VOLUME};
use crate::s3m::pattern::{MAX_CHANNELS, NOTE_CUT, NOTE_NONE};
use crate::s3m::{Cell, Instrument, Pattern};
use tracing::debug;

/// Volume of a note without an instrument, or whose instrument can't be
/// resolved
pub const FULL_VOLUME: u8 = 64;

/// One time-slice across the four channels
///
/// Cells for the same channel within a row are merged field by field, later
/// fields replacing earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: [Cell; MAX_CHANNELS as usize],
}

impl Row {
    pub fn merge(&mut self, cell: &Cell) {
        let slot = &mut self.cells[cell.channel as usize];
        slot.channel = cell.channel;
        if cell.note.is_some() {
            slot.note = cell.note;
        }
        if cell.volume.is_some() {
            slot.volume = cell.volume;
        }
        if cell.effect.is_some() {
            slot.effect = cell.effect;
        }
    }

    pub fn is_silent(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.note.is_none() && c.volume.is_none() && c.effect.is_none())
    }
}

/// Group a pattern's cells into rows, flushing on every end-of-row marker
///
/// Cells after the last marker don't belong to a complete row and are dropped.
pub fn split_rows(pattern: &Pattern) -> Vec<Row> {
    let mut rows = Vec::with_capacity(pattern.row_count());
    let mut current = Row::default();

    for cell in &pattern.cells {
        if cell.is_end_of_row() {
            rows.push(std::mem::take(&mut current));
        } else {
            current.merge(cell);
        }
    }

    if !current.is_silent() {
        debug!("Dropping cells after the last row marker");
    }
    rows
}

/// Convert an S3M cell into encoder input for a channel with `lead`
///
/// `instrument` resolves 1-based instrument numbers for the default-volume
/// fallback. Without an explicit volume, a pitched note and a noise kit play
/// at their instrument's default volume, or at full volume when there is no
/// instrument to ask.
pub fn s3m_channel_input<'i, F>(cell: &Cell, lead: Lead, instrument: F) -> Result<ChannelInput, RowFault>
where
    F: Fn(u8) -> Option<&'i Instrument>,
{
    let mut input = ChannelInput {
        volume: cell.volume,
        effect: cell.effect,
        ..ChannelInput::default()
    };

    let Some(ni) = cell.note else {
        return Ok(input);
    };
    input.instrument = ni.instrument;

    input.note = match (ni.note, lead) {
        (NOTE_NONE, _) => None,
        (NOTE_CUT, _) => Some(Note::Cut),
        (note, Lead::Note) => Some(Note::Index(s3m_note_to_gb(note)?)),
        // The noise channel has no pitch
        (_, Lead::Kit) => None,
    };

    let sounds = match lead {
        Lead::Note => matches!(input.note, Some(Note::Index(_))),
        Lead::Kit => ni.instrument > 0 && ni.note != NOTE_CUT,
    };
    if sounds && input.volume.is_none() {
        let volume = match ni.instrument {
            0 => FULL_VOLUME,
            number => instrument(number)
                .map(|i| i.default_volume)
                .unwrap_or(FULL_VOLUME),
        };
        input.volume = Some(volume);
    }

    Ok(input)
}

/// Convert a Protracker cell into encoder input
///
/// "Set volume" becomes the command's volume instead of an effect. There is
/// no default-volume fallback for these songs.
pub fn mod_channel_input(cell: &ModCell, lead: Lead) -> Result<ChannelInput, RowFault> {
    let mut input = ChannelInput {
        instrument: cell.sample,
        ..ChannelInput::default()
    };

    if cell.effect.command == EFFECT_SET_VOLUME {
        input.volume = Some(cell.effect.param);
    } else if cell.has_effect() {
        input.effect = Some(cell.effect);
    }

    // Checked on every channel, even where the pitch is thrown away
    let note = period_to_note(cell.period)?;
    if lead == Lead::Note {
        input.note = note.map(Note::Index);
    }

    Ok(input)
}
