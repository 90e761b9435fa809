//! S3M song header parsing

use super::cursor::ByteCursor;
use super::header::{self, offset};
use super::instrument::{load_instruments, Instrument};
use super::pattern::{load_pattern, Pattern};
use crate::error::{Error, Result};

/// A parsed Scream Tracker 3 module
///
/// The module borrows the file buffer; patterns and sample data are resolved
/// from it through their stored pointers when needed.
#[derive(Debug, Clone)]
pub struct S3mModule<'a> {
    data: &'a [u8],
    pub name: String,
    /// Ticks per row at song start
    pub initial_speed: u8,
    pub initial_tempo: u8,
    /// Per-channel pan (0-15) of channels 1-4
    pub channel_pans: [u8; 4],
    /// Whether the file declared custom panning
    pub custom_pan: bool,
    /// Pattern indices in play order; may contain markers (254/255)
    pub orders: Vec<u8>,
    /// Instruments by 0-based slot; `None` for empty and AdLib slots
    pub instruments: Vec<Option<Instrument>>,
    pattern_pointers: Vec<u16>,
}

impl<'a> S3mModule<'a> {
    /// Parse and validate the song header
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        cursor.seek(offset::SONG_NAME)?;
        let name = cursor.read_string(28)?;

        cursor.seek(offset::MAGIC)?;
        if cursor.read_bytes(4)? != header::SONG_MAGIC {
            return Err(Error::format("invalid magic (expected 'SCRM')"));
        }
        cursor.seek(offset::EOF_MARKER)?;
        if cursor.read_u8()? != header::EOF_MARKER {
            return Err(Error::format("invalid header marker (expected 0x1A)"));
        }

        cursor.seek(offset::ORDER_COUNT)?;
        let order_count = cursor.read_u16le()? as usize;
        let instrument_count = cursor.read_u16le()? as usize;
        let pattern_count = cursor.read_u16le()? as usize;

        cursor.seek(offset::INITIAL_SPEED)?;
        let initial_speed = cursor.read_u8()?;
        let initial_tempo = cursor.read_u8()?;
        if initial_tempo != header::REQUIRED_TEMPO {
            return Err(Error::format(format!(
                "tempo must be {} (found {})",
                header::REQUIRED_TEMPO,
                initial_tempo
            )));
        }
        if initial_speed == 0 {
            return Err(Error::format("initial speed must not be zero"));
        }

        cursor.seek(offset::DEFAULT_PAN)?;
        let custom_pan = cursor.read_u8()? == header::CUSTOM_PAN_FLAG;

        cursor.seek(offset::CHANNEL_SETTINGS)?;
        let settings = cursor.read_bytes(header::CHANNEL_SLOTS)?;
        for (i, &setting) in settings.iter().take(4).enumerate() {
            if setting >= header::CHANNEL_DISABLED_MIN {
                return Err(Error::format(format!(
                    "channel {} must be enabled (setting 0x{:02X})",
                    i + 1,
                    setting
                )));
            }
        }

        cursor.seek(offset::ORDERS)?;
        let orders = cursor.read_bytes(order_count)?.to_vec();

        let instrument_pointers = read_pointers(&mut cursor, instrument_count)?;
        let pattern_pointers = read_pointers(&mut cursor, pattern_count)?;

        let mut channel_pans = [header::CENTER_PAN; 4];
        if custom_pan {
            let table = cursor.read_bytes(header::CHANNEL_SLOTS)?;
            for (pan, &entry) in channel_pans.iter_mut().zip(table) {
                if entry & header::PAN_ENTRY_VALID != 0 {
                    *pan = entry & 0x0F;
                }
            }
        }

        let instruments = load_instruments(data, &instrument_pointers)?;

        Ok(Self {
            data,
            name,
            initial_speed,
            initial_tempo,
            channel_pans,
            custom_pan,
            orders,
            instruments,
            pattern_pointers,
        })
    }

    /// The whole file buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of patterns declared in the header
    pub fn pattern_count(&self) -> usize {
        self.pattern_pointers.len()
    }

    /// Decode pattern `index`
    pub fn pattern(&self, index: usize) -> Result<Pattern> {
        let pointer = *self.pattern_pointers.get(index).ok_or_else(|| {
            Error::format(format!(
                "pattern {} out of range ({} patterns)",
                index,
                self.pattern_count()
            ))
        })?;
        load_pattern(self.data, pointer)
    }

    /// Look up an instrument by its 1-based tracker number
    pub fn instrument(&self, number: u8) -> Option<&Instrument> {
        let slot = (number as usize).checked_sub(1)?;
        self.instruments.get(slot)?.as_ref()
    }

    /// Order entries that point at real patterns
    pub fn valid_orders(&self) -> impl Iterator<Item = usize> + '_ {
        self.orders
            .iter()
            .map(|&o| o as usize)
            .filter(move |&o| o < self.pattern_count())
    }
}

fn read_pointers(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<u16>> {
    (0..count).map(|_| cursor.read_u16le()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Header with 3 orders, no instruments and 2 patterns
    fn image() -> Vec<u8> {
        let mut data = vec![0u8; 0x60];
        data[..5].copy_from_slice(b"intro");
        data[offset::EOF_MARKER] = header::EOF_MARKER;
        data[offset::ORDER_COUNT] = 3;
        data[offset::ORDER_COUNT + 4] = 2;
        data[offset::MAGIC..offset::MAGIC + 4].copy_from_slice(header::SONG_MAGIC);
        data[offset::INITIAL_SPEED] = 4;
        data[offset::INITIAL_TEMPO] = header::REQUIRED_TEMPO;
        data[offset::CHANNEL_SETTINGS..offset::CHANNEL_SETTINGS + 32].fill(0xFF);
        data[offset::CHANNEL_SETTINGS..offset::CHANNEL_SETTINGS + 4].copy_from_slice(&[0, 1, 8, 9]);
        // Orders, then two null pattern pointers
        data.extend_from_slice(&[1, 7, 0xFF, 0, 0, 0, 0]);
        data
    }

    #[test]
    fn test_parse_header() {
        let data = image();
        let module = S3mModule::parse(&data).unwrap();
        assert_eq!(module.name, "intro");
        assert_eq!(module.initial_speed, 4);
        assert_eq!(module.orders, vec![1, 7, 0xFF]);
        assert_eq!(module.pattern_count(), 2);
        assert_eq!(module.valid_orders().collect::<Vec<_>>(), vec![1]);
        assert_eq!(module.channel_pans, [header::CENTER_PAN; 4]);
        assert!(!module.custom_pan);
        assert_eq!(module.pattern(1).unwrap().row_count(), 64);
        assert!(module.pattern(2).is_err());
        assert!(module.instrument(1).is_none());
        assert!(module.instrument(0).is_none());
    }

    #[test]
    fn test_custom_pan_table() {
        let mut data = image();
        data[offset::DEFAULT_PAN] = header::CUSTOM_PAN_FLAG;
        let mut table = [0u8; 32];
        table[0] = header::PAN_ENTRY_VALID | 3;
        // No valid bit: stays centered
        table[1] = 12;
        table[3] = header::PAN_ENTRY_VALID | 15;
        data.extend_from_slice(&table);

        let module = S3mModule::parse(&data).unwrap();
        assert!(module.custom_pan);
        assert_eq!(module.channel_pans, [3, 8, 8, 15]);
    }

    #[test]
    fn test_rejects_zero_speed() {
        let mut data = image();
        data[offset::INITIAL_SPEED] = 0;
        assert!(matches!(S3mModule::parse(&data), Err(Error::Format(_))));
    }

    #[test]
    fn test_rejects_missing_marker() {
        let mut data = image();
        data[offset::EOF_MARKER] = 0;
        assert!(matches!(S3mModule::parse(&data), Err(Error::Format(_))));
    }
}
