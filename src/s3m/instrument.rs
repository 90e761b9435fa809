//! Instrument records

use super::cursor::ByteCursor;
use super::header::{self, instrument as field, paragraph};
use crate::error::{Error, Result};

/// A sampled instrument
///
/// Only the descriptor is materialized; the PCM payload stays in the module
/// buffer and is resolved through `sample_offset` on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    /// Sample name as shown in the tracker
    pub name: String,
    /// DOS filename field
    pub filename: String,
    /// Default volume (0-64)
    pub default_volume: u8,
    /// PCM length in bytes
    pub length: usize,
    /// Byte offset of the PCM data in the module buffer
    pub sample_offset: usize,
}

impl Instrument {
    /// Slice the raw PCM bytes out of the module buffer
    pub fn sample<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        data.get(self.sample_offset..self.sample_offset + self.length)
            .ok_or_else(|| {
                Error::format(format!(
                    "sample '{}' data (0x{:X}+{}) is out of bounds",
                    self.name, self.sample_offset, self.length
                ))
            })
    }
}

/// Resolve every instrument pointer
///
/// Empty pointers and non-sample (AdLib) slots load as `None`; they are legal
/// in the file but carry nothing this converter can use.
pub fn load_instruments(data: &[u8], pointers: &[u16]) -> Result<Vec<Option<Instrument>>> {
    pointers
        .iter()
        .map(|&pointer| {
            if pointer == 0 {
                Ok(None)
            } else {
                load_instrument(data, paragraph(pointer as u32))
            }
        })
        .collect()
}

fn load_instrument(data: &[u8], base: usize) -> Result<Option<Instrument>> {
    let mut cursor = ByteCursor::at(data, base + field::TYPE)?;
    if cursor.read_u8()? != header::INSTRUMENT_SAMPLE {
        return Ok(None);
    }

    cursor.seek(base + field::FILENAME)?;
    let filename = cursor.read_string(12)?;

    cursor.seek(base + field::SAMPLE_POINTER)?;
    let sample_pointer = cursor.read_mixed_u24()?;

    cursor.seek(base + field::LENGTH)?;
    let length = cursor.read_u32le()? as usize;

    cursor.seek(base + field::VOLUME)?;
    let default_volume = cursor.read_u8()?;

    cursor.seek(base + field::NAME)?;
    let name = cursor.read_string(28)?;

    cursor.seek(base + field::MAGIC)?;
    if cursor.read_bytes(4)? != header::SAMPLE_MAGIC {
        return Err(Error::format(format!(
            "instrument '{}' at 0x{:X} has an invalid magic (expected 'SCRS')",
            name, base
        )));
    }

    Ok(Some(Instrument {
        name,
        filename,
        default_volume,
        length,
        sample_offset: paragraph(sample_pointer),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: u8, magic: &[u8; 4]) -> Vec<u8> {
        let mut data = vec![0u8; 0x60 + 32];
        data[0x10] = kind;
        data[0x11..0x15].copy_from_slice(b"A.RA");
        // Sample at paragraph 6 => 0x60
        data[0x10 + field::SAMPLE_POINTER] = 0x00;
        data[0x10 + field::SAMPLE_POINTER + 1] = 0x06;
        data[0x10 + field::LENGTH] = 32;
        data[0x10 + field::VOLUME] = 40;
        data[0x10 + field::NAME..0x10 + field::NAME + 4].copy_from_slice(b"wave");
        data[0x10 + field::MAGIC..0x10 + field::MAGIC + 4].copy_from_slice(magic);
        for (i, b) in data[0x60..].iter_mut().enumerate() {
            *b = i as u8;
        }
        data
    }

    #[test]
    fn test_load_sample_instrument() {
        let data = record(1, b"SCRS");
        let instruments = load_instruments(&data, &[0, 1]).unwrap();
        assert_eq!(instruments[0], None);

        let inst = instruments[1].as_ref().unwrap();
        assert_eq!(inst.name, "wave");
        assert_eq!(inst.filename, "A.RA");
        assert_eq!(inst.default_volume, 40);
        assert_eq!(inst.length, 32);
        assert_eq!(inst.sample_offset, 0x60);
        assert_eq!(inst.sample(&data).unwrap()[..3], [0, 1, 2]);
    }

    #[test]
    fn test_adlib_instrument_is_absent() {
        let data = record(2, b"SCRI");
        let instruments = load_instruments(&data, &[1]).unwrap();
        assert_eq!(instruments, vec![None]);
    }

    #[test]
    fn test_bad_sample_magic() {
        let data = record(1, b"XXXX");
        assert!(matches!(
            load_instruments(&data, &[1]),
            Err(Error::Format(_))
        ));
    }
}
