//! Bytecode row decoder

use super::commands::{command_len, flag, EffectId};
use crate::error::{Error, Result};
use serde::Serialize;

/// Channel that carries a kit byte instead of a note
const KIT_CHANNEL: u8 = 4;

/// The fields of one channel command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DecodedCommand {
    /// 1-based channel
    pub channel: u8,
    pub header: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kit: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<EffectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,
}

impl DecodedCommand {
    pub fn is_empty(&self) -> bool {
        self.header == 0
    }
}

/// Split a row stream into its four channel commands
pub fn decode_row(row: &[u8]) -> Result<[DecodedCommand; 4]> {
    let mut commands = [DecodedCommand::default(); 4];
    let mut pos = 0;

    for (i, command) in commands.iter_mut().enumerate() {
        let channel = i as u8 + 1;
        let header = *row
            .get(pos)
            .ok_or_else(|| Error::format(format!("row ends before channel {}", channel)))?;
        let len = command_len(header);
        let bytes = row.get(pos..pos + len).ok_or_else(|| {
            Error::format(format!("channel {} command is truncated", channel))
        })?;
        *command = decode_command(channel, bytes)?;
        pos += len;
    }

    if pos != row.len() {
        return Err(Error::format(format!(
            "{} trailing bytes after channel 4",
            row.len() - pos
        )));
    }
    Ok(commands)
}

/// Decode one command starting at `bytes[0]`
pub fn decode_command(channel: u8, bytes: &[u8]) -> Result<DecodedCommand> {
    let (&header, rest) = bytes
        .split_first()
        .ok_or_else(|| Error::format(format!("channel {} command is empty", channel)))?;
    let mut command = DecodedCommand {
        channel,
        header,
        ..DecodedCommand::default()
    };
    let mut fields = rest.iter().copied();
    let mut next = || {
        fields
            .next()
            .ok_or_else(|| Error::format("command shorter than its header"))
    };

    if header & flag::HAS_NOTE != 0 {
        let lead = next()?;
        if channel == KIT_CHANNEL {
            command.kit = Some(lead);
        } else {
            command.note = Some(lead);
        }
    }

    let has_instrument = header & flag::HAS_INSTRUMENT != 0;
    let has_effect = header & flag::HAS_EFFECT != 0;
    if has_instrument || has_effect {
        let shared = next()?;
        if has_instrument {
            command.instrument = Some(shared >> 4);
        }
        if has_effect {
            let id = shared & 0x0F;
            command.effect = Some(
                EffectId::from_u8(id)
                    .ok_or_else(|| Error::format(format!("unknown effect id {}", id)))?,
            );
            command.param = Some(next()?);
        }
    }

    if header & flag::HAS_VOLUME != 0 {
        command.volume = Some(header & flag::VOLUME_MASK);
    }

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_row() {
        let commands = decode_row(&[0, 0, 0, 0]).unwrap();
        assert!(commands.iter().all(DecodedCommand::is_empty));
        assert_eq!(commands[3].channel, 4);
    }

    #[test]
    fn test_mixed_row() {
        let row = [
            0xF8, 12, 0x11, 0x37, // ch 1: note, instrument, arpeggio, volume 8
            0x00, // ch 2
            0x40, 0x0A, 0x06, // ch 3: speed 6
            0x9F, 0x03, // ch 4: kit 3, volume 15
        ];
        let [c1, c2, c3, c4] = decode_row(&row).unwrap();
        assert_eq!(c1.note, Some(12));
        assert_eq!(c1.instrument, Some(1));
        assert_eq!(c1.effect, Some(EffectId::Arpeggio));
        assert_eq!(c1.param, Some(0x37));
        assert_eq!(c1.volume, Some(8));
        assert!(c2.is_empty());
        assert_eq!(c3.effect, Some(EffectId::Speed));
        assert_eq!(c3.instrument, None);
        assert_eq!(c4.kit, Some(3));
        assert_eq!(c4.note, None);
        assert_eq!(c4.volume, Some(15));
    }

    #[test]
    fn test_malformed_rows() {
        assert!(decode_row(&[0, 0, 0]).is_err());
        assert!(decode_row(&[0x80, 0, 0, 0, 0]).is_ok());
        assert!(decode_row(&[0xC0, 1, 0, 0, 0]).is_err());
        assert!(decode_row(&[0, 0, 0, 0, 0]).is_err());
        assert!(decode_row(&[0x40, 0x05, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_short_command() {
        assert!(matches!(decode_command(1, &[]), Err(Error::Format(_))));
        assert!(matches!(decode_command(2, &[0x80]), Err(Error::Format(_))));
        assert_eq!(decode_command(4, &[0x80, 7]).unwrap().kit, Some(7));
    }
}
