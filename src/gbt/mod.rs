pub mod commands;
pub mod json;
pub mod reader;
pub mod song;
pub mod writer;

pub use commands::{Command, EffectId};
pub use json::SongJson;
pub use reader::{decode_row, DecodedCommand};
pub use song::{CompiledPattern, CompiledSong};
pub use writer::{to_c_source, CWriter};
