pub mod cursor;
pub mod header;
pub mod instrument;
pub mod module;
pub mod pattern;

pub use cursor::ByteCursor;
pub use instrument::Instrument;
pub use module::S3mModule;
pub use pattern::{Cell, Effect, NoteInstrument, Pattern};
