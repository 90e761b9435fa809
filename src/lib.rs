pub mod compiler;
pub mod error;
pub mod gbt;
pub mod protracker;
pub mod s3m;

pub use compiler::{convert, CompileOptions, Compiler, Format};
pub use error::Error;
