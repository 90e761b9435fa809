//! C source writer

use super::song::CompiledSong;
use crate::error::Result;
use std::io::Write;

/// Banner written at the top of every generated file
pub const BANNER: &str = "// File created by s3m2gbt";

/// Writes a compiled song as C arrays
pub struct CWriter<W: Write> {
    out: W,
}

impl<W: Write> CWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the whole translation unit
    pub fn write_song(&mut self, song: &CompiledSong) -> Result<()> {
        self.write_prologue()?;

        for pattern in &song.patterns {
            writeln!(
                self.out,
                "static const uint8_t {}_{}[] = {{",
                song.name, pattern.index
            )?;
            for row in &pattern.rows {
                self.write_bytes(row)?;
            }
            writeln!(self.out, "}};")?;
            writeln!(self.out)?;
        }

        if let Some(state) = &song.init_state {
            writeln!(self.out, "const uint8_t {}_init_state[] = {{", song.name)?;
            self.write_bytes(state)?;
            writeln!(self.out, "}};")?;
            writeln!(self.out)?;
        }

        self.write_orders(song)?;
        self.out.flush()?;
        Ok(())
    }

    fn write_prologue(&mut self) -> Result<()> {
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out)?;
        writeln!(self.out, "#include <stddef.h>")?;
        writeln!(self.out, "#include <stdint.h>")?;
        writeln!(self.out)?;
        Ok(())
    }

    /// One indented line of `0xNN,` items
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        write!(self.out, "    ")?;
        for b in bytes {
            write!(self.out, "0x{:02X},", b)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn write_orders(&mut self, song: &CompiledSong) -> Result<()> {
        writeln!(self.out, "const uint8_t *{}[] = {{", song.name)?;
        match song.init_state {
            Some(_) => writeln!(self.out, "    {}_init_state,", song.name)?,
            None => writeln!(self.out, "    NULL,")?,
        }
        for order in &song.orders {
            writeln!(self.out, "    {}_{},", song.name, order)?;
        }
        writeln!(self.out, "    NULL")?;
        writeln!(self.out, "}};")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render a song to a string
pub fn to_c_source(song: &CompiledSong) -> Result<String> {
    let mut writer = CWriter::new(Vec::new());
    writer.write_song(song)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}
