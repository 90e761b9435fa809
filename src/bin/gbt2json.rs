//! Compiled song to JSON dumper

use clap::Parser;
use s3m2gbt::compiler::read_module;
use s3m2gbt::gbt::SongJson;
use s3m2gbt::{CompileOptions, Compiler, Format};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gbt2json")]
#[command(version = "0.1.0")]
#[command(about = "Compile a module and dump the decoded GBT bytecode as JSON", long_about = None)]
struct Args {
    /// Input module (.s3m, .mod, optionally gzip-compressed)
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Song name used in the dump
    #[arg(short, long, default_value = "song")]
    name: String,

    /// Embed instruments 8-15 in the initial state
    #[arg(long)]
    export_instruments: bool,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let data = read_module(&args.input)?;
    let format = Format::detect(&args.input, &data)?;

    let options = CompileOptions {
        export_instruments: args.export_instruments,
        ..CompileOptions::default()
    };

    let song = Compiler::new(options).compile(&data, format, &args.name)?;
    let song_json = SongJson::new(&song, options)?;

    let json_string = if args.compact {
        serde_json::to_string(&song_json)?
    } else {
        serde_json::to_string_pretty(&song_json)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
