use clap::Parser;
use s3m2gbt::{CompileOptions, Compiler, Format};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "s3m2gbt")]
#[command(version = "0.1.0")]
#[command(about = "Convert S3M (or legacy MOD) songs into GBT Player C sources", long_about = None)]
struct Args {
    /// Input module (.s3m, .mod, optionally gzip-compressed)
    input: PathBuf,

    /// Song name, used as the C identifier prefix
    name: String,

    /// Output C file (defaults to <name>.c)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Embed instruments 8-15 as channel 3 waveforms
    #[arg(long)]
    export_instruments: bool,

    /// Convert speeds from 50 Hz to 60 Hz (default for MOD files)
    #[arg(long, conflicts_with = "no_speed_conversion")]
    speed_conversion: bool,

    /// Keep speeds as they are (default for S3M files)
    #[arg(long)]
    no_speed_conversion: bool,

    /// Input format, detected from the extension or signature if omitted
    #[arg(short, long)]
    format: Option<Format>,
}

fn main() -> Result<(), s3m2gbt::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let speed_conversion = if args.speed_conversion {
        Some(true)
    } else if args.no_speed_conversion {
        Some(false)
    } else {
        None
    };
    let options = CompileOptions {
        speed_conversion,
        export_instruments: args.export_instruments,
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.c", args.name)));
    Compiler::new(options).compile_file(&args.input, &output, &args.name, args.format)?;

    tracing::info!("Done!");
    Ok(())
}
