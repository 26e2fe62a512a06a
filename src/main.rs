use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use sim8086::format::OutputFormat;
use sim8086::{linear, Sim8086Decoder};

/// sim8086 - 8086 disassembler
#[derive(Parser, Debug)]
#[command(name = "sim8086", version, about = "Disassemble raw 8086 machine code")]
struct Args {
    /// Path to the raw binary image
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the listing to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let image = sim8086::read_image(&args.input)
        .with_context(|| format!("could not read file {}", args.input.display()))?;
    info!("Loaded {} bytes from {}", image.len(), args.input.display());

    let rendered = match args.format {
        OutputFormat::Text => {
            linear::listing_for(&args.input, &image).context("disassembly error")?
        }
        format => {
            let disassembly = linear::run(&image, &Sim8086Decoder).context("disassembly error")?;
            info!("Decoded {} instructions", disassembly.instruction_count());
            format
                .formatter()
                .format(&disassembly)
                .with_context(|| format!("could not render {format} output"))?
        }
    };

    match args.output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("could not write {}", path.display()))?;
            info!("Wrote listing to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
