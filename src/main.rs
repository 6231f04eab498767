use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use clap::Parser;
use halftone::intake::{UploadStore, read_upload};
use halftone::{Rasterizer, process_to_image};

#[derive(Parser)]
#[command(name = "halftone")]
#[command(about = "Fade, shrink and rasterize an SVG to an opaque BMP", long_about = None)]
struct Cli {
    /// Input SVG file
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Drop paths whose bounding-box diagonal is below this value
    #[arg(long)]
    min_diag: Option<f64>,

    /// Write the bitmap as base64 text instead of raw bytes
    #[arg(long)]
    base64: bool,

    /// Keep a copy of the input in this directory
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Do not load system fonts (text is not drawn)
    #[arg(long)]
    no_system_fonts: bool,

    /// Print size and pass statistics
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let input = read_upload(&cli.input)?;
    if let Some(dir) = &cli.upload_dir {
        UploadStore::new(dir).save(&cli.input, &input)?;
    }

    let rasterizer = if cli.no_system_fonts {
        Rasterizer::default()
    } else {
        Rasterizer::with_system_fonts()
    };

    let (image, report) = process_to_image(&rasterizer, &input, cli.min_diag)?;
    let bmp = image.to_bmp()?;

    let output = if cli.base64 {
        BASE64_STANDARD.encode(&bmp).into_bytes()
    } else {
        bmp
    };

    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(&output)?;
    } else {
        fs::write(&cli.output, &output)?;
    }

    if cli.stats {
        eprintln!(
            "{} bytes -> {}x{} bitmap ({} bytes)",
            input.len(),
            image.width(),
            image.height(),
            output.len()
        );
        eprintln!(
            "{} paints faded, {} paths scaled, {} paths pruned",
            report.paints_faded, report.paths_scaled, report.paths_pruned
        );
    }

    Ok(())
}
