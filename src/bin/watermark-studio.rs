use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use watermark_studio::{
    compose, default_output_path, ApplyOutcome, ExportOutcome, ExportResolution, ImageSession,
};

#[derive(Parser)]
#[command(
    name = "watermark-studio",
    about = "Overlay a text or logo watermark on an image",
    version,
    after_help = "Simple usage: watermark-studio photo.jpg --text \"© example\"\n\n\
                  The watermark is composited against the full-resolution image;\n\
                  pass --display-resolution to export the display-fitted copy instead."
)]
struct Cli {
    /// Input image file
    input: String,

    /// Watermark text (bottom-left, outlined)
    #[arg(short, long)]
    text: Option<String>,

    /// Logo image to composite at the bottom-left corner
    #[arg(short, long)]
    logo: Option<String>,

    /// Text fill color as #RRGGBB hex
    #[arg(short, long, default_value = "#FFFFFF")]
    color: String,

    /// Font file for text watermarks (default: first usable system font)
    #[arg(long)]
    font: Option<String>,

    /// Output file (default: {name}_watermarked.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// Export the display-fitted working image instead of full resolution
    #[arg(long)]
    display_resolution: bool,

    /// Display bound width in pixels
    #[arg(long, default_value_t = compose::DISPLAY_MAX_W)]
    max_width: u32,

    /// Display bound height in pixels
    #[arg(long, default_value_t = compose::DISPLAY_MAX_H)]
    max_height: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if cli.text.is_some() && cli.logo.is_some() {
        eprintln!("Error: Cannot specify both --text and --logo");
        process::exit(1);
    }
    if cli.text.is_none() && cli.logo.is_none() {
        eprintln!("Error: One of --text or --logo is required");
        process::exit(1);
    }

    let Some(color) = compose::parse_hex_color(&cli.color) else {
        eprintln!("Error: Invalid color {:?} (expected #RRGGBB)", cli.color);
        process::exit(1);
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    let mut session = ImageSession::new();
    session.set_font_color(color);
    if let Some(font) = &cli.font {
        session.set_font_path(Path::new(font));
    }
    if cli.max_width != compose::DISPLAY_MAX_W || cli.max_height != compose::DISPLAY_MAX_H {
        session.on_viewport_resize(cli.max_width, cli.max_height);
    }

    if let Err(e) = session.load(input_path) {
        eprintln!("[FAIL] {}: {e}", cli.input);
        process::exit(1);
    }

    let outcome = if let Some(text) = &cli.text {
        session.apply_text_watermark(text)
    } else if let Some(logo) = &cli.logo {
        session.apply_logo_watermark(Path::new(logo))
    } else {
        unreachable!("clap guard ensures one watermark source")
    };

    match outcome {
        Ok(ApplyOutcome::Applied) => {}
        Ok(ApplyOutcome::Skipped) => {
            if !cli.quiet {
                eprintln!("[SKIP] {}: nothing to apply (blank watermark)", cli.input);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", cli.input);
            process::exit(1);
        }
    }

    let output_path = match &cli.output {
        Some(o) => PathBuf::from(o),
        None => default_output_path(input_path),
    };
    let resolution = if cli.display_resolution {
        ExportResolution::Display
    } else {
        ExportResolution::Full
    };

    match session.export(&output_path, resolution) {
        Ok(ExportOutcome::Saved) => {
            if !cli.quiet {
                eprintln!("[OK] {}", output_path.display());
            }
        }
        Ok(ExportOutcome::NothingToSave) => {
            if !cli.quiet {
                eprintln!("[SKIP] {}: nothing to save", cli.input);
            }
        }
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", output_path.display());
            process::exit(1);
        }
    }
}
