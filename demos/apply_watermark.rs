//! Watermark a single image with a line of text.
//!
//! Usage:
//! ```sh
//! cargo run --example apply_watermark -- input.jpg output.png "some text"
//! ```

use std::env;
use std::path::Path;
use std::process;

use watermark_studio::{ApplyOutcome, ExportResolution, ImageSession};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <input> <output> <text>", args[0]);
        process::exit(1);
    }

    let mut session = ImageSession::new();
    session.load(Path::new(&args[1])).expect("failed to load image");

    match session.apply_text_watermark(&args[3]) {
        Ok(ApplyOutcome::Applied) => {}
        Ok(ApplyOutcome::Skipped) => {
            eprintln!("Nothing to apply");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    session
        .export(Path::new(&args[2]), ExportResolution::Full)
        .expect("failed to export");
    println!("Done: {}", args[2]);
}
