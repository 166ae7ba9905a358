//! Command line arguments backing the `lpr` binary.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "lpr",
  about = "Extract license plates of tracked vehicles from video frames",
  version
)]
pub struct Args {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Run the plate pipeline over a directory of frames and export a CSV
  Process {
    /// Directory of frame images, read in file name order
    #[arg(long, short = 'f')]
    frames: PathBuf,

    /// JSON detection log with per-frame vehicle and plate boxes
    #[arg(long, short = 'd')]
    detections: PathBuf,

    /// Output CSV path
    #[arg(long, short = 'o', default_value = "test.csv")]
    output: PathBuf,

    /// YAML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Plates of one frame sent to OCR concurrently
    #[arg(long)]
    ocr_concurrency: Option<usize>,

    /// Binarization threshold applied to plate crops
    #[arg(long)]
    threshold: Option<u8>,

    /// Path to the tesseract executable
    #[arg(long)]
    tesseract: Option<PathBuf>,

    /// Log per-frame decisions
    #[arg(long, short = 'v')]
    verbose: bool,
  },
  /// Check a plate string against the template and show its correction
  Check {
    /// Plate text as read by OCR
    text: String,
  },
}
