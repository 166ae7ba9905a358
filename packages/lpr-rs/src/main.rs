mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Commands};
use lpr_rs::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

fn check(text: &str) -> i32 {
  let normalized = normalize(text);
  match try_correct(&normalized) {
    Some(corrected) => {
      println!("{} -> {}", normalized, corrected);
      0
    }
    None => {
      println!("{}: does not match the plate template", normalized);
      1
    }
  }
}

async fn run(args: Args) -> Result<i32> {
  match args.command {
    Commands::Version => {
      println!("lpr {}", env!("CARGO_PKG_VERSION"));
      Ok(0)
    }
    Commands::Check { text } => Ok(check(&text)),
    Commands::Process {
      frames,
      detections,
      output,
      config,
      ocr_concurrency,
      threshold,
      tesseract,
      verbose,
    } => {
      let mut config = match config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
      };
      if let Some(n) = ocr_concurrency {
        anyhow::ensure!(n >= 1, "--ocr-concurrency must be at least 1");
        config.ocr_concurrency = n;
      }
      if let Some(threshold) = threshold {
        config.binarize_threshold = threshold;
      }
      if let Some(binary) = tesseract {
        config.tesseract.binary = binary;
      }

      init_tracing(if verbose {
        "lpr_rs=debug,lpr_ocr=debug"
      } else {
        &config.log_filter
      });

      let mut source = ImageDirSource::new(&frames)?;
      let log = Arc::new(DetectionLog::load(&detections)?);
      info!(
        "{} frames in {}, detections for {} frames",
        source.remaining(),
        frames.display(),
        log.len()
      );

      let engine = TesseractEngine::new((&config.tesseract).into());
      let mut pipeline = FramePipeline::new(
        ReplayDetector::vehicles(log.clone()),
        ReplayDetector::plates(log),
        IouTracker::new(config.tracker.clone()),
        PlateReader::new(engine),
      )
      .with_options(PipelineOptions::from(&config));

      let stats = pipeline.run(&mut source).await?;
      let rows = write_csv(pipeline.store(), &output)?;
      println!(
        "Wrote {} records from {} frames to {}",
        rows,
        stats.frames,
        output.display()
      );
      Ok(0)
    }
  }
}

#[tokio::main]
async fn main() {
  let args = Args::parse();

  match run(args).await {
    Ok(code) => std::process::exit(code),
    Err(e) => {
      eprintln!("Error: {:#}", e);
      std::process::exit(1);
    }
  }
}
