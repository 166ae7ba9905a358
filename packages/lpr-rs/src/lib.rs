//! # lpr-rs
//!
//! License plate extraction from vehicle video. Each frame fuses three
//! signals: vehicle detections, a tracker's persistent vehicle identities,
//! and plate detections. Plates are assigned to the vehicle that contains
//! them, read with OCR, checked against a fixed seven character template,
//! corrected, and stored per frame and vehicle for CSV export.
//!
//! ## Features
//!
//! - **Plate Template Check**: letter, letter, digit, digit, letter, letter, letter, tolerating known OCR confusions
//! - **Position-Aware Correction**: `O`/`0`, `I`/`1`, `J`/`3`, `A`/`4`, `G`/`6`, `S`/`5` fixed per slot
//! - **Containment Matching**: a plate belongs to the first tracked vehicle that strictly contains it
//! - **Pluggable Collaborators**: detectors, tracker and OCR engine sit behind traits
//! - **CSV Export**: one row per frame and vehicle with bracketed bounding boxes
//!
//! ## Quick Start
//!
//! ```ignore
//! use lpr_rs::prelude::*;
//!
//! assert!(is_compliant("4B1OCDE"));
//! assert_eq!(correct("4B1OCDE"), "AB10CDE");
//!
//! let log = std::sync::Arc::new(DetectionLog::load("detections.json")?);
//! let mut pipeline = FramePipeline::new(
//!     ReplayDetector::vehicles(log.clone()),
//!     ReplayDetector::plates(log),
//!     IouTracker::default(),
//!     PlateReader::new(TesseractEngine::default()),
//! );
//! let mut frames = ImageDirSource::new("frames")?;
//! pipeline.run(&mut frames).await?;
//! write_csv(pipeline.store(), "test.csv")?;
//! ```

pub mod config;
pub mod csv_export;
pub mod detection;
pub mod frame;
pub mod geometry;
pub mod pipeline;
pub mod plate_corrector;
pub mod plate_format;
pub mod plate_reader;
pub mod preprocess;
pub mod replay;
pub mod result_store;
pub mod tracker;
pub mod vehicle_matcher;

// Re-export commonly used types at the root level
pub use config::{PipelineConfig, TesseractSettings};
pub use csv_export::{parse_bbox, read_csv, read_records, write_csv, write_records};
pub use detection::{filter_vehicles, Detection, Detector, VehicleClass, DEFAULT_VEHICLE_CLASSES};
pub use frame::{Frame, FrameSource, ImageDirSource, MemorySource};
pub use geometry::BoundingBox;
pub use pipeline::{FramePipeline, PipelineOptions, PipelineStats};
pub use plate_corrector::{correct, try_correct};
pub use plate_format::{is_compliant, normalize};
pub use plate_reader::{first_compliant, PlateRead, PlateReader};
pub use preprocess::prepare_plate;
pub use replay::{DetectionLog, FrameDetections, ReplayDetector};
pub use result_store::{FrameRecord, ResultStore};
pub use tracker::{IouTracker, ScoredBox, TrackedVehicle, Tracker, TrackerConfig};
pub use vehicle_matcher::match_vehicle;

pub use lpr_ocr::{OcrEngine, OcrError, OcrInput, OcrOutput, ScriptedEngine, TesseractEngine, TextRegion};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use lpr_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        correct, filter_vehicles, first_compliant, is_compliant, match_vehicle, normalize,
        prepare_plate, read_csv, try_correct, write_csv, BoundingBox, Detection, DetectionLog,
        Detector, Frame, FramePipeline, FrameRecord, FrameSource, ImageDirSource, IouTracker,
        MemorySource, OcrEngine, OcrError, OcrInput, OcrOutput, PipelineConfig, PipelineOptions,
        PipelineStats, PlateRead, PlateReader, ReplayDetector, ResultStore, ScoredBox,
        ScriptedEngine, TesseractEngine, TextRegion, TrackedVehicle, Tracker, TrackerConfig,
    };
}
