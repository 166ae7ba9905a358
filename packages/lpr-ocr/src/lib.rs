//! OCR engines for plate crops.
//!
//! [`OcrEngine`] is the seam the plate reader talks to. [`TesseractEngine`]
//! shells out to the `tesseract` executable and parses its TSV output;
//! [`ScriptedEngine`] replays canned candidates for tests and dry runs.
pub mod engine;
pub mod region;
pub mod scripted;
pub mod tesseract;

pub use engine::{OcrEngine, OcrError, OcrInput, OcrOutput};
pub use region::{BoundingBox, TextRegion};
pub use scripted::ScriptedEngine;
pub use tesseract::{parse_tsv, TesseractConfig, TesseractEngine};
