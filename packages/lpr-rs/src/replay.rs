//! Detections recorded by an upstream detector run, replayed frame by frame.
//!
//! The log is JSON:
//!
//! ```json
//! {"frames": [
//!   {"frame": 0,
//!    "vehicles": [{"bbox": {"x1": 0, "y1": 0, "x2": 400, "y2": 300}, "score": 0.91, "class_id": 2}],
//!    "plates":   [{"bbox": {"x1": 150, "y1": 220, "x2": 260, "y2": 250}, "score": 0.77}]}
//! ]}
//! ```
//!
//! Frames missing from the log have no detections.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::detection::{Detection, Detector};
use crate::frame::Frame;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameDetections {
    pub frame: u64,
    #[serde(default)]
    pub vehicles: Vec<Detection>,
    #[serde(default)]
    pub plates: Vec<Detection>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DetectionLogFile {
    frames: Vec<FrameDetections>,
}

#[derive(Debug, Default)]
pub struct DetectionLog {
    frames: HashMap<u64, FrameDetections>,
}

impl DetectionLog {
    /// Indexes `frames` by frame number; each frame may appear only once.
    pub fn from_frames(frames: Vec<FrameDetections>) -> Result<Self> {
        let mut by_frame = HashMap::with_capacity(frames.len());
        for entry in frames {
            let frame = entry.frame;
            anyhow::ensure!(
                by_frame.insert(frame, entry).is_none(),
                "frame {} appears more than once in the detection log",
                frame
            );
        }
        Ok(Self { frames: by_frame })
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let file: DetectionLogFile =
            serde_json::from_str(contents).context("failed to parse detection log")?;
        Self::from_frames(file.frames)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read detection log {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("in {}", path.display()))
    }

    pub fn frame(&self, frame: u64) -> Option<&FrameDetections> {
        self.frames.get(&frame)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum ReplayKind {
    Vehicles,
    Plates,
}

/// A [`Detector`] answering from a [`DetectionLog`].
pub struct ReplayDetector {
    log: Arc<DetectionLog>,
    kind: ReplayKind,
}

impl ReplayDetector {
    pub fn vehicles(log: Arc<DetectionLog>) -> Self {
        Self {
            log,
            kind: ReplayKind::Vehicles,
        }
    }

    pub fn plates(log: Arc<DetectionLog>) -> Self {
        Self {
            log,
            kind: ReplayKind::Plates,
        }
    }
}

impl Detector for ReplayDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        let Some(entry) = self.log.frame(frame.index) else {
            return Ok(Vec::new());
        };
        Ok(match self.kind {
            ReplayKind::Vehicles => entry.vehicles.clone(),
            ReplayKind::Plates => entry.plates.clone(),
        })
    }
}
