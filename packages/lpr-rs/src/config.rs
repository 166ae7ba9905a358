//! Run configuration, read from YAML. Every key is optional.
use anyhow::{Context, Result};
use lpr_ocr::TesseractConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detection::DEFAULT_VEHICLE_CLASSES;
use crate::preprocess::DEFAULT_BINARIZE_THRESHOLD;
use crate::tracker::TrackerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Detector class ids treated as vehicles
    pub vehicle_classes: Vec<u32>,
    /// Gray level above which plate pixels turn black before OCR
    pub binarize_threshold: u8,
    /// Plates of one frame sent to OCR at the same time
    pub ocr_concurrency: usize,
    pub tracker: TrackerConfig,
    pub tesseract: TesseractSettings,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vehicle_classes: DEFAULT_VEHICLE_CLASSES.to_vec(),
            binarize_threshold: DEFAULT_BINARIZE_THRESHOLD,
            ocr_concurrency: 1,
            tracker: TrackerConfig::default(),
            tesseract: TesseractSettings::default(),
            log_filter: "lpr_rs=info,lpr_ocr=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractSettings {
    pub binary: PathBuf,
    pub psm: u8,
    pub whitelist: Option<String>,
}

impl Default for TesseractSettings {
    fn default() -> Self {
        let defaults = TesseractConfig::default();
        Self {
            binary: defaults.binary,
            psm: defaults.psm,
            whitelist: defaults.whitelist,
        }
    }
}

impl From<&TesseractSettings> for TesseractConfig {
    fn from(settings: &TesseractSettings) -> Self {
        TesseractConfig {
            binary: settings.binary.clone(),
            psm: settings.psm,
            whitelist: settings.whitelist.clone(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: PipelineConfig = serde_yaml::from_str(contents)?;
        anyhow::ensure!(config.ocr_concurrency >= 1, "ocr_concurrency must be at least 1");
        Ok(config)
    }
}
