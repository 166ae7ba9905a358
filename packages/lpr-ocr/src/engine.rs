use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::region::TextRegion;

/// Image handed to an OCR engine.
#[derive(Debug, Clone)]
pub enum OcrInput {
    FilePath(PathBuf),
    /// Encoded image (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// Raw 8-bit single channel pixels, row-major, `width * height` long.
    Luma {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
}

impl OcrInput {
    pub fn luma(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, OcrError> {
        if pixels.len() != width as usize * height as usize {
            return Err(OcrError::InvalidInput(format!(
                "expected {} pixels for {}x{}, got {}",
                width as usize * height as usize,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(OcrInput::Luma {
            width,
            height,
            pixels,
        })
    }
}

/// Candidates in engine order. The order is whatever the engine produced and
/// is not sorted by confidence.
#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    pub text: String,
    pub regions: Vec<TextRegion>,
}

impl OcrOutput {
    pub fn from_regions(regions: Vec<TextRegion>) -> Self {
        let text = regions
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        OcrOutput { text, regions }
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("unsupported operation")]
    Unsupported,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("engine error: {0}")]
    EngineError(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, input: &OcrInput) -> Result<OcrOutput, OcrError>;
}
