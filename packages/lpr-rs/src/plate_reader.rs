//! Turns OCR candidates for a plate crop into at most one corrected plate.
use lpr_ocr::{OcrEngine, OcrError, OcrInput, TextRegion};
use tracing::debug;

use crate::plate_corrector::correct;
use crate::plate_format::{is_compliant, normalize};

/// A plate string that passed the template check, after correction, with
/// the OCR confidence of the candidate it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateRead {
    pub text: String,
    pub confidence: f32,
}

pub struct PlateReader {
    engine: Box<dyn OcrEngine>,
}

impl PlateReader {
    pub fn new(engine: impl OcrEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    /// Runs OCR once and keeps the first compliant candidate.
    ///
    /// `Ok(None)` is the ordinary outcome for an unreadable crop.
    pub async fn read(&self, input: &OcrInput) -> Result<Option<PlateRead>, OcrError> {
        let output = self.engine.recognize(input).await?;
        Ok(first_compliant(&output.regions))
    }
}

/// Candidates are tried in the order given. A later candidate with a higher
/// confidence never displaces an earlier compliant one.
pub fn first_compliant(regions: &[TextRegion]) -> Option<PlateRead> {
    regions.iter().find_map(|region| {
        let text = normalize(&region.text);
        if !is_compliant(&text) {
            debug!("rejected OCR candidate {:?}", region.text);
            return None;
        }
        Some(PlateRead {
            text: correct(&text),
            confidence: region.confidence.unwrap_or(0.0),
        })
    })
}
