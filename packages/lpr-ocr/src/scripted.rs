use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::engine::{OcrEngine, OcrError, OcrInput, OcrOutput};
use crate::region::TextRegion;

/// Engine that replays canned candidates instead of looking at the image.
///
/// `fixed` answers every call the same way. `sequence` answers call `n` with
/// the `n`-th response and returns no candidates once the script runs out.
pub struct ScriptedEngine {
    fixed: Option<Vec<TextRegion>>,
    queue: Mutex<VecDeque<Vec<TextRegion>>>,
}

impl ScriptedEngine {
    pub fn fixed(regions: Vec<TextRegion>) -> Self {
        Self {
            fixed: Some(regions),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn sequence(responses: Vec<Vec<TextRegion>>) -> Self {
        Self {
            fixed: None,
            queue: Mutex::new(responses.into()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl OcrEngine for ScriptedEngine {
    async fn recognize(&self, _input: &OcrInput) -> Result<OcrOutput, OcrError> {
        if let Some(regions) = &self.fixed {
            return Ok(OcrOutput::from_regions(regions.clone()));
        }
        let next = self
            .queue
            .lock()
            .map_err(|e| OcrError::EngineError(e.to_string()))?
            .pop_front()
            .unwrap_or_default();
        Ok(OcrOutput::from_regions(next))
    }
}
