//! Per-frame driver tying detection, tracking, matching and OCR together.
//!
//! Each frame runs to completion before the next one is read: vehicle
//! detection, class filter, tracker update, plate detection, then for every
//! plate a containment match against the tracked vehicles, a crop, and a
//! plate read. A record is stored only when a plate both matched a vehicle
//! and produced a compliant read. Frames are independent; nothing is
//! smoothed or voted across them.
use anyhow::Result;
use futures::stream::{self, StreamExt};
use lpr_ocr::OcrInput;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::detection::{filter_vehicles, Detection, Detector, DEFAULT_VEHICLE_CLASSES};
use crate::frame::{Frame, FrameSource};
use crate::plate_reader::{PlateRead, PlateReader};
use crate::preprocess::{prepare_plate, DEFAULT_BINARIZE_THRESHOLD};
use crate::result_store::{FrameRecord, ResultStore};
use crate::tracker::{TrackedVehicle, Tracker};
use crate::vehicle_matcher::match_vehicle;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub vehicle_classes: Vec<u32>,
    pub binarize_threshold: u8,
    /// Plates of one frame read concurrently; 1 reads them one after another
    pub ocr_concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            vehicle_classes: DEFAULT_VEHICLE_CLASSES.to_vec(),
            binarize_threshold: DEFAULT_BINARIZE_THRESHOLD,
            ocr_concurrency: 1,
        }
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            vehicle_classes: config.vehicle_classes.clone(),
            binarize_threshold: config.binarize_threshold,
            ocr_concurrency: config.ocr_concurrency,
        }
    }
}

/// Counters over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    /// Vehicle detections left after the class filter
    pub vehicles: u64,
    pub tracked: u64,
    pub plates: u64,
    /// Plates strictly inside a tracked vehicle
    pub plates_matched: u64,
    /// Matched plates with a compliant OCR read
    pub plates_read: u64,
    /// Reads that replaced an earlier read of the same vehicle in the same frame
    pub overwrites: u64,
}

struct PlateJob {
    vehicle: TrackedVehicle,
    plate: Detection,
    input: OcrInput,
}

pub struct FramePipeline {
    vehicle_detector: Box<dyn Detector>,
    plate_detector: Box<dyn Detector>,
    tracker: Box<dyn Tracker>,
    reader: PlateReader,
    options: PipelineOptions,
    store: ResultStore,
    stats: PipelineStats,
}

impl FramePipeline {
    pub fn new(
        vehicle_detector: impl Detector + 'static,
        plate_detector: impl Detector + 'static,
        tracker: impl Tracker + 'static,
        reader: PlateReader,
    ) -> Self {
        Self {
            vehicle_detector: Box::new(vehicle_detector),
            plate_detector: Box::new(plate_detector),
            tracker: Box::new(tracker),
            reader,
            options: PipelineOptions::default(),
            store: ResultStore::new(),
            stats: PipelineStats::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Processes one frame and returns how many records it produced.
    pub async fn process_frame(&mut self, frame: &Frame) -> Result<usize> {
        self.stats.frames += 1;

        let detections = self.vehicle_detector.detect(frame)?;
        let vehicles = filter_vehicles(&detections, &self.options.vehicle_classes);
        self.stats.vehicles += vehicles.len() as u64;

        let tracked = self.tracker.update(&vehicles);
        self.stats.tracked += tracked.len() as u64;

        let plates = self.plate_detector.detect(frame)?;
        self.stats.plates += plates.len() as u64;

        let mut jobs = Vec::new();
        for plate in plates {
            let Some(vehicle) = match_vehicle(&plate.bbox, &tracked) else {
                debug!(frame = frame.index, "plate {} outside every tracked vehicle", plate.bbox);
                continue;
            };
            self.stats.plates_matched += 1;
            let Some(input) =
                prepare_plate(&frame.image, &plate.bbox, self.options.binarize_threshold)
            else {
                debug!(frame = frame.index, "plate {} has no pixels in frame", plate.bbox);
                continue;
            };
            jobs.push(PlateJob {
                vehicle: *vehicle,
                plate,
                input,
            });
        }

        let reader = &self.reader;
        let reads: Vec<Option<PlateRead>> = stream::iter(&jobs)
            .map(|job| async move {
                match reader.read(&job.input).await {
                    Ok(read) => read,
                    Err(e) => {
                        warn!(frame = frame.index, car_id = job.vehicle.id, "OCR failed: {e}");
                        None
                    }
                }
            })
            .buffered(self.options.ocr_concurrency.max(1))
            .collect()
            .await;

        let mut written = 0;
        for (job, read) in jobs.into_iter().zip(reads) {
            let Some(read) = read else {
                debug!(frame = frame.index, car_id = job.vehicle.id, "no compliant plate text");
                continue;
            };
            self.stats.plates_read += 1;
            debug!(frame = frame.index, car_id = job.vehicle.id, "read plate {}", read.text);
            let replaced = self.store.insert(FrameRecord {
                frame: frame.index,
                car_id: job.vehicle.id,
                car_bbox: job.vehicle.bbox,
                plate_bbox: job.plate.bbox,
                plate_score: job.plate.score,
                text: read.text,
                text_score: read.confidence,
            });
            if replaced.is_some() {
                self.stats.overwrites += 1;
            } else {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Drains `source`, stopping at end of stream.
    ///
    /// A frame that cannot be acquired ends the stream like exhaustion does;
    /// records gathered so far stay in the store.
    pub async fn run(&mut self, source: &mut dyn FrameSource) -> Result<PipelineStats> {
        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    warn!("frame acquisition failed after {} frames, stopping: {e:#}", self.stats.frames);
                    break;
                }
            };
            self.process_frame(&frame).await?;
        }
        info!(
            "processed {} frames: {} plates, {} matched, {} read, {} records",
            self.stats.frames,
            self.stats.plates,
            self.stats.plates_matched,
            self.stats.plates_read,
            self.store.len()
        );
        Ok(self.stats.clone())
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

}
