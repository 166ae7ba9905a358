//! Detector output and the vehicle class filter applied before tracking.
use serde::{Deserialize, Serialize};

use crate::frame::Frame;
use crate::geometry::BoundingBox;
use crate::tracker::ScoredBox;

/// COCO detector classes treated as vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    Car,
    Motorcycle,
    Bus,
    Truck,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Car,
        VehicleClass::Motorcycle,
        VehicleClass::Bus,
        VehicleClass::Truck,
    ];

    /// COCO class id of this vehicle kind.
    pub const fn class_id(self) -> u32 {
        match self {
            VehicleClass::Car => 2,
            VehicleClass::Motorcycle => 3,
            VehicleClass::Bus => 5,
            VehicleClass::Truck => 7,
        }
    }
}

/// Class ids kept by default: car, motorcycle, bus, truck.
pub const DEFAULT_VEHICLE_CLASSES: [u32; 4] = [
    VehicleClass::Car.class_id(),
    VehicleClass::Motorcycle.class_id(),
    VehicleClass::Bus.class_id(),
    VehicleClass::Truck.class_id(),
];

/// One box from a detector. Plate detectors leave `class_id` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub score: f32,
    #[serde(default)]
    pub class_id: Option<u32>,
}

impl Detection {
    pub fn new(bbox: BoundingBox, score: f32, class_id: Option<u32>) -> Self {
        Self {
            bbox,
            score,
            class_id,
        }
    }
}

/// Object detection over a whole frame.
pub trait Detector {
    fn detect(&mut self, frame: &Frame) -> anyhow::Result<Vec<Detection>>;
}

/// Keeps detections whose class is in `allowed`, dropping the label.
pub fn filter_vehicles(detections: &[Detection], allowed: &[u32]) -> Vec<ScoredBox> {
    detections
        .iter()
        .filter(|d| d.class_id.is_some_and(|id| allowed.contains(&id)))
        .map(|d| ScoredBox {
            bbox: d.bbox,
            score: d.score,
        })
        .collect()
}
