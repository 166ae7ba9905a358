//! Per-frame, per-vehicle plate records accumulated over a run.
use std::collections::HashMap;

use crate::geometry::BoundingBox;

/// A vehicle with a readable plate in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub frame: u64,
    pub car_id: u64,
    pub car_bbox: BoundingBox,
    pub plate_bbox: BoundingBox,
    pub plate_score: f32,
    pub text: String,
    pub text_score: f32,
}

#[derive(Debug, Default)]
struct FrameEntry {
    frame: u64,
    records: Vec<FrameRecord>,
}

/// Records keyed by `(frame, car_id)`.
///
/// Frames iterate in the order they were first written, and vehicles within
/// a frame likewise. Writing an existing key replaces the record in place.
#[derive(Debug, Default)]
pub struct ResultStore {
    frames: Vec<FrameEntry>,
    index: HashMap<u64, usize>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record`, returning the one it replaced, if any.
    pub fn insert(&mut self, record: FrameRecord) -> Option<FrameRecord> {
        let slot = *self.index.entry(record.frame).or_insert_with(|| {
            self.frames.push(FrameEntry {
                frame: record.frame,
                records: Vec::new(),
            });
            self.frames.len() - 1
        });
        let entry = &mut self.frames[slot];
        match entry.records.iter_mut().find(|r| r.car_id == record.car_id) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                entry.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, frame: u64, car_id: u64) -> Option<&FrameRecord> {
        let slot = *self.index.get(&frame)?;
        self.frames[slot].records.iter().find(|r| r.car_id == car_id)
    }

    /// Records in export order.
    pub fn records(&self) -> impl Iterator<Item = &FrameRecord> {
        self.frames.iter().flat_map(|entry| entry.records.iter())
    }

    /// Frame numbers holding at least one record, in insertion order.
    pub fn frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.frames.iter().map(|entry| entry.frame)
    }

    pub fn len(&self) -> usize {
        self.frames.iter().map(|entry| entry.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(frame: u64, car_id: u64, text: &str) -> FrameRecord {
        FrameRecord {
            frame,
            car_id,
            car_bbox: BoundingBox::new(0.0, 0.0, 100.0, 100.0),
            plate_bbox: BoundingBox::new(10.0, 10.0, 30.0, 20.0),
            plate_score: 0.5,
            text: text.to_string(),
            text_score: 0.5,
        }
    }

    fn keys(store: &ResultStore) -> Vec<(u64, u64)> {
        store.records().map(|r| (r.frame, r.car_id)).collect()
    }

    #[test]
    fn test_iterates_in_insertion_order() {
        let mut store = ResultStore::new();
        store.insert(record(0, 9, "AB12CDE"));
        store.insert(record(0, 2, "AB12CDE"));
        store.insert(record(1, 9, "AB12CDE"));
        store.insert(record(1, 4, "AB12CDE"));
        assert_eq!(keys(&store), vec![(0, 9), (0, 2), (1, 9), (1, 4)]);
        assert_eq!(store.frames().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(store.len(), 4);
        assert_eq!(store.frame_count(), 2);
    }

    #[test]
    fn test_same_key_overwrites_in_place() {
        let mut store = ResultStore::new();
        assert!(store.insert(record(3, 7, "AB12CDE")).is_none());
        store.insert(record(3, 8, "XY98ZZZ"));
        let previous = store.insert(record(3, 7, "QQ11QQQ")).unwrap();
        assert_eq!(previous.text, "AB12CDE");
        assert_eq!(store.get(3, 7).unwrap().text, "QQ11QQQ");
        assert_eq!(keys(&store), vec![(3, 7), (3, 8)]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_same_vehicle_in_many_frames() {
        let mut store = ResultStore::new();
        store.insert(record(1, 7, "AB12CDE"));
        store.insert(record(2, 7, "AB12CDF"));
        assert_eq!(store.get(1, 7).unwrap().text, "AB12CDE");
        assert_eq!(store.get(2, 7).unwrap().text, "AB12CDF");
        assert!(store.get(3, 7).is_none());
    }

    #[test]
    fn test_empty_store() {
        let store = ResultStore::new();
        assert!(store.is_empty());
        assert_eq!(store.records().count(), 0);
    }
}
