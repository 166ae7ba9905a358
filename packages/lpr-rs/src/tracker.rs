//! Multi-object tracking seam and a small IoU tracker behind it.
//!
//! The pipeline only relies on [`Tracker::update`] handing back boxes with
//! identities that stay stable while a vehicle keeps being detected.
//! [`IouTracker`] is a SORT-style tracker without motion prediction: tracks
//! are matched greedily to detections by IoU, promoted after `min_hits`
//! consecutive matches, and dropped after `max_age` missed frames.
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::BoundingBox;

/// Detection box with its score, as fed to a tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredBox {
    pub bbox: BoundingBox,
    pub score: f32,
}

/// A vehicle box for the current frame with the identity the tracker gave it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedVehicle {
    pub bbox: BoundingBox,
    pub id: u64,
}

pub trait Tracker {
    /// Advances the tracker by one frame. Must accept an empty slice.
    fn update(&mut self, detections: &[ScoredBox]) -> Vec<TrackedVehicle>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Frames a track survives without a matching detection
    pub max_age: u32,
    /// Consecutive matches before a track is reported
    pub min_hits: u32,
    /// Minimum IoU between a track and a detection to match them
    pub iou_threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age: 1,
            min_hits: 3,
            iou_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone)]
struct Track {
    id: u64,
    bbox: BoundingBox,
    hit_streak: u32,
    time_since_update: u32,
}

pub struct IouTracker {
    config: TrackerConfig,
    tracks: Vec<Track>,
    next_id: u64,
    frame_count: u64,
}

impl IouTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            next_id: 1,
            frame_count: 0,
        }
    }

    pub fn active_tracks(&self) -> usize {
        self.tracks.len()
    }
}

impl Default for IouTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

/// Pairs `(track, detection)` by descending IoU, each side used at most once.
fn greedy_assign(tracks: &[Track], detections: &[ScoredBox], min_iou: f32) -> Vec<(usize, usize)> {
    let mut candidates: Vec<(f32, usize, usize)> = Vec::new();
    for (ti, track) in tracks.iter().enumerate() {
        for (di, det) in detections.iter().enumerate() {
            let iou = track.bbox.iou(&det.bbox);
            if iou >= min_iou && iou > 0.0 {
                candidates.push((iou, ti, di));
            }
        }
    }
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut track_used = vec![false; tracks.len()];
    let mut det_used = vec![false; detections.len()];
    let mut pairs = Vec::new();
    for (_, ti, di) in candidates {
        if track_used[ti] || det_used[di] {
            continue;
        }
        track_used[ti] = true;
        det_used[di] = true;
        pairs.push((ti, di));
    }
    pairs
}

impl Tracker for IouTracker {
    fn update(&mut self, detections: &[ScoredBox]) -> Vec<TrackedVehicle> {
        self.frame_count += 1;

        for track in &mut self.tracks {
            if track.time_since_update > 0 {
                track.hit_streak = 0;
            }
            track.time_since_update += 1;
        }

        let mut det_matched = vec![false; detections.len()];
        for (ti, di) in greedy_assign(&self.tracks, detections, self.config.iou_threshold) {
            let track = &mut self.tracks[ti];
            track.bbox = detections[di].bbox;
            track.time_since_update = 0;
            track.hit_streak += 1;
            det_matched[di] = true;
        }

        for (det, matched) in detections.iter().zip(det_matched) {
            if !matched {
                trace!("new track {} at {}", self.next_id, det.bbox);
                self.tracks.push(Track {
                    id: self.next_id,
                    bbox: det.bbox,
                    hit_streak: 0,
                    time_since_update: 0,
                });
                self.next_id += 1;
            }
        }

        let warming_up = self.frame_count <= self.config.min_hits as u64;
        let reported = self
            .tracks
            .iter()
            .filter(|t| t.time_since_update == 0 && (t.hit_streak >= self.config.min_hits || warming_up))
            .map(|t| TrackedVehicle {
                bbox: t.bbox,
                id: t.id,
            })
            .collect();

        let max_age = self.config.max_age;
        self.tracks.retain(|t| t.time_since_update <= max_age);
        reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(x: f32) -> ScoredBox {
        ScoredBox {
            bbox: BoundingBox::new(x, 0.0, x + 100.0, 100.0),
            score: 0.9,
        }
    }

    fn ids(vehicles: &[TrackedVehicle]) -> Vec<u64> {
        vehicles.iter().map(|v| v.id).collect()
    }

    #[test]
    fn test_empty_input_is_fine() {
        let mut tracker = IouTracker::default();
        for _ in 0..5 {
            assert!(tracker.update(&[]).is_empty());
        }
        assert_eq!(tracker.active_tracks(), 0);
    }

    #[test]
    fn test_identity_is_stable_across_frames() {
        let mut tracker = IouTracker::default();
        for frame in 0..6 {
            let out = tracker.update(&[scored(frame as f32 * 5.0)]);
            assert_eq!(ids(&out), vec![1], "frame {frame}");
        }
    }

    #[test]
    fn test_new_track_waits_for_min_hits_after_warmup() {
        let mut tracker = IouTracker::default();
        for _ in 0..3 {
            tracker.update(&[scored(0.0)]);
        }
        // Second vehicle appears after the warm-up frames
        assert_eq!(ids(&tracker.update(&[scored(0.0), scored(500.0)])), vec![1]);
        assert_eq!(ids(&tracker.update(&[scored(0.0), scored(500.0)])), vec![1]);
        assert_eq!(ids(&tracker.update(&[scored(0.0), scored(500.0)])), vec![1]);
        assert_eq!(ids(&tracker.update(&[scored(0.0), scored(500.0)])), vec![1, 2]);
    }

    #[test]
    fn test_lost_track_gets_new_identity() {
        let mut tracker = IouTracker::default();
        assert_eq!(ids(&tracker.update(&[scored(0.0)])), vec![1]);
        assert!(tracker.update(&[]).is_empty());
        assert!(tracker.update(&[]).is_empty());
        assert_eq!(tracker.active_tracks(), 0);
        // Past warm-up, the returning vehicle has to rebuild its hit streak
        for _ in 0..3 {
            assert!(tracker.update(&[scored(0.0)]).is_empty());
        }
        assert_eq!(ids(&tracker.update(&[scored(0.0)])), vec![2]);
    }

    #[test]
    fn test_greedy_assign_prefers_highest_iou() {
        let tracks = vec![Track {
            id: 1,
            bbox: BoundingBox::new(0.0, 0.0, 100.0, 100.0),
            hit_streak: 0,
            time_since_update: 0,
        }];
        let detections = vec![scored(50.0), scored(10.0)];
        assert_eq!(greedy_assign(&tracks, &detections, 0.3), vec![(0, 1)]);
    }
}
