//! Frame acquisition.
use anyhow::{Context, Result};
use image::RgbImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Image extensions picked up by [`ImageDirSource`]
const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// A decoded frame and its position in the stream, counted from 0.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: u64,
    pub image: RgbImage,
}

pub trait FrameSource {
    /// `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Frames stored as individual image files in one directory, read in file
/// name order.
pub struct ImageDirSource {
    paths: VecDeque<PathBuf>,
    next_index: u64,
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.as_str()))
}

impl ImageDirSource {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        anyhow::ensure!(dir.is_dir(), "frame directory {} does not exist", dir.display());

        let mut paths = VecDeque::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
            if entry.file_type().is_file() && is_frame_file(entry.path()) {
                paths.push_back(entry.into_path());
            }
        }

        Ok(Self {
            paths,
            next_index: 0,
        })
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let image = image::open(&path)
            .with_context(|| format!("failed to decode frame {}", path.display()))?
            .to_rgb8();
        let frame = Frame {
            index: self.next_index,
            image,
        };
        self.next_index += 1;
        Ok(Some(frame))
    }
}

/// Frames already held in memory.
pub struct MemorySource {
    images: VecDeque<RgbImage>,
    next_index: u64,
}

impl MemorySource {
    pub fn new(images: Vec<RgbImage>) -> Self {
        Self {
            images: images.into(),
            next_index: 0,
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.images.pop_front().map(|image| {
            let frame = Frame {
                index: self.next_index,
                image,
            };
            self.next_index += 1;
            frame
        }))
    }
}
