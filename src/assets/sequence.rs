//! Pre-rendered image sequences backing video-frame objects.
//!
//! Frames live at `<folder>/frame00001.<ext>`, `frame00002.<ext>`, ... (1-indexed) and are
//! loaded synchronously on demand.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, load_image};
use crate::foundation::error::{TickreelError, TickreelResult};

/// Map a video object's `current_time` and `framerate` to a 1-based sequence index.
///
/// `floor(current_time / 60 * framerate) + 1`.
pub fn sequence_index(current_time: f64, framerate: f64) -> TickreelResult<u64> {
    let pos = (current_time / 60.0 * framerate).floor();
    if !pos.is_finite() || pos < 0.0 {
        return Err(TickreelError::animation(format!(
            "video frame position must be finite and >= 0 (current_time={current_time}, framerate={framerate})"
        )));
    }
    Ok(pos as u64 + 1)
}

/// Path of frame `index` (1-based) inside `folder`.
pub fn sequence_frame_path(folder: &Path, index: u64, extension: &str) -> PathBuf {
    folder.join(format!("frame{index:05}.{extension}"))
}

/// LRU-cached loader for one image sequence.
pub struct FrameSequence {
    folder: PathBuf,
    extension: String,
    frame_cache: HashMap<u64, Arc<PreparedImage>>,
    lru: VecDeque<u64>,
    capacity: usize,
}

impl FrameSequence {
    /// Create a loader for `folder/frameNNNNN.extension`.
    pub fn new(folder: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let capacity = std::env::var("TICKREEL_SEQUENCE_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(64);
        Self {
            folder: folder.into(),
            extension: extension.into(),
            frame_cache: HashMap::new(),
            lru: VecDeque::new(),
            capacity,
        }
    }

    /// Load frame `index` (1-based), blocking until pixels are available.
    pub fn frame(&mut self, index: u64) -> TickreelResult<Arc<PreparedImage>> {
        if index == 0 {
            return Err(TickreelError::asset("image sequences are 1-indexed"));
        }
        if let Some(img) = self.frame_cache.get(&index).cloned() {
            self.touch(index);
            return Ok(img);
        }

        let path = sequence_frame_path(&self.folder, index, &self.extension);
        let img = load_image(&path)?;
        self.insert_frame(index, img.clone());
        Ok(img)
    }

    /// Number of decoded frames currently cached.
    pub fn cached_len(&self) -> usize {
        self.frame_cache.len()
    }

    fn insert_frame(&mut self, key: u64, image: Arc<PreparedImage>) {
        self.frame_cache.insert(key, image);
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.frame_cache.remove(&old);
            }
        }
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

/// Loaders for every sequence referenced during a run, keyed by folder and extension.
#[derive(Default)]
pub struct SequenceLibrary {
    sequences: HashMap<(PathBuf, String), FrameSequence>,
}

impl SequenceLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the frame shown at `current_time` for a sequence played at `framerate`.
    pub fn frame_at(
        &mut self,
        folder: &Path,
        extension: &str,
        current_time: f64,
        framerate: f64,
    ) -> TickreelResult<Arc<PreparedImage>> {
        let index = sequence_index(current_time, framerate)?;
        self.sequences
            .entry((folder.to_path_buf(), extension.to_owned()))
            .or_insert_with(|| FrameSequence::new(folder, extension))
            .frame(index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sequence.rs"]
mod tests;
