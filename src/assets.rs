//! Image loading seam
//!
//! The engine never decodes pixels itself; it only needs raster dimensions
//! to derive the grid. Hosts implement [`ImageLoader`] over whatever decode
//! path they own (browser `Image`, `image` crate, test fixtures).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Decoded raster dimensions of a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width/height ratio (degenerate images report 0)
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Resolves an image URL to decoded dimensions before grid generation.
///
/// A failed load must leave no partial state behind; initialization is
/// retryable by calling it again.
pub trait ImageLoader {
    fn load(&self, url: &str) -> Result<ImageInfo, EngineError>;
}

/// In-memory loader backed by a URL table. Used by tests and the demo
/// binary; hosts with a real decode path supply their own implementation.
#[derive(Debug, Default)]
pub struct MemoryImageLoader {
    images: HashMap<String, ImageInfo>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, info: ImageInfo) {
        self.images.insert(url.into(), info);
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, url: &str) -> Result<ImageInfo, EngineError> {
        self.images
            .get(url)
            .copied()
            .ok_or_else(|| EngineError::ImageLoad {
                url: url.to_string(),
            })
    }
}
