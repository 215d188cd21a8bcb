//! Rasterizing the result card and turning it into shareable artifacts.

pub mod animated;
pub mod dom;
pub mod fonts;
pub mod snapshot;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use thiserror::Error;

pub use animated::{AnimatedExporter, FrameEncoder, GifFrameEncoder, SnowField, Snowflake};
pub use dom::{Display, Document, Element, Motion};
pub use snapshot::{CaptureRegion, Raster, Rasterizer, SnapshotRenderer, SvgRasterizer};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("capture region `{0}` is not on screen")]
    RegionNotFound(String),
    #[error("capture region `{0}` has nothing to draw")]
    EmptyRegion(String),
    #[error("capture scale {0} must be a positive number")]
    InvalidScale(f32),
    #[error("snapshot markup rejected: {0}")]
    Markup(String),
    #[error("image `{0}` could not be loaded")]
    ImageUnavailable(String),
    #[error("cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("a capture of `{region}` is already in progress")]
    Busy { region: String },
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("encoding failed: {0}")]
    Encode(String),
    #[error("could not deliver export: {0}")]
    Delivery(String),
}

/// Finished export ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Serializes exports per capture region. Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct ExportLock {
    active: Arc<Mutex<HashSet<String>>>,
}

impl ExportLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, region: &str) -> Result<ExportLease, ExportError> {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !active.insert(region.to_string()) {
            tracing::info!(region, "export rejected: capture in progress");
            return Err(ExportError::Busy {
                region: region.to_string(),
            });
        }
        Ok(ExportLease {
            lock: self.clone(),
            region: region.to_string(),
        })
    }

    pub fn is_busy(&self, region: &str) -> bool {
        self.active
            .lock()
            .map(|active| active.contains(region))
            .unwrap_or(false)
    }
}

/// Exclusive right to export one region; released on drop.
#[derive(Debug)]
pub struct ExportLease {
    lock: ExportLock,
    region: String,
}

impl ExportLease {
    pub fn region(&self) -> &str {
        &self.region
    }
}

impl Drop for ExportLease {
    fn drop(&mut self) {
        let mut active = self
            .lock
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        active.remove(&self.region);
    }
}
