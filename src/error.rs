//! Error taxonomy for the puzzle engine
//!
//! Fatal errors abort only the affected operation; the session stays in its
//! prior valid state. Invalid state transitions are not errors at all: they
//! are silent no-ops, since user-interface races are expected.

use thiserror::Error;

/// Error conditions surfaced to the host.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("image {url:?} could not be decoded")]
    ImageLoad { url: String },
    #[error("image {width}x{height} is too small for a {rows}x{cols} grid")]
    InvalidImage {
        width: u32,
        height: u32,
        rows: u32,
        cols: u32,
    },
    /// A host [`ImageLoader`](crate::assets::ImageLoader) reports that its
    /// supporting machinery (not the image itself) failed. Initialization
    /// aborts and can be retried by calling it again.
    #[error("engine resource failed to load: {0}")]
    ResourceLoad(String),
}
