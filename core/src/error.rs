//! Error taxonomy for the pipeline and its collaborators.
//!
//! Per the design, stages never raise errors up to the controller; they
//! signal failure through `abort`, queue state, or an `eof` flag instead.
//! `PlayerError` exists for the narrower surface that collaborators
//! (demuxer, decoder, sinks) use to report a hard open/seek failure, and
//! for whatever a concrete backend wants to wrap underneath it.

use std::fmt;

/// Errors a [`crate::collab::Demuxer`] or decoder can report to the core.
///
/// Everything past `Open` is collapsed by the demux stage into either a
/// transient retry or an end-of-stream drain; see the demux stage loop.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("failed to open container: {0}")]
    OpenFailed(String),

    #[error("no decodable stream of the required kind was found")]
    NoSuchStream,

    #[error("decoder not found for codec")]
    DecoderNotFound,

    #[error("seek failed: {0}")]
    SeekFailed(String),

    #[error("backend error: {0}")]
    Backend(#[source] BackendError),
}

/// Opaque wrapper around a concrete backend's own error type.
///
/// The core is generic over the backend and only needs `Display` plus
/// `std::error::Error` out of it; this box avoids forcing every backend
/// to fit one shared error enum.
pub struct BackendError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl BackendError {
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(err))
    }
}

impl fmt::Debug for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
