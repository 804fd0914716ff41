// THEORY:
// Capture is the only fallible collaborator the game loop cares about. Every way
// a frame can fail to reach the decoder (camera never opened, stream ended,
// backend error, crop rectangle outside the frame) collapses into one error
// type, because the innings reacts to all of them the same way: it ends with
// `InningsEnd::CaptureFailed` and keeps its score.
//
// Decoding has no error type at all. "No hand found" is a valid 0-finger
// reading, not a failure.

use crate::core_modules::region::RegionRect;
use thiserror::Error;

/// Why a frame could not be delivered to the game loop.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The capture device could not be opened.
    #[error("camera {0} is unavailable")]
    Unavailable(String),
    /// The device stopped producing frames.
    #[error("camera stream ended")]
    EndOfStream,
    /// The platform backend reported a failure while reading or converting a frame.
    #[error("capture backend failed: {0}")]
    Backend(String),
    /// The configured hand region does not fit inside the captured frame.
    #[error("region {region:?} does not fit in a {width}x{height} frame")]
    RegionOutOfBounds {
        region: RegionRect,
        width: u32,
        height: u32,
    },
}
