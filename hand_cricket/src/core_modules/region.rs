// THEORY:
// The `region` module is the bridge between a full camera frame and the gesture
// decoder. Each tick, the game cuts one fixed rectangle (the "hand box") out of
// the frame and hands only that to the decoder. The decoder never sees the rest
// of the frame, which keeps the player's face and background clutter out of the
// contour search.
//
// Key architectural principles:
// 1.  **Ephemeral Ownership**: An `ImageRegion` owns a copy of its pixels and lives
//     for a single tick. Nothing retains it after decoding.
// 2.  **Backend Neutrality**: Frames come from whatever platform layer drives the
//     game. The `VideoFrame` trait is the only thing the game loop needs from a
//     frame: the ability to cut a region out of it. `image::RgbImage` implements
//     it here; the OpenCV player implements it for its own frame type.
// 3.  **Checked Cropping**: A rectangle that does not fit inside the frame is a
//     capture problem, reported as `CaptureError::RegionOutOfBounds`, never a
//     silently clamped region.

use crate::error::CaptureError;
use image::{RgbImage, imageops};

/// An axis-aligned rectangle in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionRect {
    /// Column of the top-left corner.
    pub x: u32,
    /// Row of the top-left corner.
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// A square region, the shape the game uses for its hand box.
    pub const fn square(x: u32, y: u32, size: u32) -> Self {
        Self::new(x, y, size, size)
    }

    /// One past the last column covered by the rectangle.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// One past the last row covered by the rectangle.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// True when the rectangle is non-empty and lies entirely inside a
    /// `frame_width` x `frame_height` frame.
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.right() <= frame_width
            && self.bottom() <= frame_height
    }
}

/// The rectangular block of RGB pixels sampled from the live frame for one tick.
#[derive(Debug, Clone)]
pub struct ImageRegion {
    pixels: RgbImage,
}

impl ImageRegion {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Wraps a tightly packed RGB8 buffer. Returns `None` when the buffer length
    /// does not match `width * height * 3`.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, bytes).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// A captured frame the game loop can cut the hand region out of.
pub trait VideoFrame {
    /// Width and height of the frame in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Copies `rect` out of the frame.
    fn crop_region(&self, rect: &RegionRect) -> Result<ImageRegion, CaptureError>;
}

impl VideoFrame for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn crop_region(&self, rect: &RegionRect) -> Result<ImageRegion, CaptureError> {
        let (width, height) = RgbImage::dimensions(self);
        if !rect.fits_within(width, height) {
            return Err(CaptureError::RegionOutOfBounds {
                region: *rect,
                width,
                height,
            });
        }
        let cropped = imageops::crop_imm(self, rect.x, rect.y, rect.width, rect.height).to_image();
        Ok(ImageRegion::new(cropped))
    }
}
