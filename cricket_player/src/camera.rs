// THEORY:
// OpenCV side of frame capture. `OpenCvCamera` wraps a `VideoCapture` and hands out
// `CameraFrame`s: BGR `Mat`s, already mirrored when the game asks for a selfie view.
// The game draws on them in place and crops the hand box out of them, and both go
// through this newtype so the library never sees an OpenCV type.
//
// Every OpenCV error is turned into a `CaptureError` at this boundary.

use hand_cricket::core_modules::region::{ImageRegion, RegionRect, VideoFrame};
use hand_cricket::error::CaptureError;
use hand_cricket::platform::Camera;
use image::RgbImage;
use log::{debug, warn};
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};

fn backend(err: opencv::Error) -> CaptureError {
    CaptureError::Backend(err.to_string())
}

/// One BGR frame straight from the device.
pub struct CameraFrame(pub Mat);

impl CameraFrame {
    fn to_rgb_image(&self) -> Result<RgbImage, CaptureError> {
        let mut rgb = Mat::default();
        imgproc::cvt_color(&self.0, &mut rgb, imgproc::COLOR_BGR2RGB, 0).map_err(backend)?;
        let (width, height) = self.dimensions();
        let bytes = rgb.data_bytes().map_err(backend)?.to_vec();
        RgbImage::from_raw(width, height, bytes).ok_or_else(|| {
            CaptureError::Backend(format!("frame buffer does not match {width}x{height} RGB"))
        })
    }
}

impl VideoFrame for CameraFrame {
    fn dimensions(&self) -> (u32, u32) {
        (self.0.cols().max(0) as u32, self.0.rows().max(0) as u32)
    }

    fn crop_region(&self, rect: &RegionRect) -> Result<ImageRegion, CaptureError> {
        let (width, height) = self.dimensions();
        if !rect.fits_within(width, height) {
            return Err(CaptureError::RegionOutOfBounds {
                region: *rect,
                width,
                height,
            });
        }
        self.to_rgb_image()?.crop_region(rect)
    }
}

/// A webcam opened through OpenCV's default backend.
pub struct OpenCvCamera {
    capture: VideoCapture,
    mirror: bool,
}

impl OpenCvCamera {
    pub fn open(index: i32, mirror: bool) -> Result<Self, CaptureError> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(backend)?;
        if !capture.is_opened().map_err(backend)? {
            return Err(CaptureError::Unavailable(index.to_string()));
        }
        debug!("opened camera {index}");
        Ok(Self { capture, mirror })
    }
}

impl Camera for OpenCvCamera {
    type Frame = CameraFrame;

    fn read_frame(&mut self) -> Result<CameraFrame, CaptureError> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame).map_err(backend)? || frame.empty() {
            return Err(CaptureError::EndOfStream);
        }
        if !self.mirror {
            return Ok(CameraFrame(frame));
        }

        let mut mirrored = Mat::default();
        core::flip(&frame, &mut mirrored, 1).map_err(backend)?;
        Ok(CameraFrame(mirrored))
    }

    fn release(&mut self) {
        if let Err(err) = self.capture.release() {
            warn!("failed to release camera: {err}");
        }
    }
}
