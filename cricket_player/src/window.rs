use crate::camera::CameraFrame;
use hand_cricket::core_modules::region::RegionRect;
use hand_cricket::platform::{KeyCode, OverlayStyle, Position, Screen};
use log::warn;
use opencv::{
    core::{Point, Rect, Scalar},
    highgui, imgproc,
};

/// How long `poll_key` waits for a key, in milliseconds.
const KEY_WAIT_MS: i32 = 1;

/// OpenCV wants BGR.
fn to_scalar(style: &OverlayStyle) -> Scalar {
    let [r, g, b] = style.color.0;
    Scalar::new(b as f64, g as f64, r as f64, 0.0)
}

/// A HighGUI window showing the live, annotated camera feed.
pub struct OpenCvWindow {
    title: String,
}

impl OpenCvWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl Screen<CameraFrame> for OpenCvWindow {
    fn draw_text(
        &mut self,
        frame: &mut CameraFrame,
        text: &str,
        origin: Position,
        style: &OverlayStyle,
    ) {
        let drawn = imgproc::put_text(
            &mut frame.0,
            text,
            Point::new(origin.x, origin.y),
            imgproc::FONT_HERSHEY_SIMPLEX,
            style.scale,
            to_scalar(style),
            style.thickness,
            imgproc::LINE_8,
            false,
        );
        if let Err(err) = drawn {
            warn!("failed to draw {text:?}: {err}");
        }
    }

    fn draw_rectangle(&mut self, frame: &mut CameraFrame, rect: &RegionRect, style: &OverlayStyle) {
        let (x, y) = (rect.x as i32, rect.y as i32);
        let cv_rect = Rect::new(x, y, rect.width as i32, rect.height as i32);
        let color = to_scalar(style);
        let thickness = style.thickness;
        let drawn = imgproc::rectangle(&mut frame.0, cv_rect, color, thickness, imgproc::LINE_8, 0);
        if let Err(err) = drawn {
            warn!("failed to draw region {rect:?}: {err}");
        }
    }

    fn present_frame(&mut self, frame: &CameraFrame) {
        if let Err(err) = highgui::imshow(&self.title, &frame.0) {
            warn!("failed to show frame: {err}");
        }
    }

    fn poll_key(&mut self) -> Option<KeyCode> {
        match highgui::wait_key(KEY_WAIT_MS) {
            Ok(raw) => KeyCode::from_raw(raw),
            Err(err) => {
                warn!("failed to poll keyboard: {err}");
                None
            }
        }
    }

    fn close(&mut self) {
        if let Err(err) = highgui::destroy_all_windows() {
            warn!("failed to close windows: {err}");
        }
    }
}
