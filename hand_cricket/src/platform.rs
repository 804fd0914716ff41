// THEORY:
// The `platform` module is the narrow waist between the game and the machine it runs
// on. The game needs five things from the outside world: frames from a camera,
// somewhere to draw, a key press now and then, a computer opponent's roll, and a
// place to print commentary. Each is a trait here, so the innings loop can be driven
// by OpenCV in the player binary and by scripted fakes in tests without either side
// knowing about the other.
//
// Key architectural principles:
// 1.  **Scoped Capture**: A camera is only ever used through a `CaptureSession`, which
//     releases it when dropped. Every way out of an innings (dismissal, quit, camera
//     failure, even a panic) releases the device.
// 2.  **Backend-Owned Frames**: Frames stay in the backend's own type (`Camera::Frame`).
//     The game only draws on them through `Screen` and crops them through `VideoFrame`.
// 3.  **Infallible Drawing**: Overlay drawing has no error path. A backend that fails
//     to draw logs it and carries on; a broken overlay must not end an innings.

use crate::core_modules::region::{RegionRect, VideoFrame};
use crate::error::CaptureError;
use image::Rgb;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lowest value the computer can throw.
pub const COMPUTER_MIN: u8 = 1;
/// Highest value the computer can throw.
pub const COMPUTER_MAX: u8 = 6;

/// A key reported by the windowing layer, reduced to its low byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(u8);

impl KeyCode {
    pub const fn from_char(c: char) -> Self {
        Self(c as u8)
    }

    /// Converts a raw key code as returned by a window toolkit. Negative codes mean
    /// "no key pressed".
    pub fn from_raw(raw: i32) -> Option<Self> {
        if raw < 0 { None } else { Some(Self((raw & 0xFF) as u8)) }
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }
}

/// Text anchor in frame coordinates (bottom-left of the first glyph).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// How an overlay element is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub color: Rgb<u8>,
    /// Font scale for text; ignored for shapes.
    pub scale: f64,
    /// Stroke thickness in pixels.
    pub thickness: i32,
}

impl OverlayStyle {
    pub const fn new(color: [u8; 3], scale: f64, thickness: i32) -> Self {
        Self {
            color: Rgb(color),
            scale,
            thickness,
        }
    }
}

/// A source of video frames.
pub trait Camera {
    type Frame: VideoFrame;

    /// Blocks until the next frame is available.
    fn read_frame(&mut self) -> Result<Self::Frame, CaptureError>;

    /// Releases the underlying device. Called exactly once, by `CaptureSession`.
    fn release(&mut self);
}

/// Owns an open camera for the length of one innings and releases it on drop.
pub struct CaptureSession<C: Camera> {
    camera: C,
}

impl<C: Camera> CaptureSession<C> {
    pub fn new(camera: C) -> Self {
        debug!("capture session opened");
        Self { camera }
    }

    pub fn read_frame(&mut self) -> Result<C::Frame, CaptureError> {
        self.camera.read_frame()
    }
}

impl<C: Camera> Drop for CaptureSession<C> {
    fn drop(&mut self) {
        self.camera.release();
        debug!("capture session released");
    }
}

/// The on-screen surface and keyboard of the game window.
pub trait Screen<F> {
    fn draw_text(&mut self, frame: &mut F, text: &str, origin: Position, style: &OverlayStyle);

    fn draw_rectangle(&mut self, frame: &mut F, rect: &RegionRect, style: &OverlayStyle);

    /// Pushes the frame to the window.
    fn present_frame(&mut self, frame: &F);

    /// Returns the key pressed during a short wait, if any.
    fn poll_key(&mut self) -> Option<KeyCode>;

    /// Tears the window down at the end of an innings.
    fn close(&mut self);
}

/// The computer side of every delivery.
pub trait Opponent {
    /// The computer's number for this delivery, in `COMPUTER_MIN..=COMPUTER_MAX`.
    fn throw(&mut self) -> u8;
}

/// Uniformly random opponent.
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    /// A fixed `seed` makes the computer's rolls reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Opponent for RandomOpponent {
    fn throw(&mut self) -> u8 {
        self.rng.gen_range(COMPUTER_MIN..=COMPUTER_MAX)
    }
}

/// Where match commentary goes.
pub trait Commentator {
    fn announce(&mut self, line: &str);
}

impl Commentator for Vec<String> {
    fn announce(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCamera;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn raw_key_codes_keep_the_low_byte() {
        assert_eq!(KeyCode::from_raw(-1), None);
        assert_eq!(KeyCode::from_raw('c' as i32), Some(KeyCode::from_char('c')));
        assert_eq!(KeyCode::from_raw(0x100 | 'q' as i32), Some(KeyCode::from_char('q')));
        assert_eq!(KeyCode::from_char('q').as_char(), 'q');
    }

    #[test]
    fn random_opponent_stays_in_range() {
        let mut opponent = RandomOpponent::new(Some(7));
        let mut seen = [false; 7];
        for _ in 0..600 {
            let value = opponent.throw();
            assert!((COMPUTER_MIN..=COMPUTER_MAX).contains(&value));
            seen[value as usize] = true;
        }
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|&s| s));
    }

    #[test]
    fn seeded_opponents_repeat_themselves() {
        let mut a = RandomOpponent::new(Some(42));
        let mut b = RandomOpponent::new(Some(42));
        let first: Vec<u8> = (0..20).map(|_| a.throw()).collect();
        let second: Vec<u8> = (0..20).map(|_| b.throw()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn session_releases_camera_on_drop() {
        let released = Rc::new(Cell::new(0));
        {
            let mut session = CaptureSession::new(FakeCamera::new(1, released.clone()));
            assert!(session.read_frame().is_ok());
            assert!(session.read_frame().is_err());
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn session_releases_camera_when_unwinding() {
        let released = Rc::new(Cell::new(0));
        let camera = FakeCamera::new(1, released.clone());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _session = CaptureSession::new(camera);
            panic!("renderer crashed");
        }));
        assert!(result.is_err());
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn vec_collects_commentary() {
        let mut lines: Vec<String> = Vec::new();
        lines.announce("It's a tie!");
        assert_eq!(lines, vec!["It's a tie!".to_string()]);
    }
}
