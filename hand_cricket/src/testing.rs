//! Scripted stand-ins for the platform traits, shared by the unit tests.

use crate::core_modules::gesture_decoder::{GestureCount, GestureReader};
use crate::core_modules::region::{ImageRegion, RegionRect};
use crate::error::CaptureError;
use crate::platform::{Camera, KeyCode, Opponent, OverlayStyle, Position, Screen};
use image::{Rgb, RgbImage};
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Serves `frames` blank 640x480 frames, then reports the end of the stream.
pub struct FakeCamera {
    frames: usize,
    size: (u32, u32),
    released: Rc<Cell<u32>>,
}

impl FakeCamera {
    pub fn new(frames: usize, released: Rc<Cell<u32>>) -> Self {
        Self {
            frames,
            size: (640, 480),
            released,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }
}

impl Camera for FakeCamera {
    type Frame = RgbImage;

    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        if self.frames == 0 {
            return Err(CaptureError::EndOfStream);
        }
        self.frames -= 1;
        Ok(RgbImage::from_pixel(self.size.0, self.size.1, Rgb([235, 235, 235])))
    }

    fn release(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

/// Replays a key script and records everything drawn.
#[derive(Default)]
pub struct FakeScreen {
    keys: VecDeque<Option<KeyCode>>,
    pub texts: Vec<String>,
    pub rectangles: Vec<RegionRect>,
    pub presented: usize,
    pub closed: usize,
}

impl FakeScreen {
    /// `script` is one entry per tick: a key character, or `' '` for no key.
    pub fn with_keys(script: &str) -> Self {
        Self {
            keys: script
                .chars()
                .map(|c| if c == ' ' { None } else { Some(KeyCode::from_char(c)) })
                .collect(),
            ..Self::default()
        }
    }
}

impl Screen<RgbImage> for FakeScreen {
    fn draw_text(
        &mut self,
        _frame: &mut RgbImage,
        text: &str,
        _origin: Position,
        _style: &OverlayStyle,
    ) {
        self.texts.push(text.to_string());
    }

    fn draw_rectangle(&mut self, _frame: &mut RgbImage, rect: &RegionRect, _style: &OverlayStyle) {
        self.rectangles.push(*rect);
    }

    fn present_frame(&mut self, _frame: &RgbImage) {
        self.presented += 1;
    }

    fn poll_key(&mut self) -> Option<KeyCode> {
        self.keys.pop_front().flatten()
    }

    fn close(&mut self) {
        self.closed += 1;
    }
}

/// Reports a fixed sequence of finger counts, ignoring the pixels.
pub struct ScriptedReader(VecDeque<u8>);

impl ScriptedReader {
    pub fn new(values: &[u8]) -> Self {
        Self(values.iter().copied().collect())
    }
}

impl GestureReader for ScriptedReader {
    fn read_gesture(&mut self, _region: &ImageRegion) -> GestureCount {
        GestureCount::new(self.0.pop_front().expect("gesture script exhausted"))
    }
}

/// Throws a fixed sequence of computer values.
pub struct ScriptedOpponent(VecDeque<u8>);

impl ScriptedOpponent {
    pub fn new(values: &[u8]) -> Self {
        Self(values.iter().copied().collect())
    }
}

impl Opponent for ScriptedOpponent {
    fn throw(&mut self) -> u8 {
        self.0.pop_front().expect("opponent script exhausted")
    }
}
