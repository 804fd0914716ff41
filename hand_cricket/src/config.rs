use crate::core_modules::gesture_decoder::DecoderConfig;
use crate::core_modules::region::RegionRect;
use crate::platform::KeyCode;

/// The two keys the game listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Captures the current hand region as a delivery.
    pub deliver: KeyCode,
    /// Ends the current innings voluntarily.
    pub quit: KeyCode,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            deliver: KeyCode::from_char('c'),
            quit: KeyCode::from_char('q'),
        }
    }
}

/// Configuration for a match, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// The part of every frame the player holds their hand in.
    pub region: RegionRect,
    pub controls: Controls,
    /// Mirror frames horizontally so the preview behaves like a mirror.
    pub mirror_frames: bool,
    /// Seed for the computer's rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub decoder: DecoderConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            region: RegionRect::new(100, 100, 300, 300),
            controls: Controls::default(),
            mirror_frames: true,
            seed: None,
            decoder: DecoderConfig::default(),
        }
    }
}
