// THEORY:
// This file is the main entry point for the `hand_cricket` library crate. It
// exposes two layers:
//
// -   `core_modules`: the vision stack that turns a hand region into a finger count
//     (`gesture_decoder::decode`), built from small, independently testable stages.
// -   `innings` and `game`: the scoring state machine and the match runner that
//     drives it tick by tick.
//
// Everything that touches real hardware (camera, window, keyboard, randomness,
// console) is a trait in `platform`. The library never links a camera or GUI
// backend itself; the `cricket_player` binary supplies OpenCV implementations,
// and the unit tests supply scripted fakes.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod game;
pub mod innings;
pub mod platform;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Controls, GameConfig};
pub use core_modules::gesture_decoder::{GestureCount, GestureDecoder, decode};
pub use error::CaptureError;
pub use game::{HandCricket, MatchOutcome, MatchResult};
pub use innings::{Innings, InningsEnd, Side};
