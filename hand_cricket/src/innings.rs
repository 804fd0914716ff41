// THEORY:
// The `innings` module is the scoring state machine. One `Innings` value is one
// side's turn at the crease: it starts awaiting input, absorbs deliveries, and
// ends exactly once.
//
// Per tick (`step`):
// -   The deliver key reads the player's fingers from the hand region and draws the
//     computer's number. Equal numbers dismiss the batting side. Otherwise the
//     batting side's own number is added to its score, unless it is zero.
// -   The quit key ends the innings voluntarily.
// -   Anything else leaves the innings waiting for the next tick.
//
// Who bats decides whose number scores: when the computer bats, its roll scores and
// the player's gesture is the ball that can bowl it out; when the player bats, the
// gesture scores and the computer's roll can bowl the player out.
//
// An innings ends by dismissal, voluntary stop, or camera failure, and the terminal
// reason is stored once. Every call after that is ignored, so a finished innings can
// never report a second ending or change its score.

use crate::config::Controls;
use crate::core_modules::gesture_decoder::{GestureCount, GestureReader};
use crate::core_modules::region::ImageRegion;
use crate::platform::{KeyCode, Opponent};
use log::{info, warn};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    User,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::User => Side::Computer,
            Side::Computer => Side::User,
        }
    }
}

/// Why an innings ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InningsEnd {
    /// The batter's and bowler's numbers matched.
    Dismissed,
    /// The player pressed the quit key.
    VoluntaryStop,
    /// No frame could be captured.
    CaptureFailed,
}

/// One ball: both numbers and the runs it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// The player's decoded finger count.
    pub human: GestureCount,
    /// The computer's number.
    pub computer: u8,
    /// Runs added to the batting side's score.
    pub runs: u32,
}

impl Delivery {
    pub fn is_wicket(&self) -> bool {
        self.human.value() == self.computer
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tick {
    pub delivery: Option<Delivery>,
    /// Set on the one tick that ends the innings.
    pub ending: Option<InningsEnd>,
}

/// One side's turn at accumulating runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Innings {
    batting: Side,
    score: u32,
    balls: u32,
    ending: Option<InningsEnd>,
}

impl Innings {
    pub fn new(batting: Side) -> Self {
        Self {
            batting,
            score: 0,
            balls: 0,
            ending: None,
        }
    }

    pub fn batting_side(&self) -> Side {
        self.batting
    }

    pub fn bowling_side(&self) -> Side {
        self.batting.opponent()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Deliveries faced so far, including the one that dismissed the batter.
    pub fn balls(&self) -> u32 {
        self.balls
    }

    pub fn ending(&self) -> Option<InningsEnd> {
        self.ending
    }

    pub fn is_finished(&self) -> bool {
        self.ending.is_some()
    }

    pub fn is_out(&self) -> bool {
        self.ending == Some(InningsEnd::Dismissed)
    }

    pub fn is_voluntary_stop(&self) -> bool {
        self.ending == Some(InningsEnd::VoluntaryStop)
    }

    fn finish(&mut self, ending: InningsEnd) -> Option<InningsEnd> {
        if self.ending.is_some() {
            return None;
        }
        self.ending = Some(ending);
        info!("{:?} innings over: {:?} with {} runs", self.batting, ending, self.score);
        Some(ending)
    }

    /// Applies one delivery: the player's finger count against the computer's number.
    pub fn deliver(&mut self, human: GestureCount, computer: u8) -> Tick {
        if self.is_finished() {
            return Tick::default();
        }
        self.balls += 1;

        let mut delivery = Delivery {
            human,
            computer,
            runs: 0,
        };
        if delivery.is_wicket() {
            info!("{:?} bats, ball {}: {} vs {} -> out", self.batting, self.balls, human, computer);
            return Tick {
                delivery: Some(delivery),
                ending: self.finish(InningsEnd::Dismissed),
            };
        }

        let runs = match self.batting {
            Side::Computer => computer as u32,
            Side::User => human.value() as u32,
        };
        if runs != 0 {
            self.score += runs;
            delivery.runs = runs;
        }
        info!(
            "{:?} bats, ball {}: {} vs {} -> {} runs (total {})",
            self.batting, self.balls, human, computer, delivery.runs, self.score
        );

        Tick {
            delivery: Some(delivery),
            ending: None,
        }
    }

    /// Ends the innings at the player's request.
    pub fn stop(&mut self) -> Tick {
        Tick {
            delivery: None,
            ending: self.finish(InningsEnd::VoluntaryStop),
        }
    }

    /// Ends the innings because no frame could be captured.
    pub fn capture_failed(&mut self) -> Tick {
        if !self.is_finished() {
            warn!("{:?} innings cut short: camera failure", self.batting);
        }
        Tick {
            delivery: None,
            ending: self.finish(InningsEnd::CaptureFailed),
        }
    }

    /// Advances the innings by one tick of the game loop.
    pub fn step<G, O>(
        &mut self,
        region: &ImageRegion,
        key: Option<KeyCode>,
        controls: &Controls,
        reader: &mut G,
        opponent: &mut O,
    ) -> Tick
    where
        G: GestureReader,
        O: Opponent,
    {
        if self.is_finished() {
            return Tick::default();
        }
        match key {
            Some(k) if k == controls.deliver => {
                let human = reader.read_gesture(region);
                let computer = opponent.throw();
                self.deliver(human, computer)
            }
            Some(k) if k == controls.quit => self.stop(),
            _ => Tick::default(),
        }
    }
}
