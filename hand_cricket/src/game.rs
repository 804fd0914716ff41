// THEORY:
// The `game` module runs a whole match on top of the `innings` state machine. It owns
// the per-tick loop that the innings itself knows nothing about: grabbing frames,
// drawing the overlay, polling the keyboard and narrating the result.
//
// A match is always two innings. The computer bats first while the player bowls, then
// the player bats. Each innings opens its own camera through the caller's opener and
// holds it in a `CaptureSession`, so the device is released however the innings ends.
// The window is closed after every innings.
//
// Scores are never global. Each innings returns its final `Innings` value and the two
// are folded into a `MatchResult`; the higher score wins, whatever ended the innings.
//
// Per-tick order:
// 1.  Read a frame and cut the hand region out of it. Either failing ends the innings.
// 2.  Draw the prompt and the hand box.
// 3.  Poll a key and step the innings.
// 4.  After a delivery, draw both numbers. A dismissal ends the loop here, before the
//     frame is shown.
// 5.  Draw the running score and present the frame.

use crate::config::GameConfig;
use crate::core_modules::gesture_decoder::{GestureDecoder, GestureReader};
use crate::core_modules::region::VideoFrame;
use crate::error::CaptureError;
use crate::innings::{Delivery, Innings, InningsEnd, Side};
use crate::platform::{
    Camera, CaptureSession, Commentator, Opponent, OverlayStyle, Position, RandomOpponent, Screen,
};
use log::{info, warn};
use std::cmp::Ordering;
use std::fmt;

const PROMPT_AT: Position = Position::new(10, 50);
const HUMAN_AT: Position = Position::new(10, 100);
const COMPUTER_AT: Position = Position::new(10, 150);
const SCORE_AT: Position = Position::new(10, 200);

const PROMPT_STYLE: OverlayStyle = OverlayStyle::new([0, 255, 0], 1.0, 2);
const HUMAN_STYLE: OverlayStyle = OverlayStyle::new([0, 255, 0], 1.0, 2);
const COMPUTER_STYLE: OverlayStyle = OverlayStyle::new([255, 0, 0], 1.0, 2);
const SCORE_STYLE: OverlayStyle = OverlayStyle::new([0, 255, 255], 1.0, 2);
const REGION_STYLE: OverlayStyle = OverlayStyle::new([0, 0, 255], 1.0, 2);

/// Who won a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    UserWins,
    ComputerWins,
    Tie,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::UserWins => write!(f, "Congratulations! You win!"),
            MatchOutcome::ComputerWins => write!(f, "The computer wins! Better luck next time."),
            MatchOutcome::Tie => write!(f, "It's a tie!"),
        }
    }
}

/// Final scores of both innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub user_score: u32,
    pub computer_score: u32,
}

impl MatchResult {
    pub fn outcome(&self) -> MatchOutcome {
        match self.user_score.cmp(&self.computer_score) {
            Ordering::Greater => MatchOutcome::UserWins,
            Ordering::Less => MatchOutcome::ComputerWins,
            Ordering::Equal => MatchOutcome::Tie,
        }
    }
}

/// Overlay and narration wording for one innings, from the player's point of view.
struct InningsScript {
    verb: &'static str,
    human_label: &'static str,
    computer_label: &'static str,
    score_label: &'static str,
    out_line: &'static str,
}

impl InningsScript {
    fn for_batting(side: Side) -> Self {
        match side {
            Side::Computer => Self {
                verb: "bowl",
                human_label: "Your Bowl",
                computer_label: "Computer Batted",
                score_label: "Computer Score",
                out_line: "The computer is out!",
            },
            Side::User => Self {
                verb: "bat",
                human_label: "Your Bat",
                computer_label: "Computer Bowled",
                score_label: "Your Score",
                out_line: "You are out!",
            },
        }
    }
}

/// Plays hand cricket matches against a computer opponent.
pub struct HandCricket<G, O> {
    config: GameConfig,
    reader: G,
    opponent: O,
}

impl HandCricket<GestureDecoder, RandomOpponent> {
    /// The standard game: the contour decoder against a uniformly random computer.
    pub fn from_config(config: GameConfig) -> Self {
        let reader = GestureDecoder::new(config.decoder);
        let opponent = RandomOpponent::new(config.seed);
        Self::new(config, reader, opponent)
    }
}

impl<G: GestureReader, O: Opponent> HandCricket<G, O> {
    pub fn new(config: GameConfig, reader: G, opponent: O) -> Self {
        Self {
            config,
            reader,
            opponent,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Plays one innings with `batting` at the crease. `camera` is the result of
    /// opening the capture device for this innings; an error ends the innings before
    /// the first ball.
    pub fn play_innings<C, S, N>(
        &mut self,
        batting: Side,
        camera: Result<C, CaptureError>,
        screen: &mut S,
        commentator: &mut N,
    ) -> Innings
    where
        C: Camera,
        S: Screen<C::Frame>,
        N: Commentator,
    {
        let script = InningsScript::for_batting(batting);
        let mut innings = Innings::new(batting);

        match camera {
            Ok(camera) => {
                let mut session = CaptureSession::new(camera);
                self.run_ticks(&mut innings, &script, &mut session, screen);
            }
            Err(err) => {
                warn!("could not open camera for the {batting:?} innings: {err}");
                innings.capture_failed();
            }
        }
        screen.close();

        commentator.announce(&format!("Game Over! {}: {}", script.score_label, innings.score()));
        match innings.ending() {
            Some(InningsEnd::Dismissed) => commentator.announce(script.out_line),
            _ => commentator.announce("You ended the game voluntarily."),
        }
        innings
    }

    fn run_ticks<C, S>(
        &mut self,
        innings: &mut Innings,
        script: &InningsScript,
        session: &mut CaptureSession<C>,
        screen: &mut S,
    ) where
        C: Camera,
        S: Screen<C::Frame>,
    {
        let deliver = self.config.controls.deliver.as_char();
        let prompt = format!("Press \"{deliver}\" to {}!", script.verb);

        while !innings.is_finished() {
            let captured = session.read_frame().and_then(|frame| {
                let region = frame.crop_region(&self.config.region)?;
                Ok((frame, region))
            });
            let (mut frame, region) = match captured {
                Ok(captured) => captured,
                Err(err) => {
                    warn!("capture failed: {err}");
                    innings.capture_failed();
                    break;
                }
            };

            screen.draw_text(&mut frame, &prompt, PROMPT_AT, &PROMPT_STYLE);
            screen.draw_rectangle(&mut frame, &self.config.region, &REGION_STYLE);

            let key = screen.poll_key();
            let tick = innings.step(
                &region,
                key,
                &self.config.controls,
                &mut self.reader,
                &mut self.opponent,
            );

            if let Some(Delivery { human, computer, .. }) = tick.delivery {
                let human_text = format!("{}: {}", script.human_label, human);
                let computer_text = format!("{}: {}", script.computer_label, computer);
                screen.draw_text(&mut frame, &human_text, HUMAN_AT, &HUMAN_STYLE);
                screen.draw_text(&mut frame, &computer_text, COMPUTER_AT, &COMPUTER_STYLE);
            }
            if innings.is_out() {
                break;
            }

            let score_text = format!("{}: {}", script.score_label, innings.score());
            screen.draw_text(&mut frame, &score_text, SCORE_AT, &SCORE_STYLE);
            screen.present_frame(&frame);
        }
    }

    /// Plays both innings and announces the result. `open_camera` is called once per
    /// innings.
    pub fn play_match<C, F, S, N>(
        &mut self,
        mut open_camera: F,
        screen: &mut S,
        commentator: &mut N,
    ) -> MatchResult
    where
        C: Camera,
        F: FnMut() -> Result<C, CaptureError>,
        S: Screen<C::Frame>,
        N: Commentator,
    {
        commentator.announce("You will bowl first!");
        let first = self.play_innings(Side::Computer, open_camera(), screen, commentator);

        commentator.announce("");
        commentator.announce("Now it's your turn to bat!");
        let second = self.play_innings(Side::User, open_camera(), screen, commentator);

        let result = MatchResult {
            user_score: second.score(),
            computer_score: first.score(),
        };
        let outcome = result.outcome();
        info!(
            "match over: user {} ({} balls), computer {} ({} balls): {:?}",
            result.user_score,
            second.balls(),
            result.computer_score,
            first.balls(),
            outcome
        );

        commentator.announce("");
        commentator.announce("Final Scores:");
        commentator.announce(&format!("User Score: {}", result.user_score));
        commentator.announce(&format!("Computer Score: {}", result.computer_score));
        commentator.announce(&outcome.to_string());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::region::RegionRect;
    use crate::testing::{FakeCamera, FakeScreen, ScriptedOpponent, ScriptedReader};
    use std::cell::Cell;
    use std::rc::Rc;

    fn scripted(gestures: &[u8], rolls: &[u8]) -> HandCricket<ScriptedReader, ScriptedOpponent> {
        HandCricket::new(
            GameConfig::default(),
            ScriptedReader::new(gestures),
            ScriptedOpponent::new(rolls),
        )
    }

    #[test]
    fn outcome_compares_scores() {
        let result = |user_score, computer_score| MatchResult {
            user_score,
            computer_score,
        };
        assert_eq!(result(7, 6).outcome(), MatchOutcome::UserWins);
        assert_eq!(result(3, 9).outcome(), MatchOutcome::ComputerWins);
        assert_eq!(result(4, 4).outcome(), MatchOutcome::Tie);
        assert_eq!(MatchOutcome::Tie.to_string(), "It's a tie!");
    }

    #[test]
    fn full_match_is_narrated_and_cleans_up() {
        let mut game = scripted(&[3, 4, 2, 4, 3], &[5, 1, 2, 1, 6]);
        let released = Rc::new(Cell::new(0));
        // Both innings share one key script: three deliveries, then two and a quit.
        let mut screen = FakeScreen::with_keys("cccccq");
        let mut lines: Vec<String> = Vec::new();

        let open = || Ok::<_, CaptureError>(FakeCamera::new(10, released.clone()));
        let result = game.play_match(open, &mut screen, &mut lines);

        assert_eq!(
            result,
            MatchResult {
                user_score: 7,
                computer_score: 6
            }
        );
        assert_eq!(result.outcome(), MatchOutcome::UserWins);
        assert_eq!(released.get(), 2);
        assert_eq!(screen.closed, 2);
        assert_eq!(
            lines,
            vec![
                "You will bowl first!",
                "Game Over! Computer Score: 6",
                "The computer is out!",
                "",
                "Now it's your turn to bat!",
                "Game Over! Your Score: 7",
                "You ended the game voluntarily.",
                "",
                "Final Scores:",
                "User Score: 7",
                "Computer Score: 6",
                "Congratulations! You win!",
            ]
        );
    }

    #[test]
    fn overlay_follows_each_tick() {
        let mut game = scripted(&[2, 5], &[4, 5]);
        let released = Rc::new(Cell::new(0));
        let mut screen = FakeScreen::with_keys(" cc");
        let mut lines: Vec<String> = Vec::new();

        let camera = Ok::<_, CaptureError>(FakeCamera::new(10, released.clone()));
        let innings = game.play_innings(Side::User, camera, &mut screen, &mut lines);

        assert!(innings.is_out());
        assert_eq!(innings.score(), 2);
        assert_eq!(
            screen.texts,
            vec![
                "Press \"c\" to bat!",
                "Your Score: 0",
                "Press \"c\" to bat!",
                "Your Bat: 2",
                "Computer Bowled: 4",
                "Your Score: 2",
                "Press \"c\" to bat!",
                "Your Bat: 5",
                "Computer Bowled: 5",
            ]
        );
        // The dismissal frame is never shown.
        assert_eq!(screen.presented, 2);
        assert_eq!(screen.rectangles, vec![RegionRect::new(100, 100, 300, 300); 3]);
        assert_eq!(lines, vec!["Game Over! Your Score: 2", "You are out!"]);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn camera_failures_end_innings_but_keep_scores() {
        let mut game = scripted(&[1, 6], &[2, 3]);
        let released = Rc::new(Cell::new(0));
        let mut opened = 0;
        let mut screen = FakeScreen::with_keys("cc");
        let mut lines: Vec<String> = Vec::new();

        let result = game.play_match(
            || {
                opened += 1;
                if opened == 1 {
                    Ok(FakeCamera::new(2, released.clone()))
                } else {
                    Err(CaptureError::Unavailable("0".to_string()))
                }
            },
            &mut screen,
            &mut lines,
        );

        assert_eq!(
            result,
            MatchResult {
                user_score: 0,
                computer_score: 5
            }
        );
        assert_eq!(result.outcome(), MatchOutcome::ComputerWins);
        assert_eq!(released.get(), 1);
        assert_eq!(screen.closed, 2);
        assert_eq!(lines[1], "Game Over! Computer Score: 5");
        assert_eq!(lines[2], "You ended the game voluntarily.");
        assert_eq!(lines[5], "Game Over! Your Score: 0");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("The computer wins! Better luck next time.")
        );
    }

    #[test]
    fn scoreless_match_is_a_tie() {
        let mut game = scripted(&[], &[]);
        let released = Rc::new(Cell::new(0));
        let mut screen = FakeScreen::with_keys("q q");
        let mut lines: Vec<String> = Vec::new();

        let open = || Ok::<_, CaptureError>(FakeCamera::new(5, released.clone()));
        let result = game.play_match(open, &mut screen, &mut lines);

        assert_eq!(result.outcome(), MatchOutcome::Tie);
        assert_eq!(result.user_score, 0);
        assert_eq!(released.get(), 2);
        assert_eq!(lines.last().map(String::as_str), Some("It's a tie!"));
    }

    #[test]
    fn region_outside_the_frame_ends_the_innings() {
        let mut game = scripted(&[], &[]);
        let released = Rc::new(Cell::new(0));
        let mut screen = FakeScreen::with_keys("c");
        let mut lines: Vec<String> = Vec::new();

        let camera = FakeCamera::new(5, released.clone()).with_size(200, 200);
        let innings = game.play_innings(Side::Computer, Ok(camera), &mut screen, &mut lines);

        assert_eq!(innings.ending(), Some(InningsEnd::CaptureFailed));
        assert_eq!(innings.balls(), 0);
        assert!(screen.texts.is_empty());
        assert_eq!(released.get(), 1);
        assert_eq!(screen.closed, 1);
    }

    #[test]
    fn standard_game_uses_the_configured_decoder() {
        let mut config = GameConfig::default();
        config.decoder.blur_kernel = 1;
        config.seed = Some(3);
        let game = HandCricket::from_config(config);
        assert_eq!(game.config().decoder.blur_kernel, 1);
    }
}
