mod camera;
mod logging;
mod snapshot;
mod window;

use anyhow::{Context, ensure};
use camera::OpenCvCamera;
use clap::Parser;
use hand_cricket::config::GameConfig;
use hand_cricket::core_modules::gesture_decoder::GestureDecoder;
use hand_cricket::core_modules::region::RegionRect;
use hand_cricket::game::HandCricket;
use hand_cricket::platform::{Commentator, RandomOpponent};
use log::info;
use snapshot::SnapshotReader;
use std::path::PathBuf;
use window::OpenCvWindow;

const WINDOW_TITLE: &str = "Hand Cricket";

/// Play hand cricket against the computer using your webcam.
///
/// Hold your hand inside the blue box and press "c" to play a ball; "q" ends the
/// current innings.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Index of the capture device.
    #[arg(long, default_value_t = 0)]
    camera: i32,

    /// Seed for the computer's rolls, for a reproducible match.
    #[arg(long)]
    seed: Option<u64>,

    /// Left edge of the hand box.
    #[arg(long, default_value_t = 100)]
    region_x: u32,

    /// Top edge of the hand box.
    #[arg(long, default_value_t = 100)]
    region_y: u32,

    /// Side length of the (square) hand box.
    #[arg(long, default_value_t = 300)]
    region_size: u32,

    /// Gaussian kernel size applied before thresholding; 1 disables smoothing.
    #[arg(long, default_value_t = 35)]
    blur_kernel: u32,

    /// Show the raw camera image instead of a mirrored one.
    #[arg(long)]
    no_mirror: bool,

    /// Save the binarized hand mask of every delivery as a PNG in this directory.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log decoder details.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        let mut config = GameConfig {
            region: RegionRect::square(self.region_x, self.region_y, self.region_size),
            mirror_frames: !self.no_mirror,
            seed: self.seed,
            ..GameConfig::default()
        };
        config.decoder.blur_kernel = self.blur_kernel;
        config
    }
}

/// Prints the commentary on the console.
struct Console;

impl Commentator for Console {
    fn announce(&mut self, line: &str) {
        println!("{line}");
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_stdout_logger(args.verbose);
    ensure!(args.region_size > 0, "--region-size must be positive");

    if let Some(dir) = &args.snapshot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating snapshot directory {}", dir.display()))?;
    }

    let config = args.game_config();
    info!("starting match with {config:?}");
    let decoder = GestureDecoder::new(config.decoder);
    let reader = SnapshotReader::new(decoder, args.snapshot_dir.clone());
    let opponent = RandomOpponent::new(config.seed);
    let mirror = config.mirror_frames;
    let mut game = HandCricket::new(config, reader, opponent);

    let mut window = OpenCvWindow::new(WINDOW_TITLE);
    let open_camera = || OpenCvCamera::open(args.camera, mirror);
    let result = game.play_match(open_camera, &mut window, &mut Console);
    info!("final result: {result:?} ({:?})", result.outcome());

    Ok(())
}
