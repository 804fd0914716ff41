use hand_cricket::core_modules::gesture_decoder::{GestureCount, GestureDecoder, GestureReader};
use hand_cricket::core_modules::region::ImageRegion;
use hand_cricket::core_modules::utils::image_helper::save_mask;
use log::{info, warn};
use std::path::PathBuf;

/// The contour decoder, optionally saving the binarized hand mask of every delivery.
pub struct SnapshotReader {
    decoder: GestureDecoder,
    dir: Option<PathBuf>,
    taken: u32,
}

impl SnapshotReader {
    pub fn new(decoder: GestureDecoder, dir: Option<PathBuf>) -> Self {
        Self { decoder, dir, taken: 0 }
    }
}

impl GestureReader for SnapshotReader {
    fn read_gesture(&mut self, region: &ImageRegion) -> GestureCount {
        let Some(dir) = &self.dir else {
            return self.decoder.decode(region);
        };

        let analysis = self.decoder.analyze(region);
        self.taken += 1;
        let path = dir.join(format!("delivery_{:03}_{}.png", self.taken, analysis.count));
        match save_mask(&path, &analysis.mask) {
            Ok(()) => info!("saved hand mask to {}", path.display()),
            Err(err) => warn!("could not save hand mask to {}: {err}", path.display()),
        }
        analysis.count
    }
}
