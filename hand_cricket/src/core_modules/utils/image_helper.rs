use image::{GrayImage, ImageEncoder, ImageError};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes a single-channel mask to `path` as a PNG.
pub fn save_mask(path: &Path, mask: &GrayImage) -> Result<(), ImageError> {
    let output = BufWriter::new(File::create(path)?);
    let encoder = image::codecs::png::PngEncoder::new(output);

    encoder.write_image(mask.as_raw(), mask.width(), mask.height(), image::ExtendedColorType::L8)?;

    Ok(())
}
