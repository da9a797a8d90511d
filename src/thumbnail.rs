use std::path::Path;

use eframe::egui::ColorImage;
use image::ImageFormat;

use crate::error::ImageReadError;

/// Module for turning screenshots and demo thumbnails into egui images.
pub fn decode_image(bytes: &[u8]) -> Result<ColorImage, ImageReadError> {
    // Load image data into an image::DynamicImage and convert to RGBA8
    let img = image::load_from_memory(bytes)?.to_rgba8();
    // Determine the image dimensions for egui
    let size = [img.width() as usize, img.height() as usize];
    // Create a ColorImage from the raw RGBA bytes without premultiplying alpha
    Ok(ColorImage::from_rgba_unmultiplied(size, &img))
}

/// Read a user-picked file, rejecting anything that is not an image by extension.
pub fn read_image_file(path: &Path) -> Result<ColorImage, ImageReadError> {
    if ImageFormat::from_path(path).is_err() {
        return Err(ImageReadError::Unsupported(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}
