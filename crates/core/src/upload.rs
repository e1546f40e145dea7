//! Upload validation for scrapbook and post images.
//!
//! Validation is synchronous and header-only: the size ceiling is checked
//! first, then the bytes must carry a recognizable raster format whose
//! header yields pixel dimensions. Full decoding never happens here.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// Default upload ceiling: 2 MiB. An upload of exactly this size passes.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("Image file too large. Size should not exceed 2.0 MB.")]
    TooLarge,

    #[error("Upload a valid image or an uncorrupted image.")]
    NotAnImage,
}

/// Metadata extracted from a validated upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Canonical file extension for the detected format (`png`, `jpg`, ...).
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Validate raw upload bytes against a size ceiling and format check.
pub fn validate_image(bytes: &[u8], max_bytes: usize) -> Result<ImageInfo, ImageError> {
    if bytes.len() > max_bytes {
        return Err(ImageError::TooLarge);
    }

    let format = image::guess_format(bytes).map_err(|_| ImageError::NotAnImage)?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|_| ImageError::NotAnImage)?;

    let extension = format.extensions_str().first().copied().unwrap_or("img");

    Ok(ImageInfo {
        extension,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a 1x1 PNG in memory.
    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::new(1, 1);
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png)
            .expect("encoding a 1x1 PNG should succeed");
        bytes.into_inner()
    }

    /// Pad a valid PNG with trailing zeros to an exact total size. Decoders
    /// only read the header, so the padding does not break validation.
    fn padded_png(total: usize) -> Vec<u8> {
        let mut bytes = tiny_png();
        assert!(bytes.len() <= total);
        bytes.resize(total, 0);
        bytes
    }

    #[test]
    fn valid_png_passes() {
        let info = validate_image(&tiny_png(), MAX_IMAGE_BYTES).unwrap();
        assert_eq!(info.extension, "png");
        assert_eq!((info.width, info.height), (1, 1));
    }

    #[test]
    fn exactly_at_ceiling_passes() {
        let bytes = padded_png(MAX_IMAGE_BYTES);
        assert!(validate_image(&bytes, MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn one_byte_over_ceiling_fails() {
        let bytes = padded_png(MAX_IMAGE_BYTES + 1);
        assert_eq!(
            validate_image(&bytes, MAX_IMAGE_BYTES),
            Err(ImageError::TooLarge)
        );
    }

    #[test]
    fn garbage_bytes_fail() {
        assert_eq!(
            validate_image(b"not an image at all", MAX_IMAGE_BYTES),
            Err(ImageError::NotAnImage)
        );
    }

    #[test]
    fn empty_upload_fails() {
        assert_eq!(validate_image(&[], MAX_IMAGE_BYTES), Err(ImageError::NotAnImage));
    }

    #[test]
    fn size_check_runs_before_format_check() {
        let garbage = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert_eq!(
            validate_image(&garbage, MAX_IMAGE_BYTES),
            Err(ImageError::TooLarge)
        );
    }
}
