//! Image codec boundary: encoded bytes to RGBA pixel buffers and back.

use image::ImageEncoder;

use crate::result::{CotejarError, CotejarResult};

/// A decoded image: RGBA8 pixels in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// RGBA8 pixel data, `width * height * 4` bytes
    pub pixels: Vec<u8>,
}

impl PixelImage {
    /// Create a transparent black image of the given size
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Image dimensions as (width, height)
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGBA channels of the pixel at (x, y)
    ///
    /// # Panics
    ///
    /// Panics when (x, y) lies outside the image.
    #[must_use]
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Overwrite the pixel at (x, y)
    ///
    /// # Panics
    ///
    /// Panics when (x, y) lies outside the image.
    pub fn put_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

/// Codec capability consumed by the report orchestrator.
///
/// A narrow seam so tests can substitute a stub codec; the default is
/// [`PngCodec`].
pub trait ImageCodec: Send + Sync {
    /// Decode an encoded image byte stream into an RGBA buffer
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::Decode`] when the bytes are malformed.
    fn decode(&self, bytes: &[u8]) -> CotejarResult<PixelImage>;

    /// Encode an RGBA buffer back into image bytes
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::Encode`] when encoding fails.
    fn encode(&self, image: &PixelImage) -> CotejarResult<Vec<u8>>;
}

/// PNG codec backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> CotejarResult<PixelImage> {
        let decoded = image::load_from_memory(bytes).map_err(|e| CotejarError::Decode {
            message: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        Ok(PixelImage {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }

    fn encode(&self, image: &PixelImage) -> CotejarResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
        encoder
            .write_image(
                &image.pixels,
                image.width,
                image.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| CotejarError::Encode {
                message: e.to_string(),
            })?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> PixelImage {
        let mut img = PixelImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let rgba = if (x + y) % 2 == 0 {
                    [255, 255, 255, 255]
                } else {
                    [0, 0, 0, 255]
                };
                img.put_rgba(x, y, rgba);
            }
        }
        img
    }

    #[test]
    fn test_png_round_trip() {
        let original = checkerboard(4, 3);
        let codec = PngCodec;

        let bytes = codec.encode(&original).unwrap();
        let decoded = codec.decode(&bytes).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let codec = PngCodec;
        let err = codec.decode(&[0, 1, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, CotejarError::Decode { .. }));
    }

    #[test]
    fn test_pixel_accessors() {
        let mut img = PixelImage::new(2, 2);
        img.put_rgba(1, 0, [10, 20, 30, 40]);

        assert_eq!(img.rgba_at(1, 0), [10, 20, 30, 40]);
        assert_eq!(img.rgba_at(0, 0), [0, 0, 0, 0]);
        assert_eq!(img.dimensions(), (2, 2));
    }

    #[test]
    #[should_panic(expected = "pixel out of bounds")]
    fn test_out_of_bounds_access_panics() {
        let img = PixelImage::new(2, 2);
        let _ = img.rgba_at(2, 0);
    }
}
