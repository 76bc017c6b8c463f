//! Pixel diff engine boundary and the default channel-distance engine.

use crate::codec::PixelImage;

/// Per-submission predicate excluding a pixel from comparison.
///
/// Receives the (x, y) coordinate; returning `true` means the pixel can
/// never by itself cause a mismatch.
pub type IgnorePixel<'a> = &'a (dyn Fn(u32, u32) -> bool + Sync);

/// Options driving a pixel comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Maximum summed RGB channel distance still treated as equal.
    ///
    /// 0 (the default) means exact-match semantics.
    pub tolerance: u32,
}

impl DiffOptions {
    /// Set the tolerance
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Result of diffing two equal-sized images
#[derive(Debug, Clone)]
pub struct DiffOutcome {
    /// Visualization: mismatching pixels highlighted, matches faded
    pub image: PixelImage,
    /// Number of differing, non-ignored pixels
    pub differing: usize,
}

impl DiffOutcome {
    /// Whether the compared images matched
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.differing == 0
    }
}

/// Diff capability consumed by the report orchestrator.
///
/// Contract: both images have equal dimensions; callers check before
/// invoking. The default implementation is [`ChannelDiff`].
pub trait DiffEngine: Send + Sync {
    /// Compare two equal-sized images pixel by pixel
    fn diff(
        &self,
        gold: &PixelImage,
        current: &PixelImage,
        options: DiffOptions,
        ignore: Option<IgnorePixel<'_>>,
    ) -> DiffOutcome;
}

/// Highlight color for mismatching pixels in the diff visualization
const MISMATCH_RGBA: [u8; 4] = [255, 0, 0, 255];

/// Default engine: summed RGB channel distance per pixel.
///
/// Mismatches are painted solid red; matching and ignored pixels are
/// painted as the faded current pixel so the visualization keeps its
/// context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelDiff;

impl DiffEngine for ChannelDiff {
    fn diff(
        &self,
        gold: &PixelImage,
        current: &PixelImage,
        options: DiffOptions,
        ignore: Option<IgnorePixel<'_>>,
    ) -> DiffOutcome {
        debug_assert_eq!(gold.dimensions(), current.dimensions());

        let (width, height) = gold.dimensions();
        let mut image = PixelImage::new(width, height);
        let mut differing = 0usize;

        for y in 0..height {
            for x in 0..width {
                let reference = gold.rgba_at(x, y);
                let candidate = current.rgba_at(x, y);
                let ignored = ignore.is_some_and(|skip| skip(x, y));

                if !ignored && channel_distance(reference, candidate) > options.tolerance {
                    differing += 1;
                    image.put_rgba(x, y, MISMATCH_RGBA);
                } else {
                    image.put_rgba(x, y, faded(candidate));
                }
            }
        }

        DiffOutcome { image, differing }
    }
}

/// Summed absolute RGB channel difference (alpha not compared)
fn channel_distance(a: [u8; 4], b: [u8; 4]) -> u32 {
    let dr = i32::from(a[0]) - i32::from(b[0]);
    let dg = i32::from(a[1]) - i32::from(b[1]);
    let db = i32::from(a[2]) - i32::from(b[2]);
    dr.unsigned_abs() + dg.unsigned_abs() + db.unsigned_abs()
}

/// Matching pixel rendered at half intensity for context
const fn faded(rgba: [u8; 4]) -> [u8; 4] {
    [rgba[0] / 2, rgba[1] / 2, rgba[2] / 2, 128]
}
