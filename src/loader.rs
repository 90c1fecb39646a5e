// Image loading and crop primitives over the `image` crate. The original
// full-resolution buffer is kept next to a possibly downscaled display copy;
// crops are always taken from the original.

use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;

use crate::session::CropBox;

/// Largest dimension shown on screen. Bigger images are downscaled for
/// display only.
pub const DISPLAY_LIMIT_PX: u32 = 1000;

pub struct LoadedImage {
    /// Full-resolution decode, the crop source.
    pub original: DynamicImage,
    /// What the canvas shows; identical to `original` when `scale == 1`.
    pub display: DynamicImage,
    /// Display pixels per original pixel, always <= 1.
    pub scale: f32,
}

/// Downscale factor for an image of the given size, 1.0 when it already fits.
pub fn display_scale(width: u32, height: u32) -> f32 {
    let largest = width.max(height);
    if largest > DISPLAY_LIMIT_PX {
        DISPLAY_LIMIT_PX as f32 / largest as f32
    } else {
        1.0
    }
}

pub fn load(path: &Path) -> Result<LoadedImage> {
    let original =
        image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))?;

    let scale = display_scale(original.width(), original.height());
    let display = if scale < 1.0 {
        let w = (original.width() as f32 * scale) as u32;
        let h = (original.height() as f32 * scale) as u32;
        original.resize_exact(w, h, image::imageops::FilterType::CatmullRom)
    } else {
        original.clone()
    };

    Ok(LoadedImage {
        original,
        display,
        scale,
    })
}

/// Crop the full-resolution buffer to `region`, clamped to the image bounds.
pub fn crop(original: &DynamicImage, region: CropBox) -> DynamicImage {
    let x = region.x1.min(original.width().saturating_sub(1));
    let y = region.y1.min(original.height().saturating_sub(1));
    let width = region.width().min(original.width() - x);
    let height = region.height().min(original.height() - y);
    original.crop_imm(x, y, width, height)
}

pub fn save(img: &DynamicImage, path: &Path) -> Result<()> {
    img.save(path)
        .with_context(|| format!("Failed to save image: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn scale_is_unity_under_the_limit() {
        assert_eq!(display_scale(1000, 600), 1.0);
        assert_eq!(display_scale(300, 300), 1.0);
    }

    #[test]
    fn scale_shrinks_the_largest_dimension_to_the_limit() {
        assert_eq!(display_scale(2000, 500), 0.5);
        assert_eq!(display_scale(500, 4000), 0.25);
    }

    #[test]
    fn crop_takes_the_requested_region() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(200, 100));
        let out = crop(
            &img,
            CropBox {
                x1: 20,
                y1: 20,
                x2: 220,
                y2: 120,
            },
        );
        // Region is clamped to the image bounds.
        assert_eq!(out.width(), 180);
        assert_eq!(out.height(), 80);
    }

    #[test]
    fn crop_inside_bounds_is_exact() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(2000, 500));
        let out = crop(
            &img,
            CropBox {
                x1: 20,
                y1: 20,
                x2: 220,
                y2: 120,
            },
        );
        assert_eq!((out.width(), out.height()), (200, 100));
    }
}
