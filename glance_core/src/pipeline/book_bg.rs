// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Backdrops for the book gallery: a flat colour taken from the cover with the
//! cover itself tilted in the middle. File names match [`Book::background_path`].
//!
//! [`Book::background_path`]: crate::book::Book::background_path
use crate::error::PipelineError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use rand::Rng as _;
use std::path::Path;

pub const BACKGROUND_SIZE: (u32, u32) = (220, 320);
/// Fraction of the backdrop covered by the cover, on each axis.
pub const COVER_SCALE: f32 = 0.8;
pub const MAX_TILT_DEGREES: f32 = 7.0;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackgroundReport {
    pub written: usize,
    pub failed: usize,
}

/// Mean colour of the cover's visible pixels. Black for a fully transparent image.
pub fn fill_colour(cover: &RgbaImage) -> Rgba<u8> {
    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for pixel in cover.pixels().filter(|pixel| pixel[3] > 0) {
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += u64::from(channel);
        }
        count += 1;
    }
    if count == 0 {
        return Rgba([0, 0, 0, 255]);
    }
    let [r, g, b] = sums.map(|sum| u8::try_from(sum / count).unwrap_or(u8::MAX));
    Rgba([r, g, b, 255])
}

/// Fills a `size` canvas with the cover's colour and centres the cover on it,
/// scaled to [`COVER_SCALE`] and rotated by `tilt_degrees` (clockwise positive).
pub fn make_background(cover: &RgbaImage, size: (u32, u32), tilt_degrees: f32) -> RgbaImage {
    let (width, height) = size;
    let cover_width = ((width as f32 * COVER_SCALE) as u32).max(1);
    let cover_height = ((height as f32 * COVER_SCALE) as u32).max(1);
    let scaled = imageops::resize(cover, cover_width, cover_height, FilterType::Lanczos3);

    // Square of the diagonal, so no corner is clipped whatever the angle.
    let side = f64::from(cover_width).hypot(f64::from(cover_height)).ceil() as u32;
    let mut padded = RgbaImage::from_pixel(side, side, TRANSPARENT);
    imageops::overlay(
        &mut padded,
        &scaled,
        i64::from((side - cover_width) / 2),
        i64::from((side - cover_height) / 2),
    );
    let tilted = rotate_about_center(
        &padded,
        tilt_degrees.to_radians(),
        Interpolation::Bicubic,
        TRANSPARENT,
    );

    let mut background = RgbaImage::from_pixel(width, height, fill_colour(cover));
    imageops::overlay(
        &mut background,
        &tilted,
        (i64::from(width) - i64::from(side)) / 2,
        (i64::from(height) - i64::from(side)) / 2,
    );
    background
}

/// Writes `{id}_bg.webp` into `output_dir` for every `{id}.jpg` in
/// `covers_dir`, each with its own random tilt within [`MAX_TILT_DEGREES`].
///
/// Unreadable covers are counted and skipped.
pub fn generate_book_backgrounds(
    covers_dir: &Path,
    output_dir: &Path,
    size: (u32, u32),
) -> Result<BackgroundReport, PipelineError> {
    let root = glob::Pattern::escape(&covers_dir.display().to_string());
    let pattern = format!("{root}/*.jpg");
    let mut covers: Vec<_> = glob::glob(&pattern)?.flatten().collect();
    covers.sort();

    std::fs::create_dir_all(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;

    let mut rng = rand::rng();
    let mut report = BackgroundReport::default();
    for cover_path in covers {
        let Some(id) = cover_path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let output = output_dir.join(format!("{id}_bg.webp"));
        let tilt = rng.random_range(-MAX_TILT_DEGREES..=MAX_TILT_DEGREES);

        let written = image::open(&cover_path)
            .map_err(|e| PipelineError::image(&cover_path, e))
            .and_then(|cover| {
                let background = make_background(&cover.to_rgba8(), size, tilt);
                DynamicImage::ImageRgba8(background)
                    .to_rgb8()
                    .save_with_format(&output, ImageFormat::WebP)
                    .map_err(|e| PipelineError::image(&output, e))
            });

        match written {
            Ok(()) => {
                log::info!("Saved {output:?} with a {tilt:.2} degree tilt");
                report.written += 1;
            }
            Err(e) => {
                log::error!("{e}");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
