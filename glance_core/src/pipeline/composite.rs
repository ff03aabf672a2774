// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::album::Album;
use crate::error::PipelineError;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};

/// Fraction of the record covered by the album art.
pub const COVER_SCALE: f32 = 0.7;
const COVER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositeReport {
    pub written: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Scales `cover` to [`COVER_SCALE`] of the record and centres it on a copy of `record`.
pub fn composite_on_record(record: &RgbaImage, cover: &RgbaImage) -> RgbaImage {
    let cover_width = ((record.width() as f32 * COVER_SCALE) as u32).max(1);
    let cover_height = ((record.height() as f32 * COVER_SCALE) as u32).max(1);
    let scaled = imageops::resize(cover, cover_width, cover_height, FilterType::Lanczos3);

    let mut composite = record.clone();
    imageops::overlay(
        &mut composite,
        &scaled,
        i64::from(record.width().saturating_sub(cover_width) / 2),
        i64::from(record.height().saturating_sub(cover_height) / 2),
    );
    composite
}

/// Looks for `{stem}.{jpg,jpeg,png,webp}` in `covers_dir`.
pub fn find_cover(covers_dir: &Path, stem: &str) -> Option<PathBuf> {
    COVER_EXTENSIONS
        .iter()
        .map(|ext| covers_dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}

/// Writes `{stem}_on_record.webp` into `output_dir` for every album with a
/// downloaded cover. The file names match [`Album::composite_image_path`].
///
/// Only an unreadable record image aborts the run.
pub fn composite_albums(
    albums: &[Album],
    record_path: &Path,
    covers_dir: &Path,
    output_dir: &Path,
) -> Result<CompositeReport, PipelineError> {
    let record = image::open(record_path)
        .map_err(|e| PipelineError::image(record_path, e))?
        .to_rgba8();
    std::fs::create_dir_all(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;

    let mut report = CompositeReport::default();
    for album in albums {
        let stem = album.asset_stem();
        let Some(cover_path) = find_cover(covers_dir, stem) else {
            log::warn!("Missing cover for {:?}: {stem} in {covers_dir:?}", album.album);
            report.missing += 1;
            continue;
        };

        let output = output_dir.join(format!("{stem}_on_record.webp"));
        let written = image::open(&cover_path)
            .map_err(|e| PipelineError::image(&cover_path, e))
            .and_then(|cover| {
                composite_on_record(&record, &cover.to_rgba8())
                    .save_with_format(&output, ImageFormat::WebP)
                    .map_err(|e| PipelineError::image(&output, e))
            });

        match written {
            Ok(()) => {
                log::info!("Saved {output:?}");
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

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn album(id: &str) -> Album {
        Album {
            album: format!("Album {id}"),
            album_id: Some(id.to_owned()),
            artist: "X".to_owned(),
            artist_id: None,
            cover: None,
            url: "http://x".to_owned(),
        }
    }

    #[test]
    fn test_composite_centres_scaled_cover() {
        let record = RgbaImage::from_pixel(100, 100, BLUE);
        let cover = RgbaImage::from_pixel(10, 10, RED);

        let composite = composite_on_record(&record, &cover);

        assert_eq!(composite.dimensions(), (100, 100));
        assert_eq!(*composite.get_pixel(50, 50), RED);
        assert_eq!(*composite.get_pixel(20, 20), RED);
        assert_eq!(*composite.get_pixel(5, 5), BLUE);
        assert_eq!(*composite.get_pixel(95, 50), BLUE);
        // The record itself is untouched.
        assert_eq!(*record.get_pixel(50, 50), BLUE);
    }

    #[test]
    fn test_composite_albums_skips_missing_covers() {
        let dir = TempDir::new().unwrap();
        let record_path = dir.path().join("record.png");
        RgbaImage::from_pixel(40, 40, BLUE).save(&record_path).unwrap();

        let covers = dir.path().join("album_covers");
        std::fs::create_dir_all(&covers).unwrap();
        RgbaImage::from_pixel(8, 8, RED)
            .save(covers.join("1.png"))
            .unwrap();

        let output = dir.path().join("album_composites");
        let report =
            composite_albums(&[album("1"), album("2")], &record_path, &covers, &output).unwrap();

        assert_eq!(
            report,
            CompositeReport {
                written: 1,
                missing: 1,
                failed: 0
            }
        );
        let written = output.join("1_on_record.webp");
        assert_eq!(image::image_dimensions(&written).unwrap(), (40, 40));
        assert!(
            album("1")
                .composite_image_path()
                .ends_with("1_on_record.webp")
        );
    }

    #[test]
    fn test_composite_albums_requires_record() {
        let dir = TempDir::new().unwrap();
        let result = composite_albums(
            &[album("1")],
            &dir.path().join("missing.png"),
            dir.path(),
            &dir.path().join("out"),
        );
        assert!(matches!(result, Err(PipelineError::Image { .. })));
    }
}
