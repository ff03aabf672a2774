// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::discover::discover_images;
use crate::pipeline::variant::variant_output_path;
use crate::pipeline::{PipelineReport, VariantOutcome};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};

/// Vector images scale for free; their variants are plain copies.
fn is_vector(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// True when `output` exists and was written after `source` last changed.
fn is_up_to_date(source: &Path, output: &Path) -> bool {
    let modified = |path: &Path| std::fs::metadata(path).and_then(|m| m.modified()).ok();
    match (modified(source), modified(output)) {
        (Some(source_time), Some(output_time)) => output_time >= source_time,
        _ => false,
    }
}

/// Resizes `image` to `width`, keeping the aspect ratio.
pub fn resize_to_width(image: &DynamicImage, width: u32) -> DynamicImage {
    let height = (image.height() as f64 * width as f64 / image.width() as f64)
        .round()
        .max(1.0) as u32;
    image.resize_exact(width, height, FilterType::Lanczos3)
}

fn save_variant(image: &DynamicImage, output: &Path) -> Result<(), PipelineError> {
    // JPEG has no alpha channel.
    let saved = if matches!(ImageFormat::from_path(output), Ok(ImageFormat::Jpeg)) {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(output)
    } else {
        image.save(output)
    };
    saved.map_err(|e| PipelineError::image(output, e))
}

/// Decoded lazily, once per source image, and only if some variant needs it.
type DecodeCache = Option<Result<DynamicImage, String>>;

fn write_variant(
    image_path: &Path,
    output: &Path,
    width: u32,
    force: bool,
    decoded: &mut DecodeCache,
) -> Result<VariantOutcome, PipelineError> {
    if !force && is_up_to_date(image_path, output) {
        return Ok(VariantOutcome::Skipped);
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }

    if is_vector(image_path) {
        std::fs::copy(image_path, output).map_err(|e| PipelineError::io(image_path, e))?;
        return Ok(VariantOutcome::Copied);
    }

    let image = decoded
        .get_or_insert_with(|| image::open(image_path).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|message| PipelineError::Decode {
            path: image_path.to_path_buf(),
            message: message.clone(),
        })?;

    if image.width() > width {
        save_variant(&resize_to_width(image, width), output)?;
        Ok(VariantOutcome::Resized)
    } else {
        std::fs::copy(image_path, output).map_err(|e| PipelineError::io(image_path, e))?;
        Ok(VariantOutcome::Copied)
    }
}

/// Writes every configured width of one image.
///
/// An image wider than the target is downscaled; anything else is copied
/// unchanged, so each variant's width is `min(target, original)`.
pub fn resize_image(
    image_path: &Path,
    config: &PipelineConfig,
) -> Vec<(PathBuf, Result<VariantOutcome, PipelineError>)> {
    let mut decoded = None;
    let mut results = Vec::with_capacity(config.widths.len());

    for &width in &config.widths {
        let output =
            variant_output_path(&config.input_dir, &config.output_dir, image_path, width);
        let outcome = write_variant(image_path, &output, width, config.force, &mut decoded);

        match &outcome {
            Ok(VariantOutcome::Resized) => log::info!("Resized {image_path:?} -> {output:?}"),
            Ok(VariantOutcome::Copied) => {
                log::info!("Copied (too small) {image_path:?} -> {output:?}");
            }
            Ok(VariantOutcome::Skipped) => log::debug!("Up to date: {output:?}"),
            Err(e) => log::error!("Error processing {image_path:?}: {e}"),
        }
        results.push((output, outcome));
    }

    results
}

/// Discovers every referenced image and writes its resized variants.
///
/// A failing image is logged and counted; the run always continues.
pub async fn optimize_images(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    let images = discover_images(config).await?;
    let mut report = PipelineReport {
        discovered: images.len(),
        ..Default::default()
    };

    for image_path in images {
        let task_config = config.clone();
        let results =
            tokio::task::spawn_blocking(move || resize_image(&image_path, &task_config)).await?;
        for (_, outcome) in &results {
            report.record(outcome);
        }
    }

    log::info!("{report}");
    Ok(report)
}
