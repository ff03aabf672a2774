// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::markup::{Dialect, find_img_tags};
use crate::pipeline::variant::normalize_path;
use indexmap::IndexSet;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Source files scanned for image references.
pub const SOURCE_EXTENSIONS: [&str; 5] = ["html", "js", "jsx", "ts", "tsx"];

static QUOTED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)['"`](.*?\.(?:png|jpe?g|webp|svg))['"`]"#)
        .expect("image reference pattern is valid")
});

/// Lists every file under `dir` with one of `extensions`, sorted.
pub fn source_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    for ext in extensions {
        let root = glob::Pattern::escape(&dir.display().to_string());
        let pattern = format!("{root}/**/*.{ext}");
        files.extend(glob::glob(&pattern)?.flatten().filter(|path| path.is_file()));
    }
    files.sort();
    Ok(files)
}

/// Pulls raw image references out of one source file.
///
/// HTML is read through its `<img>` tags (`src`, else `data-src`); scripts are
/// searched for quoted strings ending in an image extension.
pub fn extract_references(file: &Path, content: &str) -> Vec<String> {
    let is_html = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));

    if is_html {
        find_img_tags(content, Dialect::Html)
            .iter()
            .filter_map(|tag| {
                tag.literal("src")
                    .filter(|src| !src.is_empty())
                    .or_else(|| tag.literal("data-src"))
                    .map(str::to_owned)
            })
            .collect()
    } else {
        QUOTED_IMAGE
            .captures_iter(content)
            .map(|captures| captures[1].to_owned())
            .collect()
    }
}

/// Remote URLs and inline data never go through the pipeline.
pub fn is_local_reference(reference: &str) -> bool {
    !reference.is_empty() && !reference.starts_with("http") && !reference.starts_with("data:")
}

/// Root-relative references live under `image_root`; anything else is relative
/// to the file that mentions it.
pub fn resolve_reference(reference: &str, source_file: &Path, image_root: &Path) -> PathBuf {
    if let Some(root_relative) = reference.strip_prefix('/') {
        normalize_path(&image_root.join(root_relative))
    } else {
        let base = source_file.parent().unwrap_or_else(|| Path::new(""));
        normalize_path(&base.join(reference))
    }
}

/// Scans the configured sources and returns every distinct local image path,
/// in first-seen order.
pub async fn discover_images(config: &PipelineConfig) -> Result<IndexSet<PathBuf>, PipelineError> {
    let mut images = IndexSet::new();

    for file in source_files(&config.input_dir, &SOURCE_EXTENSIONS)? {
        let content = match tokio::fs::read_to_string(&file).await {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping unreadable source {file:?}: {e}");
                continue;
            }
        };

        for reference in extract_references(&file, &content)
            .into_iter()
            .filter(|reference| is_local_reference(reference))
        {
            let path = resolve_reference(&reference, &file, &config.image_root);
            if images.insert(path.clone()) {
                log::info!("Found image: {path:?}");
            }
        }
    }

    Ok(images)
}
