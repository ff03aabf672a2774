// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! The naming contract between the resizer and the markup rewriter:
//! `{output_dir}/{relative_dir}/{base}-{width}{ext}` on disk and
//! `{image_base_url}/{dir}/{base}-{width}{ext}` in markup.
use std::path::{Component, Path, PathBuf};

/// Splits a file name into its stem and its extension including the dot
/// (`""` when there is none).
pub fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

pub fn variant_file_name(stem: &str, width: u32, ext: &str) -> String {
    format!("{stem}-{width}{ext}")
}

/// Lexically resolves `.` and `..` without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Directory of `image_path` relative to `input_dir`, or empty when the image
/// lives outside of it (for example under the public image root).
pub fn relative_output_dir(input_dir: &Path, image_path: &Path) -> PathBuf {
    let image_dir = image_path.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(image_dir)
        .strip_prefix(normalize_path(input_dir))
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// On-disk location of one resized variant of `image_path`.
pub fn variant_output_path(
    input_dir: &Path,
    output_dir: &Path,
    image_path: &Path,
    width: u32,
) -> PathBuf {
    let (stem, ext) = split_name(image_path);
    output_dir
        .join(relative_output_dir(input_dir, image_path))
        .join(variant_file_name(&stem, width, &ext))
}

/// Collapses a markup image path to a clean, relative posix path:
/// leading slashes removed, `.` and `..` segments resolved.
pub fn clean_web_path(src: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in src.trim_start_matches('/').split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Web URL of one resized variant of an already cleaned path.
pub fn variant_url(image_base_url: &str, clean_path: &str, width: u32) -> String {
    let (dir, file) = clean_path.rsplit_once('/').unwrap_or(("", clean_path));
    let (stem, ext) = split_name(Path::new(file));
    let base = image_base_url.trim_end_matches('/');
    let name = variant_file_name(&stem, width, &ext);
    if dir.is_empty() {
        format!("{base}/{name}")
    } else {
        format!("{base}/{dir}/{name}")
    }
}
