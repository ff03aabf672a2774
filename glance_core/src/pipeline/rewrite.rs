// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::discover::source_files;
use crate::pipeline::markup::{AttrValue, Dialect, find_img_tags};
use crate::pipeline::variant::{clean_web_path, split_name, variant_url};
use std::ops::Range;
use std::path::Path;

/// Image types the resizer produces raster variants for.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = [".webp", ".jpg", ".jpeg", ".png"];
/// Only component sources are rewritten; plain HTML is left alone.
pub const REWRITE_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

const SRC_SET_NAMES: [&str; 2] = ["srcSet", "srcset"];
const SIZES_NAMES: [&str; 1] = ["sizes"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteReport {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub tags_updated: usize,
}

struct Edit {
    span: Range<usize>,
    text: String,
}

fn has_supported_extension(src: &str) -> bool {
    let (_, ext) = split_name(Path::new(src));
    SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// `src` of the smallest variant.
pub fn build_src(config: &PipelineConfig, clean_path: &str) -> String {
    variant_url(&config.image_base_url, clean_path, config.smallest_width())
}

/// `srcSet` listing every variant as `url {width}w`.
pub fn build_src_set(config: &PipelineConfig, clean_path: &str) -> String {
    config
        .widths
        .iter()
        .map(|&width| {
            format!(
                "{} {width}w",
                variant_url(&config.image_base_url, clean_path, width)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether `src` already points at a generated variant, which makes the tag a
/// fixed point of the rewrite.
pub fn is_optimized_src(config: &PipelineConfig, src: &str) -> bool {
    let base = config.image_base_url.trim_end_matches('/');
    let Some(rest) = src.strip_prefix(base).and_then(|rest| rest.strip_prefix('/')) else {
        return false;
    };
    let (stem, _) = split_name(Path::new(rest));
    config
        .widths
        .iter()
        .any(|width| stem.ends_with(&format!("-{width}")))
}

fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.span.start);
    let mut output = String::with_capacity(source.len() + edits.len() * 64);
    let mut cursor = 0;
    for edit in edits {
        output.push_str(&source[cursor..edit.span.start]);
        output.push_str(&edit.text);
        cursor = edit.span.end;
    }
    output.push_str(&source[cursor..]);
    output
}

/// Points every raster `<img src="...">` at its resized variants and sets
/// `srcSet` and `sizes`. Returns the new source and the number of tags updated.
///
/// Edits stay on the tag's own lines, so line numbers are preserved.
pub fn rewrite_source(source: &str, config: &PipelineConfig) -> (String, usize) {
    let mut edits = Vec::new();
    let mut updated = 0;

    for tag in find_img_tags(source, Dialect::Script) {
        let Some(AttrValue::Literal { value, quote, span }) =
            tag.attribute("src").and_then(|attr| attr.value.as_ref())
        else {
            continue;
        };
        if !has_supported_extension(value) || is_optimized_src(config, value) {
            continue;
        }

        let clean_path = clean_web_path(value);
        let quote = quote.unwrap_or('"');
        edits.push(Edit {
            span: span.clone(),
            text: format!("{quote}{}{quote}", build_src(config, &clean_path)),
        });

        let src_set = build_src_set(config, &clean_path);
        let mut inserted = String::new();
        for (names, new_value) in [(&SRC_SET_NAMES[..], &src_set), (&SIZES_NAMES[..], &config.sizes)] {
            match tag.attribute_any(names) {
                Some(existing) => edits.push(Edit {
                    span: existing.span.clone(),
                    text: format!("{}=\"{new_value}\"", existing.name),
                }),
                None => inserted.push_str(&format!(" {}=\"{new_value}\"", names[0])),
            }
        }
        if !inserted.is_empty() {
            edits.push(Edit {
                span: tag.insert_at..tag.insert_at,
                text: inserted,
            });
        }

        log::info!("Updated <img src=\"{value}\">");
        updated += 1;
    }

    (apply_edits(source, edits), updated)
}

/// Rewrites every component source under the input directory in place.
/// Files are only written when something changed.
pub async fn rewrite_images(config: &PipelineConfig) -> Result<RewriteReport, PipelineError> {
    let mut report = RewriteReport::default();

    for file in source_files(&config.input_dir, &REWRITE_EXTENSIONS)? {
        report.files_scanned += 1;
        let source = tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| PipelineError::io(&file, e))?;

        let (rewritten, updated) = rewrite_source(&source, config);
        if updated == 0 || rewritten == source {
            continue;
        }

        tokio::fs::write(&file, rewritten)
            .await
            .map_err(|e| PipelineError::io(&file, e))?;
        log::info!("Rewrote {updated} image tag(s) in {file:?}");
        report.files_changed += 1;
        report.tags_updated += updated;
    }

    log::info!(
        "All image tags updated: {} tag(s) in {} of {} file(s)",
        report.tags_updated,
        report.files_changed,
        report.files_scanned
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SIZES: &str = "(max-width: 600px) 100vw, 50vw";

    #[test]
    fn test_rewrite_adds_src_set_and_sizes() {
        let config = PipelineConfig::default();
        let (output, updated) = rewrite_source(r#"<img src="/stamp.webp" alt="Stamp" />"#, &config);
        assert_eq!(updated, 1);
        assert_eq!(
            output,
            format!(
                r#"<img src="/optimized/stamp-400.webp" alt="Stamp" srcSet="/optimized/stamp-400.webp 400w, /optimized/stamp-800.webp 800w, /optimized/stamp-1200.webp 1200w" sizes="{SIZES}" />"#
            )
        );
    }

    #[test]
    fn test_rewrite_replaces_existing_attributes() {
        let config = PipelineConfig::default();
        let source = r#"<img srcSet={old} src='photos/a.JPG' sizes="100vw">"#;
        let (output, updated) = rewrite_source(source, &config);
        assert_eq!(updated, 1);
        assert_eq!(
            output,
            format!(
                r#"<img srcSet="/optimized/photos/a-400.JPG 400w, /optimized/photos/a-800.JPG 800w, /optimized/photos/a-1200.JPG 1200w" src='/optimized/photos/a-400.JPG' sizes="{SIZES}">"#
            )
        );
    }

    #[test]
    fn test_rewrite_is_a_fixed_point() {
        let config = PipelineConfig::default();
        let source = "const A = () => (\n  <div>\n    <img\n      src=\"/couple.webp\"\n      alt=\"Couple\"\n    />\n    <img src=\"/b.png\" srcset=\"x 1w\" />\n  </div>\n);\n";
        let (once, first_updates) = rewrite_source(source, &config);
        let (twice, second_updates) = rewrite_source(&once, &config);

        assert_eq!(first_updates, 2);
        assert_eq!(second_updates, 0);
        assert_eq!(once, twice);
        assert_eq!(once.matches("srcSet=").count(), 1);
        assert_eq!(once.matches("srcset=").count(), 1);
        assert_eq!(once.lines().count(), source.lines().count());
    }

    #[test]
    fn test_rewrite_leaves_unsupported_sources_alone() {
        let config = PipelineConfig::default();
        let source = r#"<img src="/ring.svg" /><img src={cover} /><img src="https://x/y.png" alt="remote" />"#;
        let (output, updated) = rewrite_source(source, &config);
        // Remote URLs have a supported extension; only the path is rewritten.
        assert_eq!(updated, 1);
        assert!(output.starts_with(r#"<img src="/ring.svg" /><img src={cover} />"#));
    }

    #[test]
    fn test_rewrite_ignores_markup_in_strings_and_comments() {
        let config = PipelineConfig::default();
        let source = concat!(
            "const html = '<img src=\"/a.png\">';\n",
            "// <img src=\"/b.png\" />\n",
            "const card = `<img src=\"/c.png\" alt=\"${alt}\">`;\n",
            "{/* <img src=\"/d.png\" /> */}\n",
            "export const Note = () => <p>It's not an image</p>;\n",
        );
        let (output, updated) = rewrite_source(source, &config);
        assert_eq!(updated, 0);
        assert_eq!(output, source);
    }

    #[test]
    fn test_is_optimized_src() {
        let config = PipelineConfig::default();
        assert!(is_optimized_src(&config, "/optimized/stamp-400.webp"));
        assert!(is_optimized_src(&config, "/optimized/a/b-1200.JPG"));
        assert!(!is_optimized_src(&config, "/optimized/stamp.webp"));
        assert!(!is_optimized_src(&config, "/stamp-400.webp"));
        assert!(!is_optimized_src(&config, "/optimizedx/stamp-400.webp"));
    }

    #[test]
    fn test_build_src_set_follows_configured_widths() {
        let config = PipelineConfig {
            widths: vec![320, 640],
            image_base_url: "/img".to_owned(),
            ..Default::default()
        };
        assert_eq!(build_src(&config, "a.png"), "/img/a-320.png");
        assert_eq!(
            build_src_set(&config, "a.png"),
            "/img/a-320.png 320w, /img/a-640.png 640w"
        );
    }

    #[tokio::test]
    async fn test_rewrite_images_only_writes_changed_files() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("A.tsx"), r#"<img src="/a.png" />"#).unwrap();
        std::fs::write(src.join("B.tsx"), r#"<p>no images</p>"#).unwrap();
        std::fs::write(src.join("index.html"), r#"<img src="/a.png">"#).unwrap();

        let config = PipelineConfig {
            input_dir: src.clone(),
            ..Default::default()
        };
        let report = rewrite_images(&config).await.unwrap();
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.files_changed, 1);
        assert_eq!(report.tags_updated, 1);

        let a = std::fs::read_to_string(src.join("A.tsx")).unwrap();
        assert!(a.contains("/optimized/a-400.png"));
        let html = std::fs::read_to_string(src.join("index.html")).unwrap();
        assert_eq!(html, r#"<img src="/a.png">"#);

        let again = rewrite_images(&config).await.unwrap();
        assert_eq!(again.files_changed, 0);
    }
}
