// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Widths generated for every discovered image. Shared by the resizer and the
/// markup rewriter; the two must agree on it.
pub const DEFAULT_WIDTHS: [u32; 3] = [400, 800, 1200];
pub const DEFAULT_SIZES: &str = "(max-width: 600px) 100vw, 50vw";
pub const DEFAULT_CONFIG_FILE: &str = "glance.toml";

/// Top level of `glance.toml`. Every table is optional.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlanceConfig {
    pub pipeline: PipelineConfig,
    pub splash: SplashConfig,
}

impl GlanceConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads `path` if it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No config at {path:?}, using defaults");
            Ok(Self::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where the markup and script sources live.
    pub input_dir: PathBuf,
    /// Root for `/`-prefixed image references.
    pub image_root: PathBuf,
    pub output_dir: PathBuf,
    /// URL prefix the rewritten markup points at. Must serve `output_dir`.
    pub image_base_url: String,
    pub widths: Vec<u32>,
    pub sizes: String,
    /// Regenerate variants even when they are newer than their source.
    pub force: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("src"),
            image_root: PathBuf::from("public"),
            output_dir: PathBuf::from("optimized"),
            image_base_url: "/optimized".to_owned(),
            widths: DEFAULT_WIDTHS.to_vec(),
            sizes: DEFAULT_SIZES.to_owned(),
            force: false,
        }
    }
}

impl PipelineConfig {
    /// The width used for the rewritten `src`.
    pub fn smallest_width(&self) -> u32 {
        self.widths
            .iter()
            .copied()
            .min()
            .unwrap_or(DEFAULT_WIDTHS[0])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Directory serving the static files (`top_albums.json`, covers, icons).
    pub data_dir: PathBuf,
    pub chess_username: Option<String>,
    pub easter_egg: Option<EasterEgg>,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("public"),
            chess_username: None,
            easter_egg: None,
        }
    }
}

/// Answer and destination of the hidden title prompt. Kept out of the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EasterEgg {
    pub answer: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.input_dir, PathBuf::from("src"));
        assert_eq!(cfg.image_root, PathBuf::from("public"));
        assert_eq!(cfg.output_dir, PathBuf::from("optimized"));
        assert_eq!(cfg.widths, vec![400, 800, 1200]);
        assert_eq!(cfg.smallest_width(), 400);
    }

    #[test]
    fn test_parse_partial_config_toml() -> Result<(), toml::de::Error> {
        let toml_str = r#"
[pipeline]
output_dir = "public/optimized"
widths = [320, 640]

[splash]
chess_username = "someone"

[splash.easter_egg]
answer = "secret"
url = "https://example.com/album"
"#;

        let cfg: GlanceConfig = toml::from_str(toml_str)?;

        assert_eq!(cfg.pipeline.output_dir, PathBuf::from("public/optimized"));
        assert_eq!(cfg.pipeline.widths, vec![320, 640]);
        assert_eq!(cfg.pipeline.smallest_width(), 320);
        // Untouched keys keep their defaults
        assert_eq!(cfg.pipeline.input_dir, PathBuf::from("src"));
        assert_eq!(cfg.pipeline.sizes, DEFAULT_SIZES);

        assert_eq!(cfg.splash.data_dir, PathBuf::from("public"));
        assert_eq!(cfg.splash.chess_username.as_deref(), Some("someone"));
        assert_eq!(
            cfg.splash.easter_egg,
            Some(EasterEgg {
                answer: "secret".to_owned(),
                url: "https://example.com/album".to_owned(),
            })
        );
        Ok(())
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = GlanceConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(cfg, GlanceConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("glance.toml");
        std::fs::write(&path, "[pipeline\nwidths = 3").unwrap();
        assert!(matches!(
            GlanceConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
