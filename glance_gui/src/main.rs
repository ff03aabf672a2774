// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Native rendition of the interactive portfolio splash. It sets up logging,
//! reads `glance.toml` and opens the `eframe` window.

#![warn(clippy::all, rust_2018_idioms)]
// Hide the console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
pub(crate) mod extensions;

pub use app::GlanceSplash;

use glance_core::config::{DEFAULT_CONFIG_FILE, GlanceConfig};
use std::path::Path;

const APP_NAME: &str = "Glance Splash";

fn main() -> eframe::Result {
    use std::io::Write as _;

    if let Err(e) = setup_logging() {
        // NOTE: Opted against `eprintln!()` to avoid panicking.
        #[expect(clippy::let_underscore_must_use)]
        let _ = writeln!(std::io::stderr(), "Error setting up logging: {e}");
    }

    let (config, config_error) = match GlanceConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE)) {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Failed to read {DEFAULT_CONFIG_FILE}: {e}");
            (GlanceConfig::default(), Some(e.to_string()))
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 360.0]),
        persist_window: false,
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(GlanceSplash::new(
                cc,
                config.splash,
                config_error,
            )?))
        }),
    )
}

fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ));
        })
        .level(log::LevelFilter::Info);

    #[cfg(debug_assertions)]
    {
        // Debug build: Log to the console (stdout)
        config = config
            .level(log::LevelFilter::Debug)
            .chain(std::io::stdout());
    }

    #[cfg(not(debug_assertions))]
    {
        use std::path::PathBuf;
        // Release build: Log to a file in the system's config directory

        let config_dir: PathBuf =
            dirs_next::config_dir().ok_or("Failed to find a config directory")?;

        let app_log_dir = config_dir.join(APP_NAME);

        std::fs::create_dir_all(&app_log_dir)?;

        let log_file = app_log_dir.join("app.log");

        config = config.chain(fern::log_file(log_file)?);
    }

    config.apply()?;

    Ok(())
}
