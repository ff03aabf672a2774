// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Build-time asset pipeline: discover referenced images, write resized
//! variants, point the markup at them, composite album covers and build the
//! book backdrops.
pub mod book_bg;
pub mod composite;
pub mod discover;
pub mod markup;
pub mod resize;
pub mod rewrite;
pub mod variant;

use crate::error::PipelineError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantOutcome {
    Resized,
    /// The source was not wider than the target and was copied as is.
    Copied,
    /// The variant is newer than its source.
    Skipped,
}

/// Per-run counters for the resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineReport {
    pub discovered: usize,
    pub resized: usize,
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PipelineReport {
    pub fn record(&mut self, outcome: &Result<VariantOutcome, PipelineError>) {
        match outcome {
            Ok(VariantOutcome::Resized) => self.resized += 1,
            Ok(VariantOutcome::Copied) => self.copied += 1,
            Ok(VariantOutcome::Skipped) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images: {} resized, {} copied, {} up to date, {} failed",
            self.discovered, self.resized, self.copied, self.skipped, self.failed
        )
    }
}
