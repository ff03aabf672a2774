// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Window-agnostic state behind the splash screen. Everything here is driven
//! by an `Instant` the caller passes in, so it runs the same under a real
//! frame loop and in tests.
pub mod bag;
pub mod carousel;
pub mod gallery;
pub mod layout;
pub mod popup;
pub mod shake;
pub mod spin;
pub mod timer;
pub mod title;
