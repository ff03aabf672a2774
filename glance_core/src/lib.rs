// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Core library of the Glance splash: the data model behind the album and book
//! galleries, the build-time asset pipeline, the fetch clients (Spotify, Open
//! Library, chess.com), and the window-agnostic state machines that drive the
//! splash interactions.
pub mod album;
pub mod book;
pub mod chess;
pub mod config;
pub mod error;
pub mod file_io;
pub mod openlibrary;
pub mod pipeline;
pub mod splash;
pub mod spotify;
pub mod types;
