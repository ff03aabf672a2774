// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Build-time tasks for the splash site: image variants, markup rewriting,
//! the top-albums fetch, record composites, the book list fetch, book
//! backdrops and the book list check.
use clap::{Parser, Subcommand};
use glance_core::album::parse_albums;
use glance_core::book::{books_to_json, parse_books, parse_books_tsv_strict};
use glance_core::config::{DEFAULT_CONFIG_FILE, GlanceConfig};
use glance_core::file_io::{BOOKS_TSV_FILE, TOP_ALBUMS_FILE};
use glance_core::openlibrary::{
    DEFAULT_EXPORT_FILE, OpenLibraryClient, REQUEST_DELAY, fetch_books, parse_export,
    write_book_rows,
};
use glance_core::pipeline::book_bg::{BACKGROUND_SIZE, generate_book_backgrounds};
use glance_core::pipeline::composite::composite_albums;
use glance_core::pipeline::resize::optimize_images;
use glance_core::pipeline::rewrite::rewrite_images;
use glance_core::spotify::{Credentials, fetch_top_albums, write_albums};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "glance", version, about = "Asset and data tasks for the Glance splash")]
struct Cli {
    /// Path to the config TOML file. Defaults apply when it does not exist.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write 400/800/1200px variants of every image the sources reference
    Optimize {
        /// Regenerate variants that are already up to date
        #[arg(short, long)]
        force: bool,
        #[arg(long)]
        input_dir: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Point <img> tags at the generated variants and add srcSet/sizes
    Rewrite {
        #[arg(long)]
        input_dir: Option<PathBuf>,
    },
    /// Fetch the top five albums from Spotify (needs SPOTIFY_* variables)
    FetchAlbums {
        /// Defaults to top_albums.json in the data directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Place each album cover on the vinyl record image
    Composite {
        #[arg(long)]
        albums: Option<PathBuf>,
        #[arg(long)]
        record: Option<PathBuf>,
        #[arg(long)]
        covers: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Look up an exported reading list on Open Library and download the covers
    FetchBooks {
        /// Tab-separated `title, author, isbn` lines
        #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
        input: PathBuf,
        /// Defaults to books_openlibrary.txt in the data directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        covers: Option<PathBuf>,
    },
    /// Render a tinted backdrop for every downloaded book cover
    BookBackgrounds {
        #[arg(long)]
        covers: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = BACKGROUND_SIZE.0)]
        width: u32,
        #[arg(long, default_value_t = BACKGROUND_SIZE.1)]
        height: u32,
    },
    /// Validate the book list and optionally convert it to JSON
    CheckBooks {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Also require an Open Library link on every row
        #[arg(long)]
        strict: bool,
        /// Write the parsed list as JSON here
        #[arg(long)]
        json_output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    log::debug!("Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult {
    let mut config = GlanceConfig::load_or_default(&cli.config)?;
    let data_dir = config.splash.data_dir.clone();
    let in_data_dir = |override_path: Option<PathBuf>, name: &str| {
        override_path.unwrap_or_else(|| data_dir.join(name))
    };

    match cli.command {
        Command::Optimize {
            force,
            input_dir,
            output_dir,
        } => {
            config.pipeline.force |= force;
            if let Some(dir) = input_dir {
                config.pipeline.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.pipeline.output_dir = dir;
            }
            let report = optimize_images(&config.pipeline).await?;
            if report.failed > 0 {
                log::warn!("{} variant(s) could not be written", report.failed);
            }
        }
        Command::Rewrite { input_dir } => {
            if let Some(dir) = input_dir {
                config.pipeline.input_dir = dir;
            }
            rewrite_images(&config.pipeline).await?;
        }
        Command::FetchAlbums { output } => {
            let output = in_data_dir(output, TOP_ALBUMS_FILE);
            let credentials = Credentials::from_env()?;
            let albums = fetch_top_albums(&credentials).await?;
            write_albums(&output, &albums).await?;
        }
        Command::Composite {
            albums,
            record,
            covers,
            output,
        } => {
            let albums_path = in_data_dir(albums, TOP_ALBUMS_FILE);
            let record = in_data_dir(record, "record.webp");
            let covers = in_data_dir(covers, "album_covers");
            let output = in_data_dir(output, "album_composites");

            let albums = parse_albums(&read_text(&albums_path).await?)?;
            let report = tokio::task::spawn_blocking(move || {
                composite_albums(&albums, &record, &covers, &output)
            })
            .await??;
            log::info!(
                "Composited {} album(s), {} missing cover(s), {} failed",
                report.written,
                report.missing,
                report.failed
            );
        }
        Command::FetchBooks {
            input,
            output,
            covers,
        } => {
            let output = in_data_dir(output, BOOKS_TSV_FILE);
            let covers = in_data_dir(covers, "book_covers");
            let rows = parse_export(&read_text(&input).await?)?;
            log::info!("{} book(s) in {input:?}", rows.len());

            let client = OpenLibraryClient::default();
            let books = fetch_books(&client, &rows, &covers, REQUEST_DELAY).await?;
            write_book_rows(&output, &books).await?;
        }
        Command::BookBackgrounds {
            covers,
            output,
            width,
            height,
        } => {
            let covers = in_data_dir(covers, "book_covers");
            let output = in_data_dir(output, "book_bgs");
            let report = tokio::task::spawn_blocking(move || {
                generate_book_backgrounds(&covers, &output, (width, height))
            })
            .await??;
            log::info!(
                "Wrote {} book background(s), {} failed",
                report.written,
                report.failed
            );
        }
        Command::CheckBooks {
            input,
            strict,
            json_output,
        } => {
            let input = in_data_dir(input, BOOKS_TSV_FILE);
            let text = read_text(&input).await?;
            let books = if strict {
                parse_books_tsv_strict(&text)?
            } else {
                parse_books(&text)?
            };
            log::info!("{} book(s) with covers in {input:?}", books.len());

            if let Some(path) = json_output {
                tokio::fs::write(&path, books_to_json(&books)?).await?;
                log::info!("Wrote {path:?}");
            }
        }
    }

    Ok(())
}

async fn read_text(path: &Path) -> Result<String, std::io::Error> {
    tokio::fs::read_to_string(path).await.inspect_err(|e| {
        log::error!("Failed to read {path:?}: {e}");
    })
}
