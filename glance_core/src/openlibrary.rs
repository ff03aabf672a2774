// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Builds `books_openlibrary.txt` from a reading-list export: each book is
//! looked up by ISBN, then by title, and its cover is downloaded next to the
//! other static files.
use crate::book::{BookRow, parse_book_rows};
use crate::error::{DataError, FetchError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const BOOKS_API_URL: &str = "https://openlibrary.org/api/books";
pub const SEARCH_URL: &str = "https://openlibrary.org/search.json";
pub const COVERS_URL_BASE: &str = "https://covers.openlibrary.org/b/id/";
pub const SITE_URL: &str = "https://openlibrary.org";
pub const DEFAULT_EXPORT_FILE: &str = "books_from_export.txt";
/// Web path the downloaded covers are served from.
pub const COVERS_WEB_DIR: &str = "/book_covers/";
/// Pause between books, to stay polite with the public API.
pub const REQUEST_DELAY: Duration = Duration::from_secs(1);

/// A line of the export: `title\tauthor\tisbn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub title: String,
    pub author: String,
    /// Empty when the export has none.
    pub isbn: String,
}

/// Strips the spreadsheet wrapping (`="9780..."`) some exports put around ISBNs.
pub fn clean_isbn(raw: &str) -> String {
    raw.replace(['=', '"'], "").trim().to_owned()
}

/// Reads the export. Lines with fewer than three fields are skipped with a warning.
pub fn parse_export(text: &str) -> Result<Vec<ExportRow>, DataError> {
    Ok(parse_book_rows(text)?
        .into_iter()
        .filter_map(|row| match (row.author, row.isbn) {
            (Some(author), Some(isbn)) => Some(ExportRow {
                title: row.title,
                author,
                isbn: clean_isbn(&isbn),
            }),
            _ => {
                log::warn!("Skipping malformed line: {:?}", row.title);
                None
            }
        })
        .collect())
}

/// What one lookup found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lookup {
    /// Where to download the cover from.
    pub cover_url: Option<String>,
    /// Local file name for the cover, e.g. `9780441013593.jpg`.
    pub cover_file: Option<String>,
    pub page_url: Option<String>,
}

#[derive(Deserialize)]
struct EditionData {
    url: Option<String>,
    key: Option<String>,
    #[serde(default)]
    cover: CoverUrls,
}

#[derive(Deserialize, Default)]
struct CoverUrls {
    small: Option<String>,
    medium: Option<String>,
    large: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Deserialize)]
struct SearchDoc {
    cover_i: Option<u64>,
    key: Option<String>,
}

/// Extension of the last path segment of `url`, query ignored. `.jpg` when there is none.
fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    segment
        .rfind('.')
        .map_or_else(|| ".jpg".to_owned(), |dot| segment[dot..].to_owned())
}

/// Reads a `jscmd=data` response. `None` when Open Library does not know the ISBN.
pub fn parse_isbn_response(body: &str, isbn: &str) -> Result<Option<Lookup>, FetchError> {
    let mut editions: HashMap<String, EditionData> = serde_json::from_str(body)?;
    let Some(edition) = editions.remove(&format!("ISBN:{isbn}")) else {
        return Ok(None);
    };

    let cover = edition.cover;
    let cover_url = cover.large.or(cover.medium).or(cover.small);
    let cover_file = cover_url
        .as_deref()
        .map(|url| format!("{isbn}{}", url_extension(url)));
    let page_url = edition.url.unwrap_or_else(|| {
        format!("{SITE_URL}{}", edition.key.as_deref().unwrap_or_default())
    });

    Ok(Some(Lookup {
        cover_url,
        cover_file,
        page_url: Some(page_url),
    }))
}

/// Reads a title search and takes the first match. The cover is named after
/// the ISBN if there is one, otherwise after the work id.
pub fn parse_search_response(body: &str, isbn: &str) -> Result<Option<Lookup>, FetchError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let Some(doc) = response.docs.into_iter().next() else {
        return Ok(None);
    };

    let cover_url = doc
        .cover_i
        .map(|cover_id| format!("{COVERS_URL_BASE}{cover_id}-L.jpg"));
    let file_stem = if isbn.is_empty() {
        doc.key
            .as_deref()
            .map(|key| key.trim_start_matches("/works/").to_owned())
    } else {
        Some(isbn.to_owned())
    };
    let cover_file = cover_url
        .as_ref()
        .and(file_stem)
        .map(|stem| format!("{stem}.jpg"));

    Ok(Some(Lookup {
        cover_url,
        cover_file,
        page_url: doc.key.map(|key| format!("{SITE_URL}{key}")),
    }))
}

/// The output row for `row` given whatever the lookups found.
pub fn book_row(row: &ExportRow, lookup: Option<&Lookup>) -> BookRow {
    let cover = lookup
        .and_then(|lookup| lookup.cover_file.as_deref())
        .map(|file| format!("{COVERS_WEB_DIR}{file}"));
    BookRow {
        title: row.title.clone(),
        author: Some(row.author.clone()),
        isbn: Some(row.isbn.clone()),
        cover: Some(cover.unwrap_or_default()),
        url: Some(
            lookup
                .and_then(|lookup| lookup.page_url.clone())
                .unwrap_or_default(),
        ),
    }
}

pub struct OpenLibraryClient {
    http: reqwest::Client,
    books_api_url: String,
    search_url: String,
}

impl Default for OpenLibraryClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl OpenLibraryClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, BOOKS_API_URL, SEARCH_URL)
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        books_api_url: impl Into<String>,
        search_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            books_api_url: books_api_url.into(),
            search_url: search_url.into(),
        }
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    pub async fn lookup_isbn(&self, isbn: &str) -> Result<Option<Lookup>, FetchError> {
        let bibkey = format!("ISBN:{isbn}");
        let body = self
            .get_text(
                &self.books_api_url,
                &[("bibkeys", bibkey.as_str()), ("format", "json"), ("jscmd", "data")],
            )
            .await?;
        parse_isbn_response(&body, isbn)
    }

    pub async fn search_title(&self, title: &str, isbn: &str) -> Result<Option<Lookup>, FetchError> {
        let body = self.get_text(&self.search_url, &[("title", title)]).await?;
        parse_search_response(&body, isbn)
    }

    /// ISBN first; the title search runs when there is no ISBN, the ISBN is
    /// unknown or the lookup failed. Failures are logged, never returned.
    pub async fn resolve(&self, row: &ExportRow) -> Option<Lookup> {
        if !row.isbn.is_empty() {
            log::info!("Trying ISBN lookup: {}", row.isbn);
            match self.lookup_isbn(&row.isbn).await {
                Ok(Some(lookup)) => return Some(lookup),
                Ok(None) => {}
                Err(e) => log::warn!("Error fetching ISBN {}: {e}", row.isbn),
            }
        }

        log::info!("Falling back to title search for: {}", row.title);
        self.search_title(&row.title, &row.isbn)
            .await
            .inspect_err(|e| log::warn!("Error in title search for {}: {e}", row.title))
            .ok()
            .flatten()
    }

    /// Saves the cover unless `path` already exists. A non-success status is
    /// logged and leaves nothing on disk.
    pub async fn download_cover(&self, url: &str, path: &Path) -> Result<(), FetchError> {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            log::debug!("Cover {path:?} already downloaded");
            return Ok(());
        }
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            log::warn!("{url} returned status {}", response.status());
            return Ok(());
        }
        let bytes = response.bytes().await?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|source| FetchError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Resolves every export row in order, downloading covers into `covers_dir`
/// and pausing `delay` between books.
pub async fn fetch_books(
    client: &OpenLibraryClient,
    rows: &[ExportRow],
    covers_dir: &Path,
    delay: Duration,
) -> Result<Vec<BookRow>, FetchError> {
    tokio::fs::create_dir_all(covers_dir)
        .await
        .map_err(|source| FetchError::Write {
            path: covers_dir.to_path_buf(),
            source,
        })?;

    let mut books = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }
        let lookup = client.resolve(row).await;
        if let Some(Lookup {
            cover_url: Some(url),
            cover_file: Some(file),
            ..
        }) = &lookup
            && let Err(e) = client.download_cover(url, &covers_dir.join(file)).await
        {
            log::warn!("Failed to download cover for {}: {e}", row.title);
        }
        books.push(book_row(row, lookup.as_ref()));
    }
    Ok(books)
}

/// Writes one line per book, creating parent directories as needed.
pub async fn write_book_rows(path: &Path, rows: &[BookRow]) -> Result<(), FetchError> {
    let write_error = |source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    let mut text: String = rows
        .iter()
        .map(BookRow::to_tsv_line)
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    tokio::fs::write(path, text).await.map_err(write_error)?;
    log::info!("Wrote {} books to {path:?}", rows.len());
    Ok(())
}
