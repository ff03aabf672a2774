// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::album::{Album, parse_albums};
use crate::book::{Book, fallback_books, parse_books};
use crate::error::DataError;
use std::path::{Component, Path, PathBuf};

pub const TOP_ALBUMS_FILE: &str = "top_albums.json";
pub const BOOKS_JSON_FILE: &str = "books.json";
pub const BOOKS_TSV_FILE: &str = "books_openlibrary.txt";

/// Maps a root-relative web path such as `/album_composites/1.webp` onto the
/// directory that serves it. Parent components are dropped so the result never
/// escapes `data_dir`.
pub fn resolve_web_path(data_dir: &Path, web_path: &str) -> PathBuf {
    let mut resolved = data_dir.to_path_buf();
    for component in Path::new(web_path.trim_start_matches('/')).components() {
        if let Component::Normal(part) = component {
            resolved.push(part);
        }
    }
    resolved
}

async fn read_text(path: &Path) -> Result<String, DataError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Asynchronously loads `top_albums.json` from the data directory.
pub async fn load_albums(data_dir: &Path) -> Result<Vec<Album>, DataError> {
    let text = read_text(&data_dir.join(TOP_ALBUMS_FILE)).await?;
    parse_albums(&text)
}

/// Asynchronously loads the book list.
///
/// The structured `books.json` wins over the legacy tab-separated export.
/// A missing, unreadable or empty list yields the hard-coded fallback books.
pub async fn load_books_or_fallback(data_dir: &Path) -> Vec<Book> {
    for file in [BOOKS_JSON_FILE, BOOKS_TSV_FILE] {
        let path = data_dir.join(file);
        if !path.exists() {
            continue;
        }
        match read_text(&path).await.and_then(|text| parse_books(&text)) {
            Ok(books) if !books.is_empty() => return books,
            Ok(_) => log::warn!("{path:?} contains no books"),
            Err(e) => log::warn!("Failed to load books from {path:?}: {e}"),
        }
    }

    log::info!("Using fallback books data");
    fallback_books()
}

/// Asynchronously loads the raw bytes of an image file.
pub async fn load_image_bytes(path: &Path) -> Result<Vec<u8>, DataError> {
    tokio::fs::read(path).await.map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_web_path() {
        let root = Path::new("public");
        assert_eq!(
            resolve_web_path(root, "/album_composites/1_on_record.webp"),
            PathBuf::from("public/album_composites/1_on_record.webp")
        );
        assert_eq!(
            resolve_web_path(root, "/../../etc/passwd"),
            PathBuf::from("public/etc/passwd")
        );
    }

    #[tokio::test]
    async fn test_load_albums() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(TOP_ALBUMS_FILE),
            r#"[{"album":"A","artist":"X","albumId":"1","cover":"/c.jpg","url":"http://x"}]"#,
        )
        .unwrap();

        let albums = load_albums(dir.path()).await.unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].url, "http://x");
    }

    #[tokio::test]
    async fn test_load_albums_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_albums(dir.path()).await,
            Err(DataError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_books_falls_back_when_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_books_or_fallback(dir.path()).await, fallback_books());
    }

    #[tokio::test]
    async fn test_load_books_prefers_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(BOOKS_JSON_FILE),
            r#"[{"title":"From JSON","author":"a","isbn":"1","cover":"/book_covers/1.jpg"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(BOOKS_TSV_FILE),
            "From TSV\tb\t2\t/book_covers/2.jpg\n",
        )
        .unwrap();

        let books = load_books_or_fallback(dir.path()).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "From JSON");
    }

    #[tokio::test]
    async fn test_load_books_invalid_json_falls_through_to_tsv() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(BOOKS_JSON_FILE), "[{").unwrap();
        std::fs::write(
            dir.path().join(BOOKS_TSV_FILE),
            "From TSV\tb\t2\t/book_covers/2.jpg\n",
        )
        .unwrap();

        let books = load_books_or_fallback(dir.path()).await;
        assert_eq!(books[0].title, "From TSV");
    }

    #[tokio::test]
    async fn test_load_books_empty_list_falls_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(BOOKS_TSV_FILE), "No cover\tb\t2\n").unwrap();
        assert_eq!(load_books_or_fallback(dir.path()).await, fallback_books());
    }
}
