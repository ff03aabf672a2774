// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::error::DataError;
use serde::{Deserialize, Serialize};

const COVERS_PREFIX: &str = "/book_covers/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Book {
    fn fallback(title: &str, author: &str, id: &str) -> Self {
        Self {
            title: title.to_owned(),
            author: author.to_owned(),
            isbn: id.to_owned(),
            cover: format!("{COVERS_PREFIX}{id}.jpg"),
            url: None,
        }
    }

    /// Maps `/book_covers/ID.jpg` to its blurred backdrop `/book_bgs/ID_bg.webp`.
    pub fn background_path(&self) -> Option<String> {
        let start = self.cover.find(COVERS_PREFIX)? + COVERS_PREFIX.len();
        let id = self.cover[start..].strip_suffix(".jpg")?;
        (!id.is_empty()).then(|| format!("/book_bgs/{id}_bg.webp"))
    }
}

/// Shown whenever the book list cannot be loaded.
pub fn fallback_books() -> Vec<Book> {
    vec![
        Book::fallback("House of Leaves", "Mark Z. Danielewski", "House_of_Leaves"),
        Book::fallback("Infinite Jest", "David Foster Wallace", "Infinite_Jest"),
        Book::fallback(
            "One Hundred Years of Solitude",
            "Gabriel García Márquez",
            "One_Hundred_Years_of_Solitude",
        ),
        Book::fallback(
            "If on a Winter's Night a Traveler",
            "Italo Calvino",
            "If_on_a_Winters_Night_a_Traveler",
        ),
    ]
}

/// A raw row of the tab-separated export. Trailing fields that are absent on
/// the line are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookRow {
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub cover: Option<String>,
    pub url: Option<String>,
}

impl BookRow {
    /// One `title\tauthor\tisbn\tcover\turl` line with missing fields left empty.
    /// Tabs and newlines inside fields become spaces.
    pub fn to_tsv_line(&self) -> String {
        let clean = |field: &str| field.replace(['\t', '\n', '\r'], " ");
        let optional = |field: &Option<String>| clean(field.as_deref().unwrap_or_default());
        format!(
            "{}\t{}\t{}\t{}\t{}",
            clean(&self.title),
            optional(&self.author),
            optional(&self.isbn),
            optional(&self.cover),
            optional(&self.url),
        )
    }

    fn into_book(self) -> Option<Book> {
        let cover = self.cover.filter(|cover| !cover.is_empty())?;
        Some(Book {
            title: self.title,
            author: self.author.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
            cover,
            url: self.url.filter(|url| !url.is_empty()),
        })
    }
}

/// Reads every non-blank line of `title\tauthor\tisbn\tcover\turl` rows.
pub fn parse_book_rows(text: &str) -> Result<Vec<BookRow>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let field = |i: usize| record.get(i).map(str::to_owned);
        let row = BookRow {
            title: field(0).unwrap_or_default(),
            author: field(1),
            isbn: field(2),
            cover: field(3),
            url: field(4),
        };
        if row.title.is_empty() && row.author.is_none() {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Parses the tab-separated book list, keeping only rows that have a cover.
pub fn parse_books_tsv(text: &str) -> Result<Vec<Book>, DataError> {
    Ok(parse_book_rows(text)?
        .into_iter()
        .filter_map(BookRow::into_book)
        .collect())
}

/// Like [`parse_books_tsv`] but also drops rows without an Open Library link.
pub fn parse_books_tsv_strict(text: &str) -> Result<Vec<Book>, DataError> {
    Ok(parse_books_tsv(text)?
        .into_iter()
        .filter(|book| book.url.is_some())
        .collect())
}

/// Parses the structured book list. Every record must carry all required fields.
pub fn parse_books_json(text: &str) -> Result<Vec<Book>, DataError> {
    Ok(serde_json::from_str(text)?)
}

/// Serialises books into the structured format read by [`parse_books_json`].
pub fn books_to_json(books: &[Book]) -> Result<String, DataError> {
    Ok(serde_json::to_string_pretty(books)?)
}

/// Picks the parser from the content: a JSON array or the legacy TSV export.
pub fn parse_books(text: &str) -> Result<Vec<Book>, DataError> {
    if text.trim_start().starts_with('[') {
        parse_books_json(text)
    } else {
        parse_books_tsv(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tsv_full_row() {
        let text = "Dune\tFrank Herbert\t9780441013593\t/book_covers/9780441013593.jpg\thttps://openlibrary.org/works/OL1W\n";
        let books = parse_books_tsv(text).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(
            books[0].url.as_deref(),
            Some("https://openlibrary.org/works/OL1W")
        );
    }

    #[test]
    fn test_parse_tsv_missing_trailing_field_is_none() {
        let rows = parse_book_rows("Dune\tFrank Herbert\t123\t/book_covers/123.jpg").unwrap();
        assert_eq!(rows[0].cover.as_deref(), Some("/book_covers/123.jpg"));
        assert_eq!(rows[0].url, None);

        let rows = parse_book_rows("Dune\tFrank Herbert").unwrap();
        assert_eq!(rows[0].isbn, None);
        assert_eq!(rows[0].cover, None);
    }

    #[test]
    fn test_parse_tsv_filters_exactly_rows_without_cover() {
        let text = "\
A\tAuthor A\t1\t/book_covers/1.jpg\thttps://ol/1
B\tAuthor B\t2\t\thttps://ol/2

C\tAuthor C\t3
D\tAuthor D\t4\thttps://covers.openlibrary.org/b/id/4-L.jpg
";
        let titles: Vec<String> = parse_books_tsv(text)
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, vec!["A", "D"]);
    }

    #[test]
    fn test_parse_tsv_strict_requires_url() {
        let text = "A\ta\t1\t/book_covers/1.jpg\thttps://ol/1\nB\tb\t2\t/book_covers/2.jpg\n";
        let books = parse_books_tsv_strict(text).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "A");
    }

    #[test]
    fn test_tsv_line_reads_back() {
        let row = BookRow {
            title: "Tab\tin title".to_owned(),
            author: Some("Author".to_owned()),
            isbn: None,
            cover: Some("/book_covers/OL1W.jpg".to_owned()),
            url: Some("https://openlibrary.org/works/OL1W".to_owned()),
        };
        let line = row.to_tsv_line();
        assert_eq!(
            line,
            "Tab in title\tAuthor\t\t/book_covers/OL1W.jpg\thttps://openlibrary.org/works/OL1W"
        );

        let books = parse_books_tsv(&line).unwrap();
        assert_eq!(books[0].title, "Tab in title");
        assert_eq!(books[0].isbn, "");
        assert_eq!(books[0].url.as_deref(), Some("https://openlibrary.org/works/OL1W"));
    }

    #[test]
    fn test_parse_tsv_keeps_quotes_in_titles() {
        let text = "The \"Great\" Gatsby\tF. Scott Fitzgerald\t1\t/book_covers/1.jpg\n";
        let books = parse_books_tsv(text).unwrap();
        assert_eq!(books[0].title, "The \"Great\" Gatsby");
    }

    #[test]
    fn test_parse_json_requires_fields() {
        let ok = r#"[{"title":"A","author":"a","isbn":"1","cover":"/book_covers/1.jpg"}]"#;
        assert_eq!(parse_books_json(ok).unwrap().len(), 1);

        let missing_cover = r#"[{"title":"A","author":"a","isbn":"1"}]"#;
        assert!(parse_books_json(missing_cover).is_err());
    }

    #[test]
    fn test_parse_books_detects_format() {
        let json = r#"[{"title":"A","author":"a","isbn":"1","cover":"/c.jpg"}]"#;
        assert_eq!(parse_books(json).unwrap()[0].title, "A");
        assert_eq!(parse_books("B\tb\t2\t/c.jpg").unwrap()[0].title, "B");
    }

    #[test]
    fn test_background_path() {
        let mut book = fallback_books().remove(0);
        assert_eq!(
            book.background_path().as_deref(),
            Some("/book_bgs/House_of_Leaves_bg.webp")
        );

        book.cover = "https://covers.openlibrary.org/b/id/1-L.jpg".to_owned();
        assert_eq!(book.background_path(), None);

        book.cover = "/book_covers/x.png".to_owned();
        assert_eq!(book.background_path(), None);
    }

    #[test]
    fn test_fallback_books() {
        let books = fallback_books();
        assert_eq!(books.len(), 4);
        assert!(books.iter().all(|book| book.cover.starts_with("/book_covers/")));
    }

    #[test]
    fn test_converted_tsv_reads_back_as_json() {
        let books = parse_books_tsv("A\ta\t1\t/book_covers/1.jpg\n").unwrap();
        let json = books_to_json(&books).unwrap();
        assert!(!json.contains("\"url\""));
        assert_eq!(parse_books(&json).unwrap(), books);
    }
}
