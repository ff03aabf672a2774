// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! What the album turntable and the book stack show for the current carousel item.
use crate::album::{Album, FALLBACK_RECORD};
use crate::book::Book;
use crate::splash::carousel::Carousel;

pub const RECORD_FALLBACK_ALT: &str = "Record";
/// Title and author are squeezed into this width under the book cover.
pub const BOOK_TEXT_MAX_WIDTH: f32 = 110.0;
pub const BOOK_TITLE_FONT_SIZE: f32 = 16.0;
pub const BOOK_AUTHOR_FONT_SIZE: f32 = 15.0;
pub const MIN_FONT_SIZE: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub image: String,
    pub alt: String,
    pub link: Option<String>,
}

/// The current album on the record, or a blank record with no link.
pub fn record_view(albums: &Carousel<Album>) -> RecordView {
    match albums.current() {
        Some(album) => RecordView {
            image: album.composite_image_path(),
            alt: album.album.clone(),
            link: Some(album.url.clone()),
        },
        None => RecordView {
            image: FALLBACK_RECORD.to_owned(),
            alt: RECORD_FALLBACK_ALT.to_owned(),
            link: None,
        },
    }
}

pub fn album_preload_paths(albums: &Carousel<Album>) -> Vec<String> {
    albums.preload_paths(|album| Some(album.composite_image_path()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookView {
    pub title: String,
    pub author: String,
    pub cover: String,
    pub background: Option<String>,
    pub link: Option<String>,
}

/// `None` when there is nothing to show; the book stack is then not drawn.
pub fn book_view(books: &Carousel<Book>) -> Option<BookView> {
    books.current().map(|book| BookView {
        title: book.title.clone(),
        author: book.author.clone(),
        cover: book.cover.clone(),
        background: book.background_path(),
        link: book.url.clone(),
    })
}

pub fn book_preload_paths(books: &Carousel<Book>) -> Vec<String> {
    books.preload_paths(|book| (!book.cover.is_empty()).then(|| book.cover.clone()))
}

/// Shrinks the font one point at a time until `text` fits in `max_width`,
/// stopping at [`MIN_FONT_SIZE`]. `measure` returns the rendered width of the
/// text at a given size.
pub fn fit_font_size(
    text: &str,
    max_width: f32,
    base_size: f32,
    measure: impl Fn(&str, f32) -> f32,
) -> f32 {
    let mut size = base_size;
    while measure(text, size) > max_width && size > MIN_FONT_SIZE {
        size -= 1.0;
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::parse_albums;
    use crate::book::fallback_books;

    #[test]
    fn test_record_view_uses_album_title_and_url() {
        let albums = parse_albums(
            r#"[{"album":"A","artist":"X","albumId":"1","cover":"/c.jpg","url":"http://x"}]"#,
        )
        .unwrap();
        let view = record_view(&Carousel::new(albums));
        assert_eq!(
            view,
            RecordView {
                image: "/album_composites/1_on_record.webp".to_owned(),
                alt: "A".to_owned(),
                link: Some("http://x".to_owned()),
            }
        );
    }

    #[test]
    fn test_record_view_falls_back_when_empty() {
        let view = record_view(&Carousel::default());
        assert_eq!(view.image, "/record.webp");
        assert_eq!(view.alt, "Record");
        assert_eq!(view.link, None);
        assert!(album_preload_paths(&Carousel::default()).is_empty());
    }

    #[test]
    fn test_book_view_and_preload() {
        let books = Carousel::new(fallback_books());
        let view = book_view(&books).unwrap();
        assert_eq!(view.title, "House of Leaves");
        assert_eq!(
            view.background.as_deref(),
            Some("/book_bgs/House_of_Leaves_bg.webp")
        );
        assert_eq!(book_preload_paths(&books).len(), 4);
        assert_eq!(book_view(&Carousel::default()), None);
    }

    #[test]
    fn test_fit_font_size() {
        // Roughly half an em per character.
        let measure = |text: &str, size: f32| text.chars().count() as f32 * size * 0.5;

        assert_eq!(fit_font_size("Dune", BOOK_TEXT_MAX_WIDTH, 16.0, measure), 16.0);
        // 20 chars fit at 11pt (110px).
        assert_eq!(
            fit_font_size("abcdefghijklmnopqrst", BOOK_TEXT_MAX_WIDTH, 16.0, measure),
            11.0
        );
        assert_eq!(
            fit_font_size(&"x".repeat(200), BOOK_TEXT_MAX_WIDTH, 16.0, measure),
            MIN_FONT_SIZE
        );
    }
}
