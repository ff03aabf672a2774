// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! A small scanner for `<img>` opening elements in HTML and JSX/TSX sources.
//!
//! It only understands enough of either language to find image tags and the
//! byte spans of their attributes, so callers can edit attributes in place and
//! leave every other byte of the file alone.
use std::ops::Range;

/// The language a source is written in, which decides what the scanner skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `<img>` in any case; attribute names are lowercased. Only `<!-- -->` is skipped.
    Html,
    /// JS/JSX/TS/TSX. `<img` is case-sensitive (`<Img>` is a component) and
    /// comments, string literals and template literals are skipped.
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// A quoted (or bare HTML) string. `span` includes the quotes.
    Literal {
        value: String,
        quote: Option<char>,
        span: Range<usize>,
    },
    /// A JSX `{...}` expression. `span` includes the braces.
    Expression { span: Range<usize> },
}

impl AttrValue {
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Literal { span, .. } | Self::Expression { span } => span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased for [`Dialect::Html`], as written for [`Dialect::Script`].
    pub name: String,
    pub value: Option<AttrValue>,
    /// From the first byte of the name to the last byte of the value.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImgTag {
    /// From `<` to the closing `>` inclusive.
    pub span: Range<usize>,
    pub attributes: Vec<Attribute>,
    /// Just past the last attribute (or the tag name): where new attributes go.
    pub insert_at: usize,
}

impl ImgTag {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Finds an attribute by any of the given spellings (`srcSet` / `srcset`).
    pub fn attribute_any(&self, names: &[&str]) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attr| names.contains(&attr.name.as_str()))
    }

    /// The string value of `name`, if it is a literal.
    pub fn literal(&self, name: &str) -> Option<&str> {
        match &self.attribute(name)?.value {
            Some(AttrValue::Literal { value, .. }) => Some(value),
            _ => None,
        }
    }
}

/// Returns every well-formed `<img ...>` opening element in `source`, in order.
/// Unterminated tags are ignored.
pub fn find_img_tags(source: &str, dialect: Dialect) -> Vec<ImgTag> {
    let bytes = source.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i..].starts_with(b"<!--") {
            i = skip_past(bytes, i + 4, b"-->");
            continue;
        }
        if dialect == Dialect::Script
            && let Some(end) = skip_script_literal(bytes, i)
        {
            i = end;
            continue;
        }
        if is_img_open(bytes, i, dialect)
            && let Some(tag) = parse_img_tag(source, i, dialect)
        {
            i = tag.span.end;
            tags.push(tag);
            continue;
        }
        i += 1;
    }

    tags
}

fn is_img_open(bytes: &[u8], at: usize, dialect: Dialect) -> bool {
    let Some(open) = bytes.get(at..at + 4) else {
        return false;
    };
    let name_matches = match dialect {
        Dialect::Html => open.eq_ignore_ascii_case(b"<img"),
        Dialect::Script => open == b"<img",
    };
    name_matches
        && bytes
            .get(at + 4)
            .is_some_and(|&b| b.is_ascii_whitespace() || b == b'/' || b == b'>')
}

/// Returns the index just past a comment or string literal starting at `at`.
///
/// A quote straight after a word character is JSX text (`It's`), and a `//`
/// after a colon is a URL, so neither starts a literal.
fn skip_script_literal(bytes: &[u8], at: usize) -> Option<usize> {
    match bytes[at] {
        b'/' => match *bytes.get(at + 1)? {
            b'*' => Some(skip_past(bytes, at + 2, b"*/")),
            b'/' if at == 0 || bytes[at - 1] != b':' => Some(skip_past(bytes, at + 2, b"\n")),
            _ => None,
        },
        b'\'' | b'"' if at > 0 && is_word_byte(bytes[at - 1]) => None,
        b'\'' | b'"' | b'`' => skip_string(bytes, at),
        _ => None,
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn skip_past(bytes: &[u8], from: usize, terminator: &[u8]) -> usize {
    bytes[from.min(bytes.len())..]
        .windows(terminator.len())
        .position(|window| window == terminator)
        .map_or(bytes.len(), |pos| from + pos + terminator.len())
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Returns the index just past the closing quote of a JS string starting at `open`.
/// Single- and double-quoted strings end at the line; templates may span lines.
fn skip_string(bytes: &[u8], open: usize) -> Option<usize> {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            b'\n' if quote != b'`' => return None,
            b'$' if quote == b'`' && bytes.get(i + 1) == Some(&b'{') => {
                i = skip_braces(bytes, i + 1)?;
            }
            _ => i += 1,
        }
    }
    None
}

/// Returns the index just past the brace matching the `{` at `open`.
fn skip_braces(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            b'"' | b'\'' | b'`' => {
                i = skip_string(bytes, i)?;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn parse_img_tag(source: &str, start: usize, dialect: Dialect) -> Option<ImgTag> {
    let bytes = source.as_bytes();
    let mut i = start + "<img".len();
    let mut insert_at = i;
    let mut attributes = Vec::new();

    loop {
        i = skip_whitespace(bytes, i);
        match *bytes.get(i)? {
            b'>' => {
                return Some(ImgTag {
                    span: start..i + 1,
                    attributes,
                    insert_at,
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(ImgTag {
                    span: start..i + 2,
                    attributes,
                    insert_at,
                });
            }
            // JSX spread: {...props}
            b'{' => {
                i = skip_braces(bytes, i)?;
                insert_at = i;
            }
            _ => {
                let name_start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'=' | b'>' | b'/' | b'{' | b'"' | b'\'')
                {
                    i += 1;
                }
                if i == name_start {
                    return None;
                }
                let mut name = source[name_start..i].to_owned();
                if dialect == Dialect::Html {
                    name.make_ascii_lowercase();
                }

                let after_name = skip_whitespace(bytes, i);
                if bytes.get(after_name) != Some(&b'=') {
                    attributes.push(Attribute {
                        name,
                        value: None,
                        span: name_start..i,
                    });
                    insert_at = i;
                    continue;
                }

                let value_start = skip_whitespace(bytes, after_name + 1);
                let (value, end) = parse_value(source, value_start)?;
                attributes.push(Attribute {
                    name,
                    value: Some(value),
                    span: name_start..end,
                });
                i = end;
                insert_at = end;
            }
        }
    }
}

fn parse_value(source: &str, start: usize) -> Option<(AttrValue, usize)> {
    let bytes = source.as_bytes();
    match *bytes.get(start)? {
        quote @ (b'"' | b'\'') => {
            let close = start + 1 + bytes[start + 1..].iter().position(|&b| b == quote)?;
            let value = AttrValue::Literal {
                value: source[start + 1..close].to_owned(),
                quote: Some(quote as char),
                span: start..close + 1,
            };
            Some((value, close + 1))
        }
        b'{' => {
            let end = skip_braces(bytes, start)?;
            Some((AttrValue::Expression { span: start..end }, end))
        }
        _ => {
            let mut end = start;
            while end < bytes.len() && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>' {
                end += 1;
            }
            let value = AttrValue::Literal {
                value: source[start..end].to_owned(),
                quote: None,
                span: start..end,
            };
            Some((value, end))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_jsx_img_with_literal_and_expression() {
        let source = r#"<div><img src="/a.png" alt={name} className="x" /></div>"#;
        let tags = find_img_tags(source, Dialect::Script);
        assert_eq!(tags.len(), 1);

        let tag = &tags[0];
        assert_eq!(&source[tag.span.clone()], r#"<img src="/a.png" alt={name} className="x" />"#);
        assert_eq!(tag.literal("src"), Some("/a.png"));
        assert!(matches!(
            tag.attribute("alt").and_then(|a| a.value.as_ref()),
            Some(AttrValue::Expression { .. })
        ));
        assert_eq!(&source[tag.insert_at - 3..tag.insert_at], r#""x""#);
    }

    #[test]
    fn test_finds_html_img_variants() {
        let source = "<p>It's a photo</p>\n<img data-src='b.jpg'>\n<IMG src=c.png>\n<img SRC=d.webp alt=\"d\">";
        let tags = find_img_tags(source, Dialect::Html);
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].literal("data-src"), Some("b.jpg"));
        assert_eq!(tags[1].literal("src"), Some("c.png"));
        assert_eq!(tags[2].literal("src"), Some("d.webp"));
    }

    #[test]
    fn test_script_img_is_case_sensitive() {
        let source = r#"<Img src="/a.png" /><IMG src="/b.png" /><img src="/c.png" />"#;
        let tags = find_img_tags(source, Dialect::Script);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].literal("src"), Some("/c.png"));
    }

    #[test]
    fn test_script_skips_strings_templates_and_comments() {
        let source = concat!(
            "const html = '<img src=\"/a.png\">';\n",
            "// <img src=\"/b.png\" />\n",
            "const tpl = `\n  <img src=\"/c.png\">\n  ${`<img src=\"/d.png\">`}\n`;\n",
            "const dq = \"<img src='/e.png'>\";\n",
            "/* <img src=\"/f.png\"> */\n",
            "export const Photo = () => <p>It's here: <img src=\"/g.png\" /></p>;\n",
        );
        let tags = find_img_tags(source, Dialect::Script);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].literal("src"), Some("/g.png"));
    }

    #[test]
    fn test_script_text_quotes_and_urls_do_not_hide_tags() {
        let source = concat!(
            "<p>'Tis the dogs' <img src=\"/a.png\" /></p>\n",
            "<a>https://example.com <img src=\"/b.png\" /></a>\n",
            "<p>\"Quoted\" <img src=\"/c.png\" /></p>\n",
        );
        let sources: Vec<_> = find_img_tags(source, Dialect::Script)
            .iter()
            .filter_map(|tag| tag.literal("src").map(str::to_owned))
            .collect();
        assert_eq!(sources, ["/a.png", "/b.png", "/c.png"]);
    }

    #[test]
    fn test_html_text_quotes_are_plain_text() {
        let source = "<p>\"Don't\" she said, '</p><img src=\"a.png\"><p>'</p>";
        let tags = find_img_tags(source, Dialect::Html);
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_multiline_tag_and_spread() {
        let source = "<img\n  {...props}\n  src=\"/x.jpg\"\n  style={{ width: '100%', transform: `rotate(${a}deg)` }}\n/>";
        let tags = find_img_tags(source, Dialect::Script);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].literal("src"), Some("/x.jpg"));
        assert_eq!(tags[0].attributes.len(), 2);
        assert_eq!(tags[0].span, 0..source.len());
    }

    #[test]
    fn test_ignores_comments_and_lookalikes() {
        let source = "<!-- <img src=\"a.png\"> -->{/* <img src=\"b.png\" /> */}<imgur-widget /><image href=\"c.png\" />";
        assert!(find_img_tags(source, Dialect::Script).is_empty());
        assert_eq!(find_img_tags("<!-- <IMG src=a.png> --><image>", Dialect::Html).len(), 0);
    }

    #[test]
    fn test_unterminated_tag_is_skipped() {
        assert!(find_img_tags("<img src=\"a.png\"", Dialect::Html).is_empty());
        assert!(find_img_tags("<img src={a", Dialect::Script).is_empty());
    }

    #[test]
    fn test_boolean_attribute() {
        let tags = find_img_tags("<img hidden src=\"a.png\">", Dialect::Html);
        assert_eq!(tags[0].attributes[0].name, "hidden");
        assert_eq!(tags[0].attributes[0].value, None);
        assert_eq!(tags[0].literal("src"), Some("a.png"));
    }

    #[test]
    fn test_non_ascii_text_around_tags() {
        let source = "<p>García Márquez 📚</p><img src=\"é.png\" />";
        let tags = find_img_tags(source, Dialect::Script);
        assert_eq!(tags[0].literal("src"), Some("é.png"));
    }

    #[test]
    fn test_attribute_any() {
        let tags = find_img_tags("<img srcset=\"a 1w\">", Dialect::Script);
        assert!(tags[0].attribute_any(&["srcSet", "srcset"]).is_some());
        assert!(tags[0].attribute("srcSet").is_none());
    }
}
