// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::error::DataError;
use serde::{Deserialize, Serialize};

pub const COMPOSITE_DIR: &str = "/album_composites";
/// Shown on the turntable when no album list could be loaded.
pub const FALLBACK_RECORD: &str = "/record.webp";

/// One entry of `top_albums.json`.
///
/// Field names are camelCase on the wire so the file stays compatible with
/// what the front end already reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    pub url: String,
}

impl Album {
    /// The file stem shared by the cover file and the generated record composite.
    ///
    /// Prefers the album id, then the basename of the cover URL without its
    /// extension, then `unknown`.
    pub fn asset_stem(&self) -> &str {
        if let Some(id) = self.album_id.as_deref()
            && !id.is_empty()
        {
            return id;
        }

        self.cover
            .as_deref()
            .and_then(|cover| cover.rsplit('/').next())
            .and_then(|name| name.split('.').next())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("unknown")
    }

    /// Web path of the album cover composited onto the vinyl record.
    pub fn composite_image_path(&self) -> String {
        format!("{COMPOSITE_DIR}/{}_on_record.webp", self.asset_stem())
    }
}

/// Parses the contents of `top_albums.json`. Anything but an array of albums is an error.
pub fn parse_albums(json: &str) -> Result<Vec<Album>, DataError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(album_id: Option<&str>, cover: Option<&str>) -> Album {
        Album {
            album: "A".to_owned(),
            album_id: album_id.map(str::to_owned),
            artist: "X".to_owned(),
            artist_id: None,
            cover: cover.map(str::to_owned),
            url: "http://x".to_owned(),
        }
    }

    #[test]
    fn test_composite_path_prefers_album_id() {
        let album = album(Some("1"), Some("https://i.scdn.co/image/abc.jpg"));
        assert_eq!(
            album.composite_image_path(),
            "/album_composites/1_on_record.webp"
        );
    }

    #[test]
    fn test_composite_path_falls_back_to_cover_basename() {
        let album = album(None, Some("https://i.scdn.co/image/ab67616d.jpg"));
        assert_eq!(
            album.composite_image_path(),
            "/album_composites/ab67616d_on_record.webp"
        );

        let album_with_empty_id = Album {
            album_id: Some(String::new()),
            ..album
        };
        assert_eq!(album_with_empty_id.asset_stem(), "ab67616d");
    }

    #[test]
    fn test_composite_path_unknown_without_cover() {
        assert_eq!(album(None, None).asset_stem(), "unknown");
        assert_eq!(album(None, Some("https://x/")).asset_stem(), "unknown");
    }

    #[test]
    fn test_parse_albums_reads_front_end_format() {
        let json = r#"[{"album":"A","artist":"X","albumId":"1","cover":"/c.jpg","url":"http://x"}]"#;
        let albums = parse_albums(json).unwrap();
        assert_eq!(albums, vec![album(Some("1"), Some("/c.jpg"))]);
    }

    #[test]
    fn test_parse_albums_accepts_null_cover() {
        let json = r#"[{"album":"A","artist":"X","cover":null,"url":"http://x"}]"#;
        let albums = parse_albums(json).unwrap();
        assert_eq!(albums[0].cover, None);
        assert_eq!(albums[0].album_id, None);
    }

    #[test]
    fn test_parse_albums_rejects_missing_fields() {
        assert!(parse_albums(r#"[{"album":"A"}]"#).is_err());
        assert!(parse_albums(r#"{"album":"A"}"#).is_err());
    }

    #[test]
    fn test_serialise_uses_camel_case_keys() {
        let json = serde_json::to_string(&album(Some("1"), None)).unwrap();
        assert!(json.contains(r#""albumId":"1""#));
        assert!(json.contains(r#""cover":null"#));
        assert!(!json.contains("artistId"));
    }
}
