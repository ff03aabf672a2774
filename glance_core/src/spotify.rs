// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Builds `top_albums.json` from the listener's long-term top tracks.
use crate::album::Album;
use crate::error::FetchError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const TOP_TRACKS_URL: &str =
    "https://api.spotify.com/v1/me/top/tracks?limit=50&time_range=long_term";
pub const ALBUM_URL_BASE: &str = "https://open.spotify.com/album/";
pub const TOP_ALBUM_COUNT: usize = 5;

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const REFRESH_TOKEN_VAR: &str = "SPOTIFY_REFRESH_TOKEN";

/// Secrets for the refresh-token grant. Only ever read from the environment.
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, FetchError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from any variable source. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FetchError> {
        let var = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(FetchError::MissingEnv(name))
        };
        Ok(Self {
            client_id: var(CLIENT_ID_VAR)?,
            client_secret: var(CLIENT_SECRET_VAR)?,
            refresh_token: var(REFRESH_TOKEN_VAR)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracks {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: TrackAlbum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Extracts the access token, keeping the whole body in the error otherwise.
pub fn parse_access_token(body: &str) -> Result<String, FetchError> {
    serde_json::from_str::<TokenResponse>(body)
        .ok()
        .and_then(|response| response.access_token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| FetchError::MissingAccessToken(body.to_owned()))
}

pub fn parse_top_tracks(body: &str) -> Result<Vec<Track>, FetchError> {
    Ok(serde_json::from_str::<TopTracks>(body)?.items)
}

/// Keeps the first track of each distinct primary artist, in ranking order,
/// until `limit` albums are collected.
pub fn select_top_albums(tracks: &[Track], limit: usize) -> Vec<Album> {
    let mut seen_artists = HashSet::new();
    let mut albums = Vec::with_capacity(limit);

    for track in tracks {
        if albums.len() == limit {
            break;
        }
        let Some(artist) = track.artists.first() else {
            log::debug!("Skipping track on {:?} with no artists", track.album.name);
            continue;
        };
        if !seen_artists.insert(artist.id.as_str()) {
            continue;
        }

        albums.push(Album {
            album: track.album.name.clone(),
            album_id: Some(track.album.id.clone()),
            artist: artist.name.clone(),
            artist_id: Some(artist.id.clone()),
            cover: track.album.images.first().map(|image| image.url.clone()),
            url: format!("{ALBUM_URL_BASE}{}", track.album.id),
        });
    }

    albums
}

pub struct SpotifyClient {
    http: reqwest::Client,
    token_url: String,
    top_tracks_url: String,
}

impl SpotifyClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, TOKEN_URL, TOP_TRACKS_URL)
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        token_url: impl Into<String>,
        top_tracks_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            top_tracks_url: top_tracks_url.into(),
        }
    }

    /// Exchanges the refresh token for a bearer token.
    pub async fn access_token(&self, credentials: &Credentials) -> Result<String, FetchError> {
        let body = self
            .http
            .post(&self.token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await?
            .text()
            .await?;
        parse_access_token(&body)
    }

    pub async fn top_tracks(&self, access_token: &str) -> Result<Vec<Track>, FetchError> {
        let response = self
            .http
            .get(&self.top_tracks_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.top_tracks_url.clone(),
                status: status.as_u16(),
            });
        }
        parse_top_tracks(&response.text().await?)
    }
}

/// Runs the whole exchange: token, top tracks, album selection. No retries.
pub async fn fetch_top_albums(credentials: &Credentials) -> Result<Vec<Album>, FetchError> {
    let client = SpotifyClient::new(reqwest::Client::new());
    let token = client.access_token(credentials).await?;
    let tracks = client.top_tracks(&token).await?;
    log::info!("Fetched {} top tracks", tracks.len());
    Ok(select_top_albums(&tracks, TOP_ALBUM_COUNT))
}

/// Writes `albums` as pretty JSON, creating parent directories as needed.
pub async fn write_albums(path: &Path, albums: &[Album]) -> Result<(), FetchError> {
    let write_error = |source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    let json = serde_json::to_string_pretty(albums)?;
    tokio::fs::write(path, json).await.map_err(write_error)?;
    log::info!("Top albums written to {path:?}");
    Ok(())
}
