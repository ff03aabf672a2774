// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::error::FetchError;
use serde::Deserialize;

pub const STATS_URL_BASE: &str = "https://api.chess.com/pub/player";
/// The public API rejects requests without a user agent.
const USER_AGENT: &str = concat!("glance/", env!("CARGO_PKG_VERSION"));

/// Latest ratings per time control, shown in the Chess bag item's popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChessStats {
    pub rapid: Option<u32>,
    pub blitz: Option<u32>,
    pub bullet: Option<u32>,
}

#[derive(Deserialize)]
struct StatsResponse {
    chess_rapid: Option<Category>,
    chess_blitz: Option<Category>,
    chess_bullet: Option<Category>,
}

#[derive(Deserialize)]
struct Category {
    last: Option<Rating>,
}

#[derive(Deserialize)]
struct Rating {
    rating: u32,
}

impl ChessStats {
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        let response: StatsResponse = serde_json::from_str(body)?;
        let last = |category: Option<Category>| category.and_then(|c| c.last).map(|r| r.rating);
        Ok(Self {
            rapid: last(response.chess_rapid),
            blitz: last(response.chess_blitz),
            bullet: last(response.chess_bullet),
        })
    }

    /// One line per time control, `-` where no rated game exists.
    pub fn summary(&self) -> String {
        let rating = |value: Option<u32>| value.map_or_else(|| "-".to_owned(), |r| r.to_string());
        format!(
            "Rapid: {}\nBlitz: {}\nBullet: {}",
            rating(self.rapid),
            rating(self.blitz),
            rating(self.bullet)
        )
    }
}

pub fn stats_url(username: &str) -> String {
    format!("{STATS_URL_BASE}/{}/stats", username.to_lowercase())
}

/// No timeout and no retry; the popup stays in its loading state until this resolves.
pub async fn fetch_chess_stats(
    client: &reqwest::Client,
    username: &str,
) -> Result<ChessStats, FetchError> {
    let url = stats_url(username);
    let response = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url,
            status: status.as_u16(),
        });
    }
    ChessStats::from_json(&response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_reads_last_ratings() {
        let body = r#"{
            "chess_rapid": {"last": {"rating": 1234, "date": 1, "rd": 50}, "best": {"rating": 1300}},
            "chess_blitz": {"last": {"rating": 987, "date": 1, "rd": 50}},
            "fide": 0
        }"#;
        let stats = ChessStats::from_json(body).unwrap();
        assert_eq!(
            stats,
            ChessStats {
                rapid: Some(1234),
                blitz: Some(987),
                bullet: None
            }
        );
        assert_eq!(stats.summary(), "Rapid: 1234\nBlitz: 987\nBullet: -");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ChessStats::from_json("not json"),
            Err(FetchError::Json(_))
        ));
    }

    #[test]
    fn test_stats_url() {
        assert_eq!(
            stats_url("Hikaru"),
            "https://api.chess.com/pub/player/hikaru/stats"
        );
    }
}
