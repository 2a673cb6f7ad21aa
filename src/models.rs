use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Movie or show; TMDB exposes a parallel endpoint family for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    /// Path segment used by the TMDB v3 API.
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => f.write_str("movie"),
            MediaKind::Show => f.write_str("show"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" | "show" => Ok(MediaKind::Show),
            _ => Err(anyhow::anyhow!("media kind must be 'movie' or 'tv'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: i32,
    pub kind: MediaKind,
    pub title: String,
    pub poster: Option<String>,
    pub synopsis: String,
    /// Average vote, 0–10.
    pub rating: Option<f32>,
    /// Release date for movies, first-air date for shows.
    pub date: Option<String>,
}

impl MediaRecord {
    pub fn year(&self) -> Option<i32> {
        self.date.as_deref().and_then(year_of)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastEntry {
    pub id: i32,
    pub name: String,
    pub portrait: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub id: String,
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub id: i32,
    pub title: String,
    pub poster: Option<String>,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    pub url: String,
}

impl Trailer {
    pub fn youtube(key: &str) -> Self {
        Self {
            key: key.to_string(),
            url: format!("https://www.youtube.com/embed/{key}"),
        }
    }
}

/// Everything a detail page shows, built from one fan-out cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    pub record: MediaRecord,
    pub trailer: Option<Trailer>,
    pub cast: Vec<CastEntry>,
    pub reviews: Vec<ReviewEntry>,
    pub recommendations: Vec<RecommendationEntry>,
}

/// Card shown in carousels and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: i32,
    pub kind: MediaKind,
    pub title: String,
    pub poster: Option<String>,
    pub date: Option<String>,
}

impl MediaSummary {
    pub fn year(&self) -> Option<i32> {
        self.date.as_deref().and_then(year_of)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonCredit {
    pub id: i32,
    pub title: String,
    pub role: Option<String>,
    pub poster: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonProfile {
    pub id: i32,
    pub name: String,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    pub portrait: Option<String>,
    pub credits: Vec<PersonCredit>,
}

pub fn year_of(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
