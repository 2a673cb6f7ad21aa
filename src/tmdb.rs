use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::TmdbConfig;
use crate::models::{
    CastEntry, MediaKind, MediaRecord, MediaSummary, PersonCredit, PersonProfile,
    RecommendationEntry, ReviewEntry, Trailer,
};

/// Lookups the aggregator fans out over. Every call is a single attempt.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn fetch_record(&self, kind: MediaKind, id: i32) -> Result<MediaRecord>;
    async fn fetch_videos(&self, kind: MediaKind, id: i32) -> Result<Vec<Video>>;
    async fn fetch_cast(&self, kind: MediaKind, id: i32) -> Result<Vec<CastEntry>>;
    async fn fetch_reviews(&self, kind: MediaKind, id: i32) -> Result<Vec<ReviewEntry>>;
    async fn fetch_recommendations(
        &self,
        kind: MediaKind,
        id: i32,
    ) -> Result<Vec<RecommendationEntry>>;
    /// Person details; `credits` is left empty.
    async fn fetch_person(&self, id: i32) -> Result<PersonProfile>;
    async fn fetch_person_credits(&self, id: i32) -> Result<Vec<PersonCredit>>;
    async fn top_rated(&self) -> Result<Vec<MediaSummary>>;
    async fn upcoming(&self) -> Result<Vec<MediaSummary>>;
    async fn search(&self, kind: MediaKind, query: &str) -> Result<Vec<MediaSummary>>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Video {
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    pub key: String,
}

/// First YouTube entry typed "Trailer", in API order.
pub fn select_trailer(videos: &[Video]) -> Option<Trailer> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site.eq_ignore_ascii_case("YouTube"))
        .map(|v| Trailer::youtube(&v.key))
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let user_agent = format!("cinescope/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(TmdbConfig::from_env()?)
    }

    fn image(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}{p}", self.config.image_base))
    }

    fn summary(&self, item: ListItem, fallback: MediaKind) -> MediaSummary {
        let kind = item.inferred_kind(fallback);
        MediaSummary {
            id: item.id,
            kind,
            poster: self.image(item.poster_path.as_deref()),
            date: non_empty(item.release_date.or(item.first_air_date)),
            title: item.title.or(item.name).unwrap_or_default(),
        }
    }

    async fn list(&self, path: &str) -> Result<Vec<MediaSummary>> {
        let page: Page<ListItem> = self.get_json(path, "&page=1").await?;
        Ok(page
            .results
            .into_iter()
            .map(|item| self.summary(item, MediaKind::Movie))
            .collect())
    }

    /// `path` is relative to the base URL; `extra` is appended to the query string.
    /// Errors name the path only so the API key never reaches logs.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str, extra: &str) -> Result<T> {
        let url = format!(
            "{}{path}?api_key={}&language={}{extra}",
            self.config.base_url, self.config.api_key, self.config.language
        );
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("request to {path} failed"))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}: {}", path, status, text));
        }
        let parsed: T = serde_json::from_str(&text)
            .with_context(|| format!("JSON parse failed for {path}"))?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn fetch_record(&self, kind: MediaKind, id: i32) -> Result<MediaRecord> {
        let path = format!("/{}/{id}", kind.path_segment());
        let detail: MediaDetail = self.get_json(&path, "").await?;
        Ok(MediaRecord {
            id: detail.id,
            kind,
            title: detail.title.or(detail.name).unwrap_or_default(),
            poster: self.image(detail.poster_path.as_deref()),
            synopsis: detail.overview.unwrap_or_default(),
            rating: detail.vote_average.filter(|r| (0.0..=10.0).contains(r)),
            date: non_empty(detail.release_date.or(detail.first_air_date)),
        })
    }

    async fn fetch_videos(&self, kind: MediaKind, id: i32) -> Result<Vec<Video>> {
        let path = format!("/{}/{id}/videos", kind.path_segment());
        let videos: Page<Video> = self.get_json(&path, "").await?;
        Ok(videos.results)
    }

    async fn fetch_cast(&self, kind: MediaKind, id: i32) -> Result<Vec<CastEntry>> {
        let path = format!("/{}/{id}/credits", kind.path_segment());
        let credits: Credits = self.get_json(&path, "").await?;
        Ok(credits
            .cast
            .into_iter()
            .map(|c| CastEntry {
                id: c.id,
                portrait: self.image(c.profile_path.as_deref()),
                name: c.name,
                role: c.character.unwrap_or_default(),
            })
            .collect())
    }

    async fn fetch_reviews(&self, kind: MediaKind, id: i32) -> Result<Vec<ReviewEntry>> {
        let path = format!("/{}/{id}/reviews", kind.path_segment());
        let reviews: Page<Review> = self.get_json(&path, "").await?;
        Ok(reviews
            .results
            .into_iter()
            .map(|r| ReviewEntry {
                id: r.id,
                author: r.author,
                body: r.content,
            })
            .collect())
    }

    async fn fetch_recommendations(
        &self,
        kind: MediaKind,
        id: i32,
    ) -> Result<Vec<RecommendationEntry>> {
        let path = format!("/{}/{id}/recommendations", kind.path_segment());
        let recs: Page<ListItem> = self.get_json(&path, "").await?;
        Ok(recs
            .results
            .into_iter()
            .map(|item| {
                let summary = self.summary(item, kind);
                RecommendationEntry {
                    id: summary.id,
                    title: summary.title,
                    poster: summary.poster,
                    kind: summary.kind,
                }
            })
            .collect())
    }

    async fn fetch_person(&self, id: i32) -> Result<PersonProfile> {
        let person: Person = self.get_json(&format!("/person/{id}"), "").await?;
        Ok(PersonProfile {
            id: person.id,
            portrait: self.image(person.profile_path.as_deref()),
            name: person.name,
            biography: non_empty(person.biography),
            birthday: non_empty(person.birthday),
            deathday: non_empty(person.deathday),
            place_of_birth: non_empty(person.place_of_birth),
            credits: Vec::new(),
        })
    }

    async fn fetch_person_credits(&self, id: i32) -> Result<Vec<PersonCredit>> {
        let credits: PersonCredits = self
            .get_json(&format!("/person/{id}/movie_credits"), "")
            .await?;
        Ok(credits
            .cast
            .into_iter()
            .map(|c| PersonCredit {
                id: c.id,
                poster: self.image(c.poster_path.as_deref()),
                title: c.title.unwrap_or_default(),
                role: non_empty(c.character),
                date: non_empty(c.release_date),
            })
            .collect())
    }

    async fn top_rated(&self) -> Result<Vec<MediaSummary>> {
        self.list("/movie/top_rated").await
    }

    async fn upcoming(&self) -> Result<Vec<MediaSummary>> {
        self.list("/movie/upcoming").await
    }

    async fn search(&self, kind: MediaKind, query: &str) -> Result<Vec<MediaSummary>> {
        let path = format!("/search/{}", kind.path_segment());
        let extra = format!("&query={}&page=1", urlencoding::encode(query));
        let page: Page<ListItem> = self.get_json(&path, &extra).await?;
        Ok(page
            .results
            .into_iter()
            .map(|item| self.summary(item, kind))
            .collect())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct MediaDetail {
    id: i32,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListItem {
    id: i32,
    title: Option<String>,
    name: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    media_type: Option<String>,
}

impl ListItem {
    fn inferred_kind(&self, fallback: MediaKind) -> MediaKind {
        match self.media_type.as_deref() {
            Some("movie") => MediaKind::Movie,
            Some("tv") => MediaKind::Show,
            _ if self.title.is_none() && self.name.is_some() => MediaKind::Show,
            _ => fallback,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    id: i32,
    name: String,
    profile_path: Option<String>,
    character: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Review {
    id: String,
    author: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct Person {
    id: i32,
    name: String,
    biography: Option<String>,
    birthday: Option<String>,
    deathday: Option<String>,
    place_of_birth: Option<String>,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PersonCredits {
    #[serde(default)]
    cast: Vec<PersonCreditItem>,
}

#[derive(Debug, Deserialize)]
struct PersonCreditItem {
    id: i32,
    title: Option<String>,
    character: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(site: &str, video_type: &str, key: &str) -> Video {
        Video {
            site: site.to_string(),
            video_type: video_type.to_string(),
            key: key.to_string(),
        }
    }

    #[test]
    fn trailer_is_first_youtube_trailer() {
        let videos = vec![
            video("YouTube", "Teaser", "teaser"),
            video("Vimeo", "Trailer", "vimeo"),
            video("YouTube", "Trailer", "first"),
            video("YouTube", "Trailer", "second"),
        ];
        let trailer = select_trailer(&videos).unwrap();
        assert_eq!(trailer.key, "first");
        assert_eq!(trailer.url, "https://www.youtube.com/embed/first");
    }

    #[test]
    fn teaser_alone_is_not_a_trailer() {
        let videos = vec![video("YouTube", "Teaser", "teaser")];
        assert!(select_trailer(&videos).is_none());
        assert!(select_trailer(&[]).is_none());
    }

    #[test]
    fn list_item_kind_falls_back_to_shape() {
        let item: ListItem =
            serde_json::from_str(r#"{"id":1,"name":"Show","poster_path":null}"#).unwrap();
        assert_eq!(item.inferred_kind(MediaKind::Movie), MediaKind::Show);
        let item: ListItem =
            serde_json::from_str(r#"{"id":2,"title":"Film","media_type":"tv"}"#).unwrap();
        assert_eq!(item.inferred_kind(MediaKind::Movie), MediaKind::Show);
        let item: ListItem = serde_json::from_str(r#"{"id":3,"title":"Film"}"#).unwrap();
        assert_eq!(item.inferred_kind(MediaKind::Show), MediaKind::Show);
    }
}
