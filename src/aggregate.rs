//! Fan-out/fan-in over TMDB lookups that feed one page.
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AggregateError, Endpoint};
use crate::models::{MediaDetails, MediaKind, MediaSummary, PersonProfile};
use crate::tmdb::{self, TmdbApi};

pub const CAST_LIMIT: usize = 10;
pub const RECOMMENDATION_LIMIT: usize = 8;

/// Identifier and kind of a detail page. Both must be present before any lookup runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaRequest {
    pub id: i32,
    pub kind: MediaKind,
}

impl MediaRequest {
    pub fn new(id: Option<i32>, kind: Option<MediaKind>) -> Result<Self, AggregateError> {
        let id = id
            .filter(|id| *id > 0)
            .ok_or(AggregateError::MissingInput("identifier"))?;
        let kind = kind.ok_or(AggregateError::MissingInput("kind"))?;
        Ok(Self { id, kind })
    }
}

#[derive(Clone)]
pub struct Aggregator {
    tmdb: Arc<dyn TmdbApi>,
}

impl Aggregator {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        Self { tmdb }
    }

    /// Runs the five detail lookups concurrently. The first failure fails the
    /// whole aggregate; nothing partial is returned.
    pub async fn details(&self, request: MediaRequest) -> Result<MediaDetails, AggregateError> {
        let MediaRequest { id, kind } = request;
        info!("Aggregating {} {}", kind, id);

        let joined = tokio::try_join!(
            tagged(Endpoint::Details, self.tmdb.fetch_record(kind, id)),
            tagged(Endpoint::Videos, self.tmdb.fetch_videos(kind, id)),
            tagged(Endpoint::Credits, self.tmdb.fetch_cast(kind, id)),
            tagged(Endpoint::Reviews, self.tmdb.fetch_reviews(kind, id)),
            tagged(
                Endpoint::Recommendations,
                self.tmdb.fetch_recommendations(kind, id)
            ),
        );
        let (record, videos, mut cast, reviews, mut recommendations) = match joined {
            Ok(parts) => parts,
            Err(e) => {
                warn!("Aggregation for {} {} failed: {}", kind, id, e);
                return Err(e);
            }
        };

        let trailer = tmdb::select_trailer(&videos);
        cast.truncate(CAST_LIMIT);
        recommendations.truncate(RECOMMENDATION_LIMIT);
        debug!(
            id,
            kind = %kind,
            cast = cast.len(),
            reviews = reviews.len(),
            recommendations = recommendations.len(),
            trailer = trailer.is_some(),
            "Aggregated details"
        );

        Ok(MediaDetails {
            record,
            trailer,
            cast,
            reviews,
            recommendations,
        })
    }

    /// Person page: details and movie credits, joined the same way.
    pub async fn person(&self, id: Option<i32>) -> Result<PersonProfile, AggregateError> {
        let id = id
            .filter(|id| *id > 0)
            .ok_or(AggregateError::MissingInput("identifier"))?;
        info!("Aggregating person {}", id);
        let (mut profile, credits) = tokio::try_join!(
            tagged(Endpoint::Person, self.tmdb.fetch_person(id)),
            tagged(Endpoint::PersonCredits, self.tmdb.fetch_person_credits(id)),
        )
        .inspect_err(|e| warn!("Aggregation for person {} failed: {}", id, e))?;
        profile.credits = credits;
        Ok(profile)
    }

    pub async fn top_rated(&self) -> Result<Vec<MediaSummary>, AggregateError> {
        tagged(Endpoint::TopRated, self.tmdb.top_rated()).await
    }

    pub async fn upcoming(&self) -> Result<Vec<MediaSummary>, AggregateError> {
        tagged(Endpoint::Upcoming, self.tmdb.upcoming()).await
    }

    /// Movies and shows matching `query`, movies first, each in API order.
    pub async fn search(&self, query: &str) -> Result<Vec<MediaSummary>, AggregateError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AggregateError::EmptyQuery);
        }
        let (mut movies, shows) = tokio::try_join!(
            tagged(
                Endpoint::SearchMovies,
                self.tmdb.search(MediaKind::Movie, query)
            ),
            tagged(
                Endpoint::SearchShows,
                self.tmdb.search(MediaKind::Show, query)
            ),
        )?;
        movies.extend(shows);
        Ok(movies)
    }
}

async fn tagged<T>(
    endpoint: Endpoint,
    lookup: impl Future<Output = anyhow::Result<T>>,
) -> Result<T, AggregateError> {
    lookup
        .await
        .map_err(|e| AggregateError::upstream(endpoint, e))
}
