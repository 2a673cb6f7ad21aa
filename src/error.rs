//! Failures surfaced at the aggregation boundary.
use std::fmt;
use thiserror::Error;

/// Upstream lookup that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Details,
    Videos,
    Credits,
    Reviews,
    Recommendations,
    Person,
    PersonCredits,
    TopRated,
    Upcoming,
    SearchMovies,
    SearchShows,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Details => "details",
            Endpoint::Videos => "videos",
            Endpoint::Credits => "credits",
            Endpoint::Reviews => "reviews",
            Endpoint::Recommendations => "recommendations",
            Endpoint::Person => "person",
            Endpoint::PersonCredits => "person credits",
            Endpoint::TopRated => "top rated",
            Endpoint::Upcoming => "upcoming",
            Endpoint::SearchMovies => "movie search",
            Endpoint::SearchShows => "show search",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("search query is empty")]
    EmptyQuery,

    #[error("{endpoint} lookup failed: {source:#}")]
    Upstream {
        endpoint: Endpoint,
        #[source]
        source: anyhow::Error,
    },
}

impl AggregateError {
    pub fn upstream(endpoint: Endpoint, source: anyhow::Error) -> Self {
        AggregateError::Upstream { endpoint, source }
    }

    /// Message safe to hand to the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            AggregateError::MissingInput(_) => "Not found.".to_string(),
            AggregateError::EmptyQuery => "Please enter a movie name.".to_string(),
            AggregateError::Upstream { endpoint, .. } => {
                format!("Failed to fetch {endpoint}. Please try again.")
            }
        }
    }
}
