//! Presentation-side review state: per-review expand/collapse and excerpts.
use serde::Serialize;
use std::collections::HashMap;

use crate::models::ReviewEntry;

pub const EXCERPT_CHARS: usize = 250;
pub const PREVIEW_COUNT: usize = 3;

/// Body cut to `max_chars` characters with a trailing `...`; the flag tells whether it was cut.
pub fn excerpt(body: &str, max_chars: usize) -> (String, bool) {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}...", &body[..cut]), true),
        None => (body.to_string(), false),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewCard {
    pub id: String,
    pub author: String,
    pub text: String,
    pub expandable: bool,
    pub expanded: bool,
}

/// Expansion flags keyed by review id. Owned by the view, reset when the reviews are refetched.
#[derive(Debug, Default, Clone)]
pub struct ReviewPanel {
    expanded: HashMap<String, bool>,
}

impl ReviewPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Flips one review and returns its new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let entry = self.expanded.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn card(&self, review: &ReviewEntry) -> ReviewCard {
        let expanded = self.is_expanded(&review.id);
        let (short, expandable) = excerpt(&review.body, EXCERPT_CHARS);
        let text = if expanded {
            review.body.clone()
        } else {
            short
        };
        ReviewCard {
            id: review.id.clone(),
            author: review.author.clone(),
            text,
            expandable,
            expanded,
        }
    }

    /// Cards for the first few reviews, as the detail page lists them.
    pub fn preview(&self, reviews: &[ReviewEntry]) -> Vec<ReviewCard> {
        reviews
            .iter()
            .take(PREVIEW_COUNT)
            .map(|r| self.card(r))
            .collect()
    }
}
