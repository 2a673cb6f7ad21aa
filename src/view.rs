//! Detail-page state that survives rapid navigation.
//!
//! Every `load` takes a fresh generation token before it awaits anything. Results are
//! published only while their token is still the newest, so the last *requested* load
//! wins even when an older one finishes later.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::aggregate::{Aggregator, MediaRequest};
use crate::models::{MediaDetails, MediaKind};
use crate::reviews::{ReviewCard, ReviewPanel};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading(MediaRequest),
    Ready(Arc<MediaDetails>),
    NotFound,
    Failed(String),
}

pub struct DetailView {
    aggregator: Aggregator,
    generation: AtomicU64,
    state: Mutex<ViewState>,
    reviews: Mutex<ReviewPanel>,
}

impl DetailView {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            generation: AtomicU64::new(0),
            state: Mutex::new(ViewState::Idle),
            reviews: Mutex::new(ReviewPanel::new()),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    /// Loads a page for `id`/`kind`. Returns false when a newer load or `leave`
    /// superseded this one and its result was dropped.
    pub async fn load(&self, id: Option<i32>, kind: Option<MediaKind>) -> bool {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request = match MediaRequest::new(id, kind) {
            Ok(request) => request,
            Err(e) => {
                debug!("Not loading detail view: {}", e);
                return self.publish(token, ViewState::NotFound).await;
            }
        };

        self.publish(token, ViewState::Loading(request)).await;
        let next = match self.aggregator.details(request).await {
            Ok(details) => ViewState::Ready(Arc::new(details)),
            Err(e) => ViewState::Failed(e.user_message()),
        };
        self.publish(token, next).await
    }

    /// Navigating away: pending loads become stale and the state resets.
    pub async fn leave(&self) {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(token, ViewState::Idle).await;
    }

    pub async fn toggle_review(&self, review_id: &str) -> bool {
        self.reviews.lock().await.toggle(review_id)
    }

    pub async fn review_cards(&self) -> Vec<ReviewCard> {
        let state = self.state.lock().await;
        match &*state {
            ViewState::Ready(details) => self.reviews.lock().await.preview(&details.reviews),
            _ => Vec::new(),
        }
    }

    async fn publish(&self, token: u64, next: ViewState) -> bool {
        let mut state = self.state.lock().await;
        let current = self.generation.load(Ordering::SeqCst);
        if current != token {
            debug!(token, current, "Discarding stale detail view update");
            return false;
        }
        if matches!(next, ViewState::Ready(_) | ViewState::Idle) {
            self.reviews.lock().await.clear();
        }
        *state = next;
        true
    }
}
