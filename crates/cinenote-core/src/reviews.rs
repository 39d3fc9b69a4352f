use crate::error::ReviewError;
use crate::storage::{self, KeyValueStore};
use chrono::Utc;
use cinenote_models::{ColorVariant, MovieDetails, Review, SortOrder, StarRating};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Input collected by the add form, not yet a review
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub details: MovieDetails,
    pub rating: StarRating,
    pub content: String,
    /// Log the film without a written review
    pub just_watched: bool,
}

impl ReviewDraft {
    /// Content that will be stored, or `EmptyReview` when there is nothing to save
    pub fn resolved_content(&self) -> Result<String, ReviewError> {
        if self.just_watched {
            return Ok(String::new());
        }
        if self.content.trim().is_empty() {
            return Err(ReviewError::EmptyReview);
        }
        Ok(self.content.clone())
    }
}

/// The active user's diary and its persisted mirror.
///
/// `load` must run on every user switch before any mutation; it replaces the
/// in-memory collection outright. Every mutation is written through to the
/// key/value store while a user is active; a failed write rolls the
/// in-memory change back so memory never runs ahead of disk.
pub struct ReviewStore {
    storage: Arc<dyn KeyValueStore>,
    user_id: Option<String>,
    reviews: Vec<Review>,
    rng: Box<dyn RngCore + Send>,
    clock: Clock,
}

impl ReviewStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            user_id: None,
            reviews: Vec::new(),
            rng: Box::new(StdRng::from_entropy()),
            clock: Box::new(|| Utc::now().timestamp_millis()),
        }
    }

    /// Replace the randomness source used for color variants
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the clock used for `created_at` (milliseconds since epoch)
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn active_user(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn load(&mut self, user_id: &str) -> Result<(), ReviewError> {
        let key = storage::reviews_key(user_id);
        let loaded: Vec<Review> = storage::read_json(self.storage.as_ref(), &key)?.unwrap_or_default();
        info!("Loaded {} reviews for user {}", loaded.len(), user_id);
        self.user_id = Some(user_id.to_string());
        self.reviews = loaded;
        Ok(())
    }

    /// Drop the active user and the in-memory collection
    pub fn clear(&mut self) {
        self.user_id = None;
        self.reviews.clear();
    }

    pub fn add(&mut self, draft: ReviewDraft) -> Result<&Review, ReviewError> {
        let content = draft.resolved_content()?;
        let movie_id = draft
            .details
            .external_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let review = Review {
            id: uuid::Uuid::new_v4().to_string(),
            movie_id,
            movie_details: draft.details,
            user_rating: draft.rating,
            content,
            created_at: (self.clock)(),
            color_variant: ColorVariant::pick(self.rng.next_u64()),
        };
        let id = review.id.clone();
        let title = review.movie_details.title.clone();

        self.reviews.insert(0, review);
        if let Err(e) = self.persist() {
            self.reviews.remove(0);
            return Err(e);
        }
        info!("Added review {} for {}", id, title);
        Ok(&self.reviews[0])
    }

    /// Replace details, rating and content. Unknown ids are ignored and return `false`.
    pub fn update(
        &mut self,
        id: &str,
        details: MovieDetails,
        rating: StarRating,
        content: String,
    ) -> Result<bool, ReviewError> {
        let Some(index) = self.reviews.iter().position(|r| r.id == id) else {
            debug!("Update skipped: no review {}", id);
            return Ok(false);
        };

        let review = &mut self.reviews[index];
        let previous = review.clone();
        review.movie_details = details;
        review.user_rating = rating;
        review.content = content;

        if let Err(e) = self.persist() {
            self.reviews[index] = previous;
            return Err(e);
        }
        info!("Updated review {}", id);
        Ok(true)
    }

    /// Remove by id. Unknown ids are ignored and return `false`.
    pub fn remove(&mut self, id: &str) -> Result<bool, ReviewError> {
        let Some(index) = self.reviews.iter().position(|r| r.id == id) else {
            debug!("Remove skipped: no review {}", id);
            return Ok(false);
        };

        let removed = self.reviews.remove(index);
        if let Err(e) = self.persist() {
            self.reviews.insert(index, removed);
            return Err(e);
        }
        info!("Removed review {}", id);
        Ok(true)
    }

    pub fn persist(&self) -> Result<(), ReviewError> {
        let Some(ref user_id) = self.user_id else {
            return Ok(());
        };
        let key = storage::reviews_key(user_id);
        storage::write_json(self.storage.as_ref(), &key, &self.reviews)?;
        Ok(())
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id == id)
    }

    /// Reviews whose id starts with `prefix`, for short ids typed on the command line
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Review> {
        if prefix.is_empty() {
            return Vec::new();
        }
        self.reviews.iter().filter(|r| r.id.starts_with(prefix)).collect()
    }

    /// Read-only view ordered by `created_at`; ties keep their stored order
    pub fn sorted(&self, order: SortOrder) -> Vec<&Review> {
        let mut view: Vec<&Review> = self.reviews.iter().collect();
        match order {
            SortOrder::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => view.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        view
    }
}
