use crate::error::MetadataError;
use async_trait::async_trait;
use cinenote_models::{Language, MovieDetails, MovieRecommendation, MovieSearchResult, UpcomingMovie};

/// Movie database lookups
#[async_trait]
pub trait MovieMetadata: Send + Sync {
    /// Ranked search results; a blank query yields an empty list without a request
    async fn search(&self, query: &str, year_hint: Option<&str>) -> Result<Vec<MovieSearchResult>, MetadataError>;

    async fn get_details(&self, external_id: &str) -> Result<MovieDetails, MetadataError>;
}

/// AI suggestions. Failures degrade to empty or fallback lists instead of erroring.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, query: &str, language: Language) -> Vec<MovieRecommendation>;

    async fn upcoming(&self) -> Vec<UpcomingMovie>;
}
