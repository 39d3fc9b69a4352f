use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("movie not found: {0}")]
    NotFound(String),

    #[error("failed to fetch movie metadata: {0}")]
    Fetch(String),

    #[error("no TMDB API key configured (set TMDB_API_KEY or run `cinenote config tmdb-key`)")]
    MissingApiKey,
}

impl From<reqwest::Error> for MetadataError {
    fn from(e: reqwest::Error) -> Self {
        MetadataError::Fetch(e.to_string())
    }
}

/// Never escapes the public recommendation API, which degrades to empty results
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("recommendations unavailable: {0}")]
    RecommendationUnavailable(String),

    #[error("no Gemini API key configured (set GEMINI_API_KEY or run `cinenote config gemini-key`)")]
    MissingApiKey,
}

impl From<reqwest::Error> for RecommendationError {
    fn from(e: reqwest::Error) -> Self {
        RecommendationError::RecommendationUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for RecommendationError {
    fn from(e: serde_json::Error) -> Self {
        RecommendationError::RecommendationUnavailable(format!("unparseable model output: {}", e))
    }
}
