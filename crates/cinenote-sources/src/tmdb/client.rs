use crate::error::MetadataError;
use crate::tmdb::{api, ranking};
use crate::traits::MovieMetadata;
use async_trait::async_trait;
use cinenote_config::TmdbConfig;
use cinenote_models::{MovieDetails, MovieSearchResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: Option<String>,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client: Arc::new(client),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            config,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, MetadataError> {
        self.api_key.as_deref().ok_or(MetadataError::MissingApiKey)
    }
}

#[async_trait]
impl MovieMetadata for TmdbClient {
    async fn search(&self, query: &str, year_hint: Option<&str>) -> Result<Vec<MovieSearchResult>, MetadataError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let raw = api::search_movies(&self.client, &self.config.base_url, self.api_key()?, query).await?;
        let ranked = ranking::rank_results(query, year_hint, raw);

        Ok(ranked
            .iter()
            .map(|movie| api::to_search_result(movie, &self.config.image_base_url))
            .collect())
    }

    async fn get_details(&self, external_id: &str) -> Result<MovieDetails, MetadataError> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(MetadataError::NotFound(String::new()));
        }

        let raw = api::movie_details(&self.client, &self.config.base_url, self.api_key()?, external_id).await?;
        let details = api::to_details(&raw, &self.config.image_large_url);
        debug!("Director for {}: {}", details.title, details.director);
        info!("Fetched details for {} ({})", details.title, details.year);
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_query_makes_no_request() {
        // No key configured: a request would fail with MissingApiKey
        let client = TmdbClient::new(TmdbConfig::default(), None);
        let results = client.search("   ", Some("2024")).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let client = TmdbClient::new(TmdbConfig::default(), Some("  ".to_string()));
        assert!(!client.has_api_key());
        assert!(matches!(client.search("Dune", None).await, Err(MetadataError::MissingApiKey)));
        assert!(matches!(client.get_details("438631").await, Err(MetadataError::MissingApiKey)));
    }
}
