use crate::error::RecommendationError;
use crate::gemini::{api, parse, prompts};
use crate::traits::Recommender;
use async_trait::async_trait;
use chrono::Local;
use cinenote_config::GeminiConfig;
use cinenote_models::{Language, MovieRecommendation, UpcomingMovie};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// Grounded search answers are slow
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct GeminiClient {
    client: Arc<Client>,
    api_key: Option<String>,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, api_key: Option<String>) -> Self {
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

    async fn generate(&self, prompt: &str, google_search: bool) -> Result<String, RecommendationError> {
        let api_key = self.api_key.as_deref().ok_or(RecommendationError::MissingApiKey)?;
        let text = api::generate_content(
            &self.client,
            &self.config.base_url,
            &self.config.model,
            api_key,
            prompt,
            google_search,
        )
        .await?;
        Ok(if text.trim().is_empty() { "[]".to_string() } else { text })
    }

    pub async fn try_recommend(
        &self,
        query: &str,
        language: Language,
    ) -> Result<Vec<MovieRecommendation>, RecommendationError> {
        let text = self.generate(&prompts::recommendation_prompt(query, language), false).await?;
        parse_recommendations(&text)
    }

    pub async fn try_upcoming(&self) -> Result<Vec<UpcomingMovie>, RecommendationError> {
        let today = Local::now().format("%-d %B %Y").to_string();
        let text = self.generate(&prompts::upcoming_prompt(&today), true).await?;
        parse_upcoming(&text)
    }
}

pub fn parse_recommendations(text: &str) -> Result<Vec<MovieRecommendation>, RecommendationError> {
    Ok(serde_json::from_str(&parse::strip_code_fences(text))?)
}

pub fn parse_upcoming(text: &str) -> Result<Vec<UpcomingMovie>, RecommendationError> {
    Ok(serde_json::from_str(parse::extract_json_array(text))?)
}

#[async_trait]
impl Recommender for GeminiClient {
    async fn recommend(&self, query: &str, language: Language) -> Vec<MovieRecommendation> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.try_recommend(query, language).await {
            Ok(recs) => {
                info!("Got {} recommendations for {:?}", recs.len(), query);
                recs
            }
            Err(e) => {
                warn!("Recommendations unavailable: {}", e);
                Vec::new()
            }
        }
    }

    async fn upcoming(&self) -> Vec<UpcomingMovie> {
        match self.try_upcoming().await {
            Ok(movies) => {
                info!("Got {} cinema listings", movies.len());
                movies
            }
            Err(e) => {
                warn!("Cinema listings unavailable, using fallback: {}", e);
                prompts::fallback_upcoming()
            }
        }
    }
}
