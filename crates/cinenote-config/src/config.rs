use cinenote_models::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub gamification: GamificationConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    /// Poster size used for search results
    #[serde(default = "default_tmdb_image_base_url")]
    pub image_base_url: String,
    /// Poster size used for movie details
    #[serde(default = "default_tmdb_image_large_url")]
    pub image_large_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    /// Quiet period after the last query change before a request goes out
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GamificationConfig {
    #[serde(default)]
    pub max_rank: MaxRankPolicy,
    /// Custom milestone table (TOML); the built-in table for the language is used otherwise
    #[serde(default)]
    pub milestones_file: Option<PathBuf>,
}

/// What "next milestone" means once the top rank is reached
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaxRankPolicy {
    /// Next target is twice the current count
    #[default]
    Doubling,
    /// Next target is the top threshold itself and progress reads 100
    Pinned,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_image_large_url() -> String {
    "https://image.tmdb.org/t/p/original".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            image_base_url: default_tmdb_image_base_url(),
            image_large_url: default_tmdb_image_large_url(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.base_url cannot be empty"));
        }
        if self.tmdb.image_base_url.trim().is_empty() || self.tmdb.image_large_url.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb image URLs cannot be empty"));
        }
        if self.gemini.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("gemini.base_url cannot be empty"));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(anyhow::anyhow!("gemini.model cannot be empty"));
        }
        if let Some(ref file) = self.gamification.milestones_file {
            if !file.exists() {
                return Err(anyhow::anyhow!("milestones_file {} does not exist", file.display()));
            }
        }
        Ok(())
    }
}
