use crate::output::Output;
use cinenote_config::{Config, CredentialStore, PathManager};
use cinenote_core::{AccountStore, FileStore, GamificationEngine, KeyValueStore, MilestoneTable, ReviewStore};
use cinenote_models::User;
use cinenote_sources::{GeminiClient, TmdbClient};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs, loaded from the standard locations
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
    pub storage: Arc<dyn KeyValueStore>,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        Self::load_from(PathManager::default())
    }

    pub fn load_from(paths: PathManager) -> Result<Self> {
        paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create data directories: {}", e))?;

        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid config in {}: {}", config_file.display(), e))?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(paths.store_dir())?);
        debug!("Using store at {}", paths.store_dir().display());

        Ok(Self {
            paths,
            config,
            credentials,
            storage,
        })
    }

    pub fn accounts(&self) -> AccountStore {
        AccountStore::new(self.storage.clone())
    }

    /// The logged-in user, or an error telling them how to log in
    pub fn require_user(&self) -> Result<User> {
        self.accounts()
            .current_user()?
            .ok_or_else(|| eyre!("Not logged in. Run `cinenote login` or `cinenote signup` first."))
    }

    /// Review store already loaded with the user's diary
    pub fn diary(&self, user: &User) -> Result<ReviewStore> {
        let mut store = ReviewStore::new(self.storage.clone());
        store.load(&user.id)?;
        Ok(store)
    }

    pub fn engine(&self) -> Result<GamificationEngine> {
        let table = match &self.config.gamification.milestones_file {
            Some(path) => MilestoneTable::load(path)
                .map_err(|e| eyre!("Failed to load milestones from {}: {}", path.display(), e))?,
            None => MilestoneTable::builtin(self.config.language),
        };
        Ok(GamificationEngine::new(table, self.config.gamification.max_rank))
    }

    pub fn tmdb(&self) -> TmdbClient {
        TmdbClient::new(self.config.tmdb.clone(), self.credentials.resolve_tmdb_api_key())
    }

    pub fn gemini(&self) -> GeminiClient {
        GeminiClient::new(self.config.gemini.clone(), self.credentials.resolve_gemini_api_key())
    }

    /// TMDB client, or a warning and `None` when no key is configured
    pub fn tmdb_or_warn(&self, output: &Output) -> Option<TmdbClient> {
        let client = self.tmdb();
        if client.has_api_key() {
            Some(client)
        } else {
            output.warn("No TMDB API key configured. Run `cinenote config tmdb-key` or set TMDB_API_KEY.");
            None
        }
    }

    pub fn save_config(&self) -> Result<()> {
        self.config
            .save_to_file(&self.paths.config_file())
            .map_err(|e| eyre!("Failed to save config: {}", e))
    }
}
