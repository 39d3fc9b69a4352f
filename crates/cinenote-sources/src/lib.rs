pub mod enrich;
pub mod error;
pub mod gemini;
pub mod poster;
pub mod search;
pub mod tmdb;
pub mod traits;

pub use enrich::{enrich_recommendations, enrich_upcoming};
pub use error::{MetadataError, RecommendationError};
pub use gemini::{quick_picks, GeminiClient};
pub use poster::find_poster;
pub use search::{SearchOutcome, SearchSession};
pub use tmdb::TmdbClient;
pub use traits::{MovieMetadata, Recommender};
