use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}: only letters, digits, '_' and '-' are allowed")]
    InvalidKey(String),
    #[error("failed to access {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum MilestoneError {
    #[error("milestone table is empty")]
    Empty,
    #[error("first milestone must start at 0 reviews, found {0}")]
    MissingBaseline(u32),
    #[error("milestone thresholds must be strictly ascending ({previous} then {next})")]
    NotAscending { previous: u32, next: u32 },
    #[error("failed to read milestone file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse milestone file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("write a review or mark the film as just watched")]
    EmptyReview,
    #[error(transparent)]
    InvalidRating(#[from] cinenote_models::RatingError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("username already exists")]
    UsernameTaken,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
