pub mod language;
pub mod movie;
pub mod rating;
pub mod recommendation;
pub mod review;
pub mod user;

pub use language::Language;
pub use movie::{MovieDetails, MovieSearchResult};
pub use rating::{RatingError, StarRating};
pub use recommendation::{MovieRecommendation, ReleaseStatus, UpcomingMovie};
pub use review::{ColorVariant, Review, SortOrder};
pub use user::User;
