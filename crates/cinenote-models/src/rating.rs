use serde::{Deserialize, Serialize};
use std::fmt;

/// User star rating, always within 1..=5
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError { value })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Filled and empty stars, e.g. "★★★☆☆"
    pub fn stars(&self) -> String {
        let filled = self.0 as usize;
        format!("{}{}", "★".repeat(filled), "☆".repeat(Self::MAX as usize - filled))
    }
}

impl Default for StarRating {
    // The add form starts at three stars
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for StarRating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingError {
    value: u8,
}

impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rating must be between 1 and 5, got {}", self.value)
    }
}

impl std::error::Error for RatingError {}
