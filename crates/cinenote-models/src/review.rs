use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::movie::MovieDetails;
use crate::rating::StarRating;

/// One diary entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub movie_id: String,
    pub movie_details: MovieDetails,
    pub user_rating: StarRating,
    /// Empty for "watched, no written review" entries
    pub content: String,
    /// Milliseconds since the Unix epoch, never touched by edits
    pub created_at: i64,
    pub color_variant: ColorVariant,
}

impl Review {
    pub fn is_watched_only(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn created_at_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.created_at)
            .single()
            .unwrap_or_else(|| DateTime::<Utc>::from(std::time::UNIX_EPOCH))
    }
}

/// Cosmetic card tint, fixed at creation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorVariant {
    Blue,
    Cyan,
    Sky,
    Indigo,
}

impl ColorVariant {
    pub const ALL: [ColorVariant; 4] = [
        ColorVariant::Blue,
        ColorVariant::Cyan,
        ColorVariant::Sky,
        ColorVariant::Indigo,
    ];

    /// Deterministic choice from a random seed
    pub fn pick(seed: u64) -> Self {
        Self::ALL[(seed % Self::ALL.len() as u64) as usize]
    }
}

/// Presentation order by creation time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "newest"),
            SortOrder::Oldest => write!(f, "oldest"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" | "desc" => Ok(SortOrder::Newest),
            "oldest" | "asc" => Ok(SortOrder::Oldest),
            other => Err(format!("Invalid sort order: {}. Use 'newest' or 'oldest'", other)),
        }
    }
}
