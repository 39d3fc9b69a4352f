//! Search result ordering.
//!
//! TMDB's own relevance order favours popular films over exact matches, so
//! results are re-scored: title match quality dominates, a release year close
//! to the hint comes next and popularity only breaks ties.

use crate::tmdb::api::TmdbMovie;
use std::cmp::Ordering;

const EXACT_TITLE: f64 = 1000.0;
const PREFIX_TITLE: f64 = 100.0;
const SUBSTRING_TITLE: f64 = 10.0;
const YEAR_MATCH: f64 = 500.0;
const YEAR_TOLERANCE: i32 = 1;
const POPULARITY_WEIGHT: f64 = 0.01;

/// Lowercase and keep only ASCII letters and digits
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

fn parse_year(text: &str) -> Option<i32> {
    let year: i32 = text.get(..4)?.parse().ok()?;
    (year != 0).then_some(year)
}

pub fn score(movie: &TmdbMovie, normalized_query: &str, year_hint: Option<i32>) -> f64 {
    let title = normalize_title(&movie.title);
    let mut score = if title == normalized_query {
        EXACT_TITLE
    } else if title.starts_with(normalized_query) {
        PREFIX_TITLE
    } else if title.contains(normalized_query) {
        SUBSTRING_TITLE
    } else {
        0.0
    };

    if let Some(target) = year_hint {
        let released = movie.release_date.as_deref().and_then(parse_year);
        if released.is_some_and(|year| (year - target).abs() <= YEAR_TOLERANCE) {
            score += YEAR_MATCH;
        }
    }

    score + movie.popularity.unwrap_or(0.0) * POPULARITY_WEIGHT
}

/// Stable descending sort by score; equal scores keep TMDB's order
pub fn rank_results(query: &str, year_hint: Option<&str>, mut movies: Vec<TmdbMovie>) -> Vec<TmdbMovie> {
    let normalized_query = normalize_title(query);
    let year_hint = year_hint.and_then(|y| y.trim().parse::<i32>().ok());

    let mut scored: Vec<(f64, TmdbMovie)> = movies
        .drain(..)
        .map(|movie| (score(&movie, &normalized_query, year_hint), movie))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(_, movie)| movie).collect()
}
