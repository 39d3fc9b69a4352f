use crate::error::MetadataError;
use cinenote_models::{MovieDetails, MovieSearchResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

pub const UNKNOWN_DIRECTOR: &str = "Unknown";
pub const NO_PLOT: &str = "No plot available.";

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchPage {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCrewMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub credits: TmdbCredits,
}

/// Year part of a TMDB `YYYY-MM-DD` date, empty when unknown
fn release_year(release_date: Option<&str>) -> String {
    release_date.and_then(|d| d.get(..4)).unwrap_or_default().to_string()
}

fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(|p| format!("{}{}", base, p))
}

pub fn to_search_result(movie: &TmdbMovie, image_base_url: &str) -> MovieSearchResult {
    MovieSearchResult {
        title: movie.title.clone(),
        year: release_year(movie.release_date.as_deref()),
        poster_url: image_url(image_base_url, movie.poster_path.as_deref()),
        external_id: Some(movie.id.to_string()),
    }
}

pub fn to_details(details: &TmdbMovieDetails, image_large_url: &str) -> MovieDetails {
    let director = details
        .credits
        .crew
        .iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string());

    let plot = details
        .overview
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .unwrap_or(NO_PLOT)
        .to_string();

    // A zero average means nobody has voted yet
    let rating = details
        .vote_average
        .filter(|v| *v > 0.0)
        .map(|v| format!("{:.1}", v));

    MovieDetails {
        title: details.title.clone(),
        year: release_year(details.release_date.as_deref()),
        director,
        genres: details.genres.iter().map(|g| g.name.clone()).collect(),
        plot,
        rating,
        poster_url: image_url(image_large_url, details.poster_path.as_deref()),
        external_id: Some(details.id.to_string()),
    }
}

/// One page of raw search results in TMDB's order
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<TmdbMovie>, MetadataError> {
    let url = format!("{}/search/movie", base_url.trim_end_matches('/'));
    debug!("TMDB search: {}", query);

    let response = client
        .get(&url)
        .query(&[
            ("api_key", api_key),
            ("query", query),
            ("include_adult", "false"),
            ("language", "en-US"),
            ("page", "1"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(MetadataError::Fetch(format!("TMDB search returned {} - {}", status, error_text)));
    }

    let page: TmdbSearchPage = response.json().await?;
    debug!("TMDB search returned {} results", page.results.len());
    Ok(page.results)
}

pub async fn movie_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: &str,
) -> Result<TmdbMovieDetails, MetadataError> {
    let url = format!("{}/movie/{}", base_url.trim_end_matches('/'), id);
    debug!("TMDB details: {}", id);

    let response = client
        .get(&url)
        .query(&[
            ("api_key", api_key),
            ("append_to_response", "credits"),
            ("language", "en-US"),
        ])
        .send()
        .await?;

    match response.status() {
        StatusCode::NOT_FOUND => Err(MetadataError::NotFound(id.to_string())),
        status if !status.is_success() => {
            let error_text = response.text().await.unwrap_or_default();
            Err(MetadataError::Fetch(format!("TMDB details returned {} - {}", status, error_text)))
        }
        _ => Ok(response.json().await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "https://image.tmdb.org/t/p/w500";
    const LARGE: &str = "https://image.tmdb.org/t/p/original";

    #[test]
    fn test_search_result_mapping() {
        let json = r#"{"results": [
            {"id": 438631, "title": "Dune", "release_date": "2021-09-15", "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg", "popularity": 151.2},
            {"id": 1, "title": "Untitled", "release_date": "", "poster_path": null}
        ]}"#;
        let page: TmdbSearchPage = serde_json::from_str(json).unwrap();

        let dune = to_search_result(&page.results[0], SMALL);
        assert_eq!(dune.year, "2021");
        assert_eq!(dune.external_id.as_deref(), Some("438631"));
        assert_eq!(
            dune.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg")
        );

        let untitled = to_search_result(&page.results[1], SMALL);
        assert_eq!(untitled.year, "");
        assert!(untitled.poster_url.is_none());
    }

    #[test]
    fn test_details_mapping() {
        let json = r#"{
            "id": 603, "title": "The Matrix", "release_date": "1999-03-30",
            "overview": "A hacker learns the truth.",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "vote_average": 8.217, "poster_path": "/matrix.jpg",
            "credits": {"crew": [
                {"name": "Bill Pope", "job": "Director of Photography"},
                {"name": "Lana Wachowski", "job": "Director"},
                {"name": "Lilly Wachowski", "job": "Director"}
            ]}
        }"#;
        let raw: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        let details = to_details(&raw, LARGE);

        assert_eq!(details.director, "Lana Wachowski");
        assert_eq!(details.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(details.rating.as_deref(), Some("8.2"));
        assert_eq!(details.year, "1999");
        assert_eq!(details.poster_url.as_deref(), Some("https://image.tmdb.org/t/p/original/matrix.jpg"));
        assert_eq!(details.external_id.as_deref(), Some("603"));
    }

    #[test]
    fn test_details_fallbacks() {
        let json = r#"{"id": 7, "title": "Obscure", "overview": "", "vote_average": 0.0}"#;
        let raw: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        let details = to_details(&raw, LARGE);

        assert_eq!(details.director, UNKNOWN_DIRECTOR);
        assert_eq!(details.plot, NO_PLOT);
        assert!(details.rating.is_none());
        assert!(details.genres.is_empty());
        assert!(details.poster_url.is_none());
    }
}
