use serde::{Deserialize, Serialize};

/// One row of a metadata search, already ranked by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieSearchResult {
    pub title: String,
    /// Release year as text; empty when the provider has no release date
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, alias = "imdbID", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// Movie snapshot embedded in a review.
///
/// Copied once when the review is created and only replaced when the user
/// re-confirms different details during an edit. It is never re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub title: String,
    pub year: String,
    pub director: String,
    #[serde(rename = "genre", default)]
    pub genres: Vec<String>,
    pub plot: String,
    #[serde(default, alias = "imdbRating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, alias = "imdbID", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl MovieDetails {
    /// "Title (Year)" or just the title when the year is unknown
    pub fn display_title(&self) -> String {
        if self.year.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.year)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_accept_browser_field_names() {
        let json = r#"{
            "title": "Parasite",
            "year": "2019",
            "director": "Bong Joon Ho",
            "genre": ["Comedy", "Thriller"],
            "plot": "Greed and class discrimination.",
            "imdbRating": "8.5",
            "posterUrl": "https://image.tmdb.org/t/p/original/x.jpg",
            "imdbID": "496243"
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.genres, vec!["Comedy".to_string(), "Thriller".to_string()]);
        assert_eq!(details.rating.as_deref(), Some("8.5"));
        assert_eq!(details.external_id.as_deref(), Some("496243"));
    }

    #[test]
    fn test_display_title_without_year() {
        let details = MovieDetails {
            title: "Untitled".to_string(),
            year: String::new(),
            director: "Unknown".to_string(),
            genres: vec![],
            plot: String::new(),
            rating: None,
            poster_url: None,
            external_id: None,
        };
        assert_eq!(details.display_title(), "Untitled");
    }
}
