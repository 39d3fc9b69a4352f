use serde::{Deserialize, Serialize};

/// AI suggestion, optionally enriched with a poster from the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecommendation {
    pub title: String,
    #[serde(default, deserialize_with = "year_as_text")]
    pub year: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, alias = "imdbID", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// Cinema listing entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMovie {
    /// Title as shown locally
    pub title: String,
    /// International title that searches better against the metadata provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_title: Option<String>,
    #[serde(default, deserialize_with = "optional_year_as_text", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub genre: String,
    pub status: ReleaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    NowPlaying,
    ComingSoon,
}

// Model output sometimes carries the year as a number instead of a string
fn year_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn optional_year_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let year = year_as_text(deserializer)?;
    Ok(if year.is_empty() { None } else { Some(year) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_numeric_year() {
        let json = r#"[{"title": "Heat", "year": 1995, "plot": "Cops and robbers.", "reason": "Because."}]"#;
        let recs: Vec<MovieRecommendation> = serde_json::from_str(json).unwrap();
        assert_eq!(recs[0].year, "1995");
        assert!(recs[0].poster_url.is_none());
    }

    #[test]
    fn test_upcoming_status() {
        let json = r#"{"title": "Siksa Kubur", "searchTitle": "Grave Torture", "year": "2024", "platform": "XXI", "genre": "Horror", "status": "coming_soon"}"#;
        let movie: UpcomingMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.status, ReleaseStatus::ComingSoon);
        assert_eq!(movie.search_title.as_deref(), Some("Grave Torture"));
        assert_eq!(movie.year.as_deref(), Some("2024"));
    }
}
