use crate::traits::MovieMetadata;
use cinenote_models::MovieSearchResult;
use tracing::{debug, warn};

fn first_poster(results: &[MovieSearchResult]) -> Option<String> {
    results
        .iter()
        .filter_map(|r| r.poster_url.as_deref())
        .find(|url| url.starts_with("http"))
        .map(str::to_string)
}

/// Title with any subtitle after `:`, `|` or `-` dropped
fn main_title(title: &str) -> Option<&str> {
    if !title.contains([':', '|', '-']) {
        return None;
    }
    let head = title.split([':', '|', '-']).next()?.trim();
    (head.chars().count() > 2).then_some(head)
}

async fn try_search(metadata: &dyn MovieMetadata, title: &str, year: Option<&str>) -> Option<String> {
    match metadata.search(title, year).await {
        Ok(results) => first_poster(&results),
        Err(e) => {
            warn!("Poster search for {} failed: {}", title, e);
            None
        }
    }
}

/// Best poster for a listing title.
///
/// Tries the international search title, then the local display title, then
/// the search title with its subtitle removed. Only absolute `http` URLs count.
pub async fn find_poster(
    metadata: &dyn MovieMetadata,
    search_title: &str,
    display_title: &str,
    year: Option<&str>,
) -> Option<String> {
    let search_title = search_title.trim();
    let display_title = display_title.trim();

    if !search_title.is_empty() {
        if let Some(poster) = try_search(metadata, search_title, year).await {
            return Some(poster);
        }
    }

    if !display_title.is_empty() && display_title != search_title {
        if let Some(poster) = try_search(metadata, display_title, year).await {
            return Some(poster);
        }
    }

    if let Some(head) = main_title(search_title) {
        if let Some(poster) = try_search(metadata, head, year).await {
            return Some(poster);
        }
    }

    debug!("No poster found for {}", search_title);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use async_trait::async_trait;
    use cinenote_models::MovieDetails;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers searches from a fixed table and records every query
    struct FakeMetadata {
        posters: HashMap<String, Option<String>>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeMetadata {
        fn new(entries: &[(&str, Option<&str>)]) -> Self {
            Self {
                posters: entries
                    .iter()
                    .map(|(title, poster)| (title.to_string(), poster.map(str::to_string)))
                    .collect(),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MovieMetadata for FakeMetadata {
        async fn search(&self, query: &str, _year_hint: Option<&str>) -> Result<Vec<MovieSearchResult>, MetadataError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self
                .posters
                .get(query)
                .map(|poster| {
                    vec![MovieSearchResult {
                        title: query.to_string(),
                        year: String::new(),
                        poster_url: poster.clone(),
                        external_id: None,
                    }]
                })
                .unwrap_or_default())
        }

        async fn get_details(&self, id: &str) -> Result<MovieDetails, MetadataError> {
            Err(MetadataError::NotFound(id.to_string()))
        }
    }

    #[test]
    fn test_main_title() {
        assert_eq!(main_title("Godzilla x Kong: The New Empire"), Some("Godzilla x Kong"));
        assert_eq!(main_title("Kuasa Gelap | Director's Cut"), Some("Kuasa Gelap"));
        assert_eq!(main_title("Up - Extended"), None);
        assert_eq!(main_title("Exhuma"), None);
    }

    #[tokio::test]
    async fn test_search_title_wins() {
        let fake = FakeMetadata::new(&[("Grave Torture", Some("https://img/grave.jpg"))]);
        let poster = find_poster(&fake, "Grave Torture", "Siksa Kubur", Some("2024")).await;
        assert_eq!(poster.as_deref(), Some("https://img/grave.jpg"));
        assert_eq!(fake.queries(), vec!["Grave Torture"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_display_then_main_title() {
        let fake = FakeMetadata::new(&[("Siksa Kubur", Some("https://img/siksa.jpg"))]);
        let poster = find_poster(&fake, "Grave Torture", "Siksa Kubur", None).await;
        assert_eq!(poster.as_deref(), Some("https://img/siksa.jpg"));

        let fake = FakeMetadata::new(&[("Godzilla x Kong", Some("https://img/gxk.jpg"))]);
        let poster = find_poster(&fake, "Godzilla x Kong: The New Empire", "Godzilla x Kong: The New Empire", None).await;
        assert_eq!(poster.as_deref(), Some("https://img/gxk.jpg"));
        // Display title equals search title, so it is not searched twice
        assert_eq!(fake.queries(), vec!["Godzilla x Kong: The New Empire", "Godzilla x Kong"]);
    }

    #[tokio::test]
    async fn test_relative_posters_are_rejected() {
        let fake = FakeMetadata::new(&[("Exhuma", Some("N/A")), ("Pamali", None)]);
        assert!(find_poster(&fake, "Exhuma", "Pamali", None).await.is_none());
    }
}
