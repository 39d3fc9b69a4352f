use crate::poster::find_poster;
use crate::traits::MovieMetadata;
use cinenote_models::{MovieRecommendation, UpcomingMovie};
use futures::future::join_all;
use tracing::{debug, warn};

async fn enrich_one(metadata: &dyn MovieMetadata, mut rec: MovieRecommendation) -> MovieRecommendation {
    let results = match metadata.search(&rec.title, None).await {
        Ok(results) => results,
        Err(e) => {
            warn!("Could not look up {}: {}", rec.title, e);
            return rec;
        }
    };

    let wanted = rec.title.to_lowercase();
    let best = results
        .iter()
        .find(|r| r.title.to_lowercase() == wanted)
        .or_else(|| results.first());

    match best {
        Some(found) => {
            debug!("Matched recommendation {} to {:?}", rec.title, found.external_id);
            rec.poster_url = found.poster_url.clone();
            rec.external_id = found.external_id.clone();
        }
        None => debug!("No metadata match for {}", rec.title),
    }
    rec
}

/// Attach posters and ids to AI suggestions, looking all of them up concurrently.
///
/// Prefers a case-insensitive exact title match, else the top search hit.
/// A failed lookup leaves that suggestion as it was.
pub async fn enrich_recommendations(
    metadata: &dyn MovieMetadata,
    recs: Vec<MovieRecommendation>,
) -> Vec<MovieRecommendation> {
    join_all(recs.into_iter().map(|rec| enrich_one(metadata, rec))).await
}

/// Attach posters to cinema listings concurrently
pub async fn enrich_upcoming(metadata: &dyn MovieMetadata, movies: Vec<UpcomingMovie>) -> Vec<UpcomingMovie> {
    join_all(movies.into_iter().map(|mut movie| async move {
        let search_title = movie.search_title.clone().unwrap_or_else(|| movie.title.clone());
        movie.poster_url = find_poster(metadata, &search_title, &movie.title, movie.year.as_deref()).await;
        movie
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use async_trait::async_trait;
    use cinenote_models::{MovieDetails, MovieSearchResult, ReleaseStatus};

    struct FakeMetadata;

    fn hit(title: &str, id: &str) -> MovieSearchResult {
        MovieSearchResult {
            title: title.to_string(),
            year: "2000".to_string(),
            poster_url: Some(format!("https://img/{}.jpg", id)),
            external_id: Some(id.to_string()),
        }
    }

    #[async_trait]
    impl MovieMetadata for FakeMetadata {
        async fn search(&self, query: &str, _year_hint: Option<&str>) -> Result<Vec<MovieSearchResult>, MetadataError> {
            match query {
                "heat" => Ok(vec![hit("Heat Wave", "1"), hit("HEAT", "2")]),
                "Ronin" => Ok(vec![hit("Ronin 2", "3")]),
                "Broken" => Err(MetadataError::Fetch("boom".to_string())),
                "Grave Torture" => Ok(vec![hit("Grave Torture", "4")]),
                _ => Ok(Vec::new()),
            }
        }

        async fn get_details(&self, id: &str) -> Result<MovieDetails, MetadataError> {
            Err(MetadataError::NotFound(id.to_string()))
        }
    }

    fn rec(title: &str) -> MovieRecommendation {
        MovieRecommendation {
            title: title.to_string(),
            year: String::new(),
            plot: String::new(),
            reason: String::new(),
            poster_url: None,
            external_id: None,
        }
    }

    #[tokio::test]
    async fn test_enrich_recommendations() {
        let recs = vec![rec("heat"), rec("Ronin"), rec("Broken"), rec("Nothing")];
        let enriched = enrich_recommendations(&FakeMetadata, recs).await;

        // Order is preserved
        let titles: Vec<_> = enriched.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["heat", "Ronin", "Broken", "Nothing"]);

        assert_eq!(enriched[0].external_id.as_deref(), Some("2"));
        assert_eq!(enriched[1].external_id.as_deref(), Some("3"));
        assert_eq!(enriched[1].poster_url.as_deref(), Some("https://img/3.jpg"));
        assert!(enriched[2].external_id.is_none());
        assert!(enriched[3].poster_url.is_none());
    }

    #[tokio::test]
    async fn test_enrich_upcoming_uses_search_title() {
        let movies = vec![UpcomingMovie {
            title: "Siksa Kubur".to_string(),
            search_title: Some("Grave Torture".to_string()),
            year: Some("2024".to_string()),
            release_date: None,
            platform: "XXI".to_string(),
            genre: "Horror".to_string(),
            status: ReleaseStatus::NowPlaying,
            poster_url: None,
        }];
        let enriched = enrich_upcoming(&FakeMetadata, movies).await;
        assert_eq!(enriched[0].poster_url.as_deref(), Some("https://img/4.jpg"));
    }
}
