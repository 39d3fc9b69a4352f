use cinenote_models::{Language, ReleaseStatus, UpcomingMovie};

pub fn recommendation_prompt(query: &str, language: Language) -> String {
    match language {
        Language::Id => format!(
            r#"Act as a knowledgeable movie friend.
Suggest 3 distinct movies based on this user request: "{query}".

Tone: Conversational, specific, witty, and sharp. Avoid generic phrases like "film ini bagus". Tell me why I need to watch it based on my request.

Return strictly a JSON array. No markdown formatting, no code blocks.
Format: [{{"title": "Movie Title", "year": "YYYY", "plot": "Ringkasan plot singkat (maks 20 kata) dalam Bahasa Indonesia.", "reason": "Reason in Indonesian (Conversational/Daily style). Max 30 words."}}]"#
        ),
        Language::En => format!(
            r#"Act as a witty, cinephile best friend.
Suggest 3 distinct movies based on this user request: "{query}".

Tone: Casual, relaxed, specific. Avoid generic praise. Focus on why it fits the request perfectly.

Return strictly a JSON array. No markdown formatting, no code blocks.
Format: [{{"title": "Movie Title", "year": "YYYY", "plot": "Short plot summary (max 20 words) in English.", "reason": "Reason in casual English. Max 30 words."}}]"#
        ),
    }
}

pub fn upcoming_prompt(today: &str) -> String {
    format!(
        r#"Use Google Search to find the current movie schedule on "21cineplex.com" or "m.21cineplex.com" for today, {today}.

I need exactly 6 movies found on the 21Cineplex website:
1. 3 movies listed as "Now Playing" (Sedang Tayang).
2. 3 movies listed as "Coming Soon" (Akan Tayang) that are scheduled to release within the next month only.

Titles:
- "title": the title shown on the Indonesian website. Indonesian films keep their Indonesian title, Hollywood films use the English title.
- "searchTitle": the English or international title for searching a movie database. Translate Indonesian titles when an international title exists (e.g. "Siksa Kubur" -> "Grave Torture"), otherwise repeat the original. Drop long subtitles.

Dates:
- "year": the global/US release year.
- "releaseDate": the specific release date (e.g. "14 February 2024") if available.

Return strictly a valid JSON array with no commentary and no markdown code blocks.

Format: [{{"title": "Display Title", "searchTitle": "Search Title (EN)", "year": "YYYY", "releaseDate": "DD Month YYYY", "platform": "XXI", "genre": "Genre", "status": "now_playing" or "coming_soon"}}]"#
    )
}

/// Preset moods offered next to the free-text recommendation prompt
pub fn quick_picks(language: Language) -> &'static [&'static str] {
    match language {
        Language::Id => &[
            "Butuh Semangat",
            "Plot Twist Gila",
            "Nangis Bombay",
            "Action Tanpa Mikir",
            "Horor Mencekam",
            "Romantis Tipis-tipis",
            "Sci-Fi Klasik",
            "Misteri Detektif",
        ],
        Language::En => &[
            "Need Motivation",
            "Crazy Plot Twist",
            "Tearjerker",
            "Mindless Action",
            "Terrifying Horror",
            "Subtle Romance",
            "Classic Sci-Fi",
            "Detective Mystery",
        ],
    }
}

fn listing(title: &str, search_title: &str, release_date: &str, genre: &str, status: ReleaseStatus) -> UpcomingMovie {
    UpcomingMovie {
        title: title.to_string(),
        search_title: Some(search_title.to_string()),
        year: Some("2024".to_string()),
        release_date: Some(release_date.to_string()),
        platform: "XXI".to_string(),
        genre: genre.to_string(),
        status,
        poster_url: None,
    }
}

/// Shown when the live schedule cannot be fetched
pub fn fallback_upcoming() -> Vec<UpcomingMovie> {
    vec![
        listing("Dune: Part Two", "Dune Part Two", "28 February 2024", "Sci-Fi", ReleaseStatus::NowPlaying),
        listing("Exhuma", "Exhuma", "28 February 2024", "Horror", ReleaseStatus::NowPlaying),
        listing(
            "Godzilla x Kong: The New Empire",
            "Godzilla x Kong The New Empire",
            "27 March 2024",
            "Action",
            ReleaseStatus::ComingSoon,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_query_and_language() {
        let id = recommendation_prompt("horor lokal", Language::Id);
        assert!(id.contains("\"horor lokal\""));
        assert!(id.contains("Bahasa Indonesia"));

        let en = recommendation_prompt("heist movies", Language::En);
        assert!(en.contains("\"heist movies\""));
        assert!(en.contains("in English"));
    }

    #[test]
    fn test_quick_picks_per_language() {
        assert_eq!(quick_picks(Language::Id).len(), 8);
        assert_eq!(quick_picks(Language::En)[2], "Tearjerker");
    }

    #[test]
    fn test_fallback_listing() {
        let fallback = fallback_upcoming();
        assert_eq!(fallback.len(), 3);
        assert_eq!(fallback[2].status, ReleaseStatus::ComingSoon);
    }
}
