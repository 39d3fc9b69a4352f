use super::context::AppContext;
use super::prompts;
use super::spinner::with_spinner;
use crate::output::{styled_table, Output};
use cinenote_models::{Language, ReleaseStatus};
use cinenote_sources::{
    enrich_recommendations, enrich_upcoming, quick_picks, MovieMetadata, Recommender, SearchOutcome, SearchSession,
};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Color};
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub async fn run_search(query: &str, year: Option<&str>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let Some(tmdb) = ctx.tmdb_or_warn(output) else {
        output.json(&json!({ "results": [] }));
        return Ok(());
    };

    let session = SearchSession::new(Arc::new(tmdb), Duration::from_millis(ctx.config.search.debounce_ms));
    let results = match with_spinner("Searching...", session.submit(query, year)).await {
        SearchOutcome::Results(results) => results,
        SearchOutcome::Failed(e) => {
            output.warn(format!("Search failed, try again in a moment: {}", e));
            Vec::new()
        }
        SearchOutcome::Superseded => Vec::new(),
    };

    output.json(&json!({ "query": query, "results": results }));
    if !output.is_human() {
        return Ok(());
    }
    if results.is_empty() {
        output.info(format!("Nothing found for {}", query));
        return Ok(());
    }

    let mut table = styled_table();
    table.set_header(vec!["#", "Title", "Year", "TMDB id"]);
    for (index, result) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&result.title),
            Cell::new(&result.year),
            Cell::new(result.external_id.as_deref().unwrap_or("-")),
        ]);
    }
    output.table(&table);
    output.info(format!("Add one with `cinenote add \"{}\" --pick <#>`", query).dimmed().to_string());
    Ok(())
}

pub async fn run_recommend(query: Option<String>, language: Option<Language>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let language = language.unwrap_or(ctx.config.language);
    let picks = quick_picks(language);

    let query = match query {
        Some(q) if !q.trim().is_empty() => q,
        _ if prompts::is_interactive() => {
            let mut options: Vec<&str> = picks.to_vec();
            options.push("Something else...");
            let index = prompts::prompt_select("What are you in the mood for?", &options, 0)?;
            match picks.get(index) {
                Some(pick) => pick.to_string(),
                None => prompts::prompt_string("Describe it", None)?,
            }
        }
        _ => {
            output.info(format!("Try one of: {}", picks.join(", ")));
            output.json(&json!({ "quickPicks": picks }));
            return Ok(());
        }
    };
    if query.trim().is_empty() {
        return Err(eyre!("Tell me what you're in the mood for"));
    }

    let gemini = ctx.gemini();
    if !gemini.has_api_key() {
        output.warn("No Gemini API key configured. Run `cinenote config gemini-key` or set GEMINI_API_KEY.");
    }
    let recs = with_spinner("Asking for suggestions...", gemini.recommend(&query, language)).await;
    let recs = match ctx.tmdb() {
        tmdb if tmdb.has_api_key() && !recs.is_empty() => {
            with_spinner("Finding posters...", enrich_recommendations(&tmdb, recs)).await
        }
        _ => recs,
    };

    output.json(&json!({ "query": query, "language": language.code(), "recommendations": recs }));
    if !output.is_human() {
        return Ok(());
    }
    if recs.is_empty() {
        output.warn("No suggestions right now. Try again in a bit.");
        return Ok(());
    }

    for rec in &recs {
        println!();
        let year = if rec.year.is_empty() { String::new() } else { format!(" ({})", rec.year) };
        println!("{}{}", rec.title.bold().bright_cyan(), year.dimmed());
        if !rec.plot.is_empty() {
            println!("  {}", rec.plot);
        }
        if !rec.reason.is_empty() {
            println!("  {} {}", "→".yellow(), rec.reason.italic());
        }
        if let Some(id) = &rec.external_id {
            println!("  {}", format!("TMDB {}", id).dimmed());
        }
    }
    Ok(())
}

pub async fn run_upcoming(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let gemini = ctx.gemini();
    if !gemini.has_api_key() {
        output.warn("No Gemini API key configured; showing a sample listing.");
    }

    let movies = with_spinner("Checking cinema listings...", gemini.upcoming()).await;
    let tmdb = ctx.tmdb();
    let movies = if tmdb.has_api_key() {
        let metadata: &dyn MovieMetadata = &tmdb;
        with_spinner("Finding posters...", enrich_upcoming(metadata, movies)).await
    } else {
        movies
    };

    output.json(&json!({ "movies": movies }));
    if !output.is_human() {
        return Ok(());
    }

    let mut table = styled_table();
    table.set_header(vec!["Status", "Title", "Genre", "Release", "Where"]);
    for movie in &movies {
        let (status, color) = match movie.status {
            ReleaseStatus::NowPlaying => ("Now playing", Color::Green),
            ReleaseStatus::ComingSoon => ("Coming soon", Color::Yellow),
        };
        let release = movie
            .release_date
            .clone()
            .or_else(|| movie.year.clone())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(status).fg(color),
            Cell::new(&movie.title),
            Cell::new(&movie.genre),
            Cell::new(release),
            Cell::new(&movie.platform),
        ]);
    }
    output.table(&table);
    Ok(())
}
