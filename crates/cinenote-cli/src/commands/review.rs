use super::context::AppContext;
use super::prompts;
use super::spinner::with_spinner;
use crate::output::{styled_table, Output};
use chrono::Local;
use cinenote_core::{GamificationEngine, ReviewDraft, ReviewError, ReviewStore};
use cinenote_models::{ColorVariant, MovieSearchResult, Review, SortOrder, StarRating};
use cinenote_sources::{MovieMetadata, SearchOutcome, SearchSession};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Color};
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub struct AddArgs {
    pub query: Option<String>,
    pub year: Option<String>,
    pub pick: Option<usize>,
    pub rating: Option<u8>,
    pub review: Option<String>,
    pub watched: bool,
}

const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

pub fn variant_color(variant: ColorVariant) -> Color {
    match variant {
        ColorVariant::Blue => Color::Blue,
        ColorVariant::Cyan => Color::Cyan,
        ColorVariant::Sky => Color::DarkCyan,
        ColorVariant::Indigo => Color::Magenta,
    }
}

fn format_date(review: &Review) -> String {
    review.created_at_utc().with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

/// Full id, or a prefix matching exactly one review
fn resolve_review<'a>(store: &'a ReviewStore, id: &str) -> Result<&'a Review> {
    if let Some(review) = store.get(id) {
        return Ok(review);
    }
    match store.find_by_prefix(id).as_slice() {
        [review] => Ok(*review),
        [] => Err(eyre!("No review with id {}", id)),
        many => Err(eyre!("Id {} is ambiguous ({} reviews match); use more characters", id, many.len())),
    }
}

fn search_label(result: &MovieSearchResult) -> String {
    if result.year.is_empty() {
        result.title.clone()
    } else {
        format!("{} ({})", result.title, result.year)
    }
}

/// Search until the user picks a film. `None` when they give up.
async fn choose_film(
    session: &SearchSession,
    mut query: String,
    year: Option<&str>,
    pick: Option<usize>,
    output: &Output,
) -> Result<Option<MovieSearchResult>> {
    loop {
        let outcome = with_spinner(&format!("Searching for {}...", query), session.submit(&query, year)).await;
        let results = match outcome {
            SearchOutcome::Results(results) => results,
            SearchOutcome::Failed(e) => return Err(eyre!("Movie search failed, please try again: {}", e)),
            SearchOutcome::Superseded => continue,
        };

        if let Some(n) = pick {
            return Ok(n.checked_sub(1).and_then(|i| results.get(i)).cloned().or_else(|| {
                output.warn(format!("Result #{} does not exist for {}", n, query));
                None
            }));
        }

        if results.is_empty() {
            output.warn(format!("Nothing found for {}", query));
        } else if !prompts::is_interactive() {
            return Ok(results.into_iter().next());
        } else {
            let mut labels: Vec<String> = results.iter().take(10).map(search_label).collect();
            labels.push("Search again".dimmed().to_string());
            let index = prompts::prompt_select("Which film?", &labels, 0)?;
            if let Some(found) = results.get(index).filter(|_| index < labels.len() - 1) {
                return Ok(Some(found.clone()));
            }
        }

        if !prompts::is_interactive() {
            return Ok(None);
        }
        query = prompts::prompt_string("Title", None)?;
        if query.trim().is_empty() {
            return Ok(None);
        }
    }
}

fn rank_up_message(engine: &GamificationEngine, before: &[Review], after: &[Review], output: &Output) {
    let old = engine.compute(before);
    let new = engine.compute(after);
    if new.level > old.level {
        output.success(format!("Rank up! You are now a {}", new.title.bold().yellow()));
        output.info(format!("  {}", new.description.italic()));
    }
}

pub async fn run_add(args: AddArgs, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let user = ctx.require_user()?;
    let mut store = ctx.diary(&user)?;
    let engine = ctx.engine()?;

    let Some(tmdb) = ctx.tmdb_or_warn(output) else {
        return Err(eyre!("Adding a film needs movie details from TMDB"));
    };
    let metadata: Arc<dyn MovieMetadata> = Arc::new(tmdb);

    let query = match args.query {
        Some(q) => q,
        None => prompts::prompt_string("Title", None)?,
    };
    if query.trim().is_empty() {
        return Err(eyre!("A title is required"));
    }

    // One search per submission here, so no debounce
    let session = SearchSession::new(metadata.clone(), Duration::ZERO);
    let Some(choice) = choose_film(&session, query, args.year.as_deref(), args.pick, output).await? else {
        output.info("Nothing added");
        return Ok(());
    };

    let external_id = choice
        .external_id
        .clone()
        .ok_or_else(|| eyre!("{} has no id to look up", choice.title))?;
    let details = with_spinner("Loading details...", metadata.get_details(&external_id))
        .await
        .map_err(|e| eyre!("Could not load details for {}, please try again: {}", choice.title, e))?;

    let rating = match args.rating {
        Some(value) => value,
        None if prompts::is_interactive() => prompts::prompt_rating(3)?,
        None => StarRating::default().value(),
    };
    let rating = StarRating::new(rating).map_err(ReviewError::from)?;

    let (content, just_watched) = if args.watched {
        (String::new(), true)
    } else if let Some(text) = args.review {
        (text, false)
    } else if prompts::is_interactive() {
        let text = prompts::prompt_string("Review (leave empty to just log it)", None)?;
        let just_watched = text.trim().is_empty();
        (text, just_watched)
    } else {
        return Err(eyre!("Write a review with --review or use --watched"));
    };

    let before = store.reviews().to_vec();
    let draft = ReviewDraft {
        details,
        rating,
        content,
        just_watched,
    };
    let review = store.add(draft)?.clone();

    output.success(format!(
        "Added {} {} [{}]",
        review.movie_details.display_title().bold(),
        review.user_rating.stars().yellow(),
        short_id(&review.id)
    ));
    output.json(&json!({ "type": "added", "review": review }));
    if output.is_human() {
        rank_up_message(&engine, &before, store.reviews(), output);
    }
    Ok(())
}

pub async fn run_edit(
    id: &str,
    rating: Option<u8>,
    review_text: Option<String>,
    refresh: bool,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    let user = ctx.require_user()?;
    let mut store = ctx.diary(&user)?;
    let existing = resolve_review(&store, id)?.clone();

    let mut details = existing.movie_details.clone();
    if refresh {
        let external_id = details
            .external_id
            .clone()
            .ok_or_else(|| eyre!("This entry has no movie id to refresh from"))?;
        let Some(tmdb) = ctx.tmdb_or_warn(output) else {
            return Err(eyre!("Refreshing needs a TMDB API key"));
        };
        details = with_spinner("Refreshing details...", tmdb.get_details(&external_id))
            .await
            .map_err(|e| eyre!("Could not refresh details, please try again: {}", e))?;
    }

    let interactive = prompts::is_interactive() && rating.is_none() && review_text.is_none() && !refresh;
    let rating = match rating {
        Some(value) => value,
        None if interactive => prompts::prompt_rating(existing.user_rating.value())?,
        None => existing.user_rating.value(),
    };
    let content = match review_text {
        Some(text) => text,
        None if interactive => prompts::prompt_string("Review", Some(&existing.content))?,
        None => existing.content.clone(),
    };
    let rating = StarRating::new(rating).map_err(ReviewError::from)?;

    if store.update(&existing.id, details, rating, content)? {
        output.success(format!("Updated {}", existing.movie_details.display_title().bold()));
        if let Some(updated) = store.get(&existing.id) {
            output.json(&json!({ "type": "updated", "review": updated }));
        }
    }
    Ok(())
}

pub fn run_delete(id: &str, yes: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let user = ctx.require_user()?;
    let mut store = ctx.diary(&user)?;
    let existing = resolve_review(&store, id)?.clone();
    let title = existing.movie_details.display_title();

    if !yes && prompts::is_interactive() {
        let confirmed = prompts::prompt_yes_no(&format!("Delete your entry for {}?", title), Some(false))?;
        if !confirmed {
            output.info("Kept it");
            return Ok(());
        }
    }

    if store.remove(&existing.id)? {
        output.success(format!("Deleted {}", title.bold()));
        output.json(&json!({ "type": "deleted", "id": existing.id }));
    }
    Ok(())
}

pub fn run_list(sort: SortOrder, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let user = ctx.require_user()?;
    let store = ctx.diary(&user)?;
    let reviews = store.sorted(sort);

    output.json(&json!({ "sort": sort.to_string(), "reviews": reviews }));
    if !output.is_human() {
        return Ok(());
    }

    if reviews.is_empty() {
        output.info("Your diary is empty. Add a film with `cinenote add <title>`.");
        return Ok(());
    }

    let mut table = styled_table();
    table.set_header(vec!["Id", "Film", "Rating", "Date", "Review"]);
    for review in &reviews {
        let text = if review.is_watched_only() {
            "(watched)".to_string()
        } else {
            excerpt(&review.content, 60)
        };
        table.add_row(vec![
            Cell::new(short_id(&review.id)).fg(variant_color(review.color_variant)),
            Cell::new(review.movie_details.display_title()),
            Cell::new(review.user_rating.stars()).fg(Color::Yellow),
            Cell::new(format_date(review)),
            Cell::new(text),
        ]);
    }
    output.table(&table);
    output.info(format!("{} films, {}", reviews.len(), sort));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0f3c2a9e-1111-2222"), "0f3c2a9e");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("a long review text", 6), "a long…");
    }
}
