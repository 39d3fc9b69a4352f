use super::context::AppContext;
use crate::output::{styled_table, Output};
use cinenote_core::{films_to_next, RankStatus};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use serde_json::json;

const BAR_WIDTH: usize = 24;

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn film_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

pub fn run_stats(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let user = ctx.require_user()?;
    let store = ctx.diary(&user)?;
    let engine = ctx.engine()?;

    let count = film_count(store.len());
    let state = engine.compute(store.reviews());
    let remaining = films_to_next(&state, count);

    output.json(&json!({
        "user": user.username,
        "films": count,
        "state": state,
        "filmsToNext": remaining,
    }));
    if !output.is_human() {
        return Ok(());
    }

    println!();
    println!("{} {}", state.title.bold().bright_cyan(), format!("(level {})", state.level + 1).dimmed());
    println!("{}", state.description.italic());
    println!();
    println!("{} {:.0}%", progress_bar(state.progress).cyan(), state.progress);
    match remaining {
        Some(n) => println!("{} more film{} to reach {}", n.bold(), if n == 1 { "" } else { "s" }, state.next_milestone),
        None => println!("{}", "Every rank unlocked".green()),
    }
    println!();
    println!("Films logged: {}", count.bold());
    if state.streak > 0 {
        println!("Streak: {} day{} in a row", state.streak.bold().yellow(), if state.streak == 1 { "" } else { "s" });
    } else {
        println!("Streak: {}", "log a film today to start one".dimmed());
    }
    Ok(())
}

pub fn run_ranks(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let user = ctx.require_user()?;
    let store = ctx.diary(&user)?;
    let engine = ctx.engine()?;

    let ladder = engine.ladder(film_count(store.len()));
    output.json(&json!({ "films": store.len(), "ranks": ladder }));
    if !output.is_human() {
        return Ok(());
    }

    let mut table = styled_table();
    table.set_header(vec!["Films", "Rank", "Status"]);
    for entry in &ladder {
        let (status, color) = match entry.status {
            RankStatus::Current => ("current", Color::Cyan),
            RankStatus::Unlocked => ("unlocked", Color::Green),
            RankStatus::Locked => ("locked", Color::DarkGrey),
        };
        let mut title = Cell::new(&entry.milestone.title).fg(color);
        if entry.status == RankStatus::Current {
            title = title.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(entry.milestone.threshold),
            title,
            Cell::new(status).fg(color),
        ]);
    }
    output.table(&table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(100.0), "█".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(50.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_film_count_saturates() {
        assert_eq!(film_count(0), 0);
        assert_eq!(film_count(250), 250);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(film_count(u32::MAX as usize + 5), u32::MAX);
    }
}
