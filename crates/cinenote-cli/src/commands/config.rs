use super::context::AppContext;
use super::prompts;
use crate::output::{styled_table, Output};
use crate::ConfigCommands;
use cinenote_models::Language;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Language { language } => set_language(language, output),
        ConfigCommands::TmdbKey { key } => set_api_key(ApiKey::Tmdb, key, output),
        ConfigCommands::GeminiKey { key } => set_api_key(ApiKey::Gemini, key, output),
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

fn section(table: &mut comfy_table::Table, title: &str) {
    table.add_row(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let config = &ctx.config;
    let tmdb_key = ctx.credentials.resolve_tmdb_api_key().unwrap_or_default();
    let gemini_key = ctx.credentials.resolve_gemini_api_key().unwrap_or_default();
    let shown = |key: &str| if full { key.to_string() } else { mask_string(key) };

    output.json(&json!({
        "configFile": ctx.paths.config_file(),
        "dataDir": ctx.paths.data_dir(),
        "language": config.language.code(),
        "tmdb": {
            "baseUrl": config.tmdb.base_url,
            "apiKey": shown(&tmdb_key),
        },
        "gemini": {
            "baseUrl": config.gemini.base_url,
            "model": config.gemini.model,
            "apiKey": shown(&gemini_key),
        },
        "search": { "debounceMs": config.search.debounce_ms },
        "gamification": {
            "maxRank": config.gamification.max_rank,
            "milestonesFile": config.gamification.milestones_file,
        },
    }));
    if !output.is_human() {
        return Ok(());
    }

    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("Config File").add_attribute(Attribute::Bold),
        Cell::new(ctx.paths.config_file().display().to_string()),
    ]);
    table.add_row(vec![Cell::new("Data"), Cell::new(ctx.paths.data_dir().display().to_string())]);
    table.add_row(vec![Cell::new("Language"), Cell::new(config.language.code())]);

    section(&mut table, "TMDB");
    table.add_row(vec![Cell::new("Base URL"), Cell::new(&config.tmdb.base_url)]);
    table.add_row(vec![Cell::new("API Key"), Cell::new(shown(&tmdb_key))]);

    section(&mut table, "Gemini");
    table.add_row(vec![Cell::new("Model"), Cell::new(&config.gemini.model)]);
    table.add_row(vec![Cell::new("API Key"), Cell::new(shown(&gemini_key))]);

    section(&mut table, "Gamification");
    table.add_row(vec![
        Cell::new("Max rank"),
        Cell::new(format!("{:?}", config.gamification.max_rank).to_lowercase()),
    ]);
    let milestones = config
        .gamification
        .milestones_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    table.add_row(vec![Cell::new("Milestones"), Cell::new(milestones)]);

    output.table(&table);
    Ok(())
}

fn set_language(language: Option<Language>, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load()?;
    let language = language.unwrap_or_else(|| ctx.config.language.toggle());
    ctx.config.language = language;
    ctx.save_config()?;

    let message = match language {
        Language::Id => "Bahasa diganti ke Indonesia",
        Language::En => "Language set to English",
    };
    output.success(message);
    output.json(&json!({ "language": language.code() }));
    Ok(())
}

#[derive(Clone, Copy)]
enum ApiKey {
    Tmdb,
    Gemini,
}

impl ApiKey {
    fn label(self) -> &'static str {
        match self {
            ApiKey::Tmdb => "TMDB",
            ApiKey::Gemini => "Gemini",
        }
    }

    fn env_var(self) -> &'static str {
        match self {
            ApiKey::Tmdb => "TMDB_API_KEY",
            ApiKey::Gemini => "GEMINI_API_KEY",
        }
    }
}

fn set_api_key(which: ApiKey, key: Option<String>, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load()?;
    let key = match key {
        Some(k) => k,
        None => prompts::prompt_password(&format!("{} API key", which.label()))?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("The {} API key cannot be empty", which.label()));
    }

    match which {
        ApiKey::Tmdb => ctx.credentials.set_tmdb_api_key(key),
        ApiKey::Gemini => ctx.credentials.set_gemini_api_key(key),
    }
    ctx.credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success(format!("Saved {} API key", which.label()));
    if std::env::var(which.env_var()).is_ok() {
        output.warn(format!("{} is set and takes precedence over the saved key", which.env_var().bold()));
    }
    Ok(())
}
