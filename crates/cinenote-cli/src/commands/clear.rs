use super::context::AppContext;
use super::prompts;
use crate::output::Output;
use cinenote_core::FileStore;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs;

pub fn run_clear(all: bool, session: bool, credentials: bool, yes: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    if all {
        if !yes && prompts::is_interactive() {
            let confirmed = prompts::prompt_yes_no(
                "Delete every account, diary and stored API key on this machine?",
                Some(false),
            )?;
            if !confirmed {
                output.info("Nothing cleared");
                return Ok(());
            }
        }
        clear_store(&ctx, output)?;
        clear_credentials(&ctx, output)?;
        output.success("All local data cleared");
        return Ok(());
    }

    let mut cleared_anything = false;

    if session {
        ctx.accounts().logout()?;
        output.success("Session cleared");
        cleared_anything = true;
    }

    if credentials {
        clear_credentials(&ctx, output)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --session, --credentials, or --all");
        output.info("\nExample: cinenote clear --session");
    }

    Ok(())
}

fn clear_store(ctx: &AppContext, output: &Output) -> Result<()> {
    let store_dir = ctx.paths.store_dir();
    if !store_dir.exists() {
        output.info("No local data found to clear");
        return Ok(());
    }
    FileStore::new(store_dir.clone())?.clear()?;
    output.success(format!("Cleared accounts and diaries: {}", store_dir.display()));
    Ok(())
}

fn clear_credentials(ctx: &AppContext, output: &Output) -> Result<()> {
    let credentials_file = ctx.paths.credentials_file();

    if credentials_file.exists() {
        fs::remove_file(&credentials_file).map_err(|e| {
            eyre!("Failed to remove credentials file at {}: {}", credentials_file.display(), e)
        })?;
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }
    Ok(())
}
