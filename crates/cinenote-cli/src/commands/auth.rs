use super::context::AppContext;
use super::prompts;
use crate::output::{styled_table, Output};
use crate::ProfilesCommands;
use cinenote_core::AccountError;
use cinenote_models::User;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use serde_json::json;

fn username_or_prompt(username: Option<String>) -> Result<String> {
    match username {
        Some(name) => Ok(name),
        None => prompts::prompt_string("Username", None),
    }
}

/// User-facing wording for credential problems; anything else keeps its own report
fn credential_failure(e: AccountError) -> color_eyre::Report {
    match e {
        AccountError::InvalidCredentials => eyre!("Wrong username or password."),
        AccountError::UsernameTaken => eyre!("That username is already taken."),
        AccountError::MissingField(field) => eyre!("The {} is required.", field),
        other => other.into(),
    }
}

fn user_json(user: &User) -> serde_json::Value {
    json!({ "id": user.id, "username": user.username })
}

pub fn run_signup(username: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let username = username_or_prompt(username)?;
    let password = prompts::prompt_new_password("Password")?;

    let user = ctx
        .accounts()
        .signup(&username, &password)
        .map_err(credential_failure)?;

    output.success(format!("Welcome to CineNote, {}!", user.username.bold()));
    output.json(&json!({ "type": "signup", "user": user_json(&user) }));
    Ok(())
}

pub fn run_login(username: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let username = username_or_prompt(username)?;
    let password = prompts::prompt_password("Password")?;

    let user = ctx
        .accounts()
        .login(&username, &password)
        .map_err(credential_failure)?;

    output.success(format!("Logged in as {}", user.username.bold()));
    output.json(&json!({ "type": "login", "user": user_json(&user) }));
    Ok(())
}

pub fn run_switch(username: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let accounts = ctx.accounts();
    let saved = accounts.list_saved()?;

    if saved.is_empty() {
        output.warn("No saved profiles yet. Log in once with `cinenote login` to save one.");
        return Ok(());
    }

    let user = match username {
        Some(name) => saved
            .iter()
            .find(|u| u.username == name)
            .cloned()
            .ok_or_else(|| eyre!("No saved profile named {}", name))?,
        None => {
            let names: Vec<&str> = saved.iter().map(|u| u.username.as_str()).collect();
            let current = accounts.current_user()?;
            let default = current
                .and_then(|c| saved.iter().position(|u| u.id == c.id))
                .unwrap_or(0);
            let index = prompts::prompt_select("Who's watching?", &names, default)?;
            saved[index].clone()
        }
    };

    let user = accounts.quick_login(&user)?;
    output.success(format!("Switched to {}", user.username.bold()));
    output.json(&json!({ "type": "switch", "user": user_json(&user) }));
    Ok(())
}

pub fn run_logout(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.accounts().logout()?;
    output.success("Logged out");
    Ok(())
}

pub fn run_whoami(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    match ctx.accounts().current_user()? {
        Some(user) => {
            output.info(format!("{} ({})", user.username.bold(), user.id.dimmed()));
            output.json(&json!({ "user": user_json(&user) }));
        }
        None => {
            output.info("Not logged in");
            output.json(&json!({ "user": null }));
        }
    }
    Ok(())
}

pub fn run_profiles(cmd: ProfilesCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let accounts = ctx.accounts();

    match cmd {
        ProfilesCommands::List => {
            let saved = accounts.list_saved()?;
            let current = accounts.current_user()?;

            if output.is_human() {
                if saved.is_empty() {
                    output.info("No saved profiles");
                } else {
                    let mut table = styled_table();
                    table.set_header(vec![Cell::new("Profile"), Cell::new("Active")]);
                    for user in &saved {
                        let active = current.as_ref().is_some_and(|c| c.id == user.id);
                        table.add_row(vec![
                            Cell::new(&user.username),
                            Cell::new(if active { "✓".green().to_string() } else { String::new() }),
                        ]);
                    }
                    output.table(&table);
                }
            }
            output.json(&json!({
                "profiles": saved.iter().map(user_json).collect::<Vec<_>>(),
                "current": current.as_ref().map(|u| u.id.clone()),
            }));
        }
        ProfilesCommands::Forget { username } => {
            let saved = accounts.list_saved()?;
            let Some(user) = saved.iter().find(|u| u.username == username) else {
                output.warn(format!("{} is not a saved profile", username));
                return Ok(());
            };
            accounts.forget(&user.id)?;
            output.success(format!("Removed {} from saved profiles", username));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinenote_core::StorageError;

    #[test]
    fn test_credential_failure_wording() {
        assert_eq!(credential_failure(AccountError::InvalidCredentials).to_string(), "Wrong username or password.");
        assert_eq!(credential_failure(AccountError::UsernameTaken).to_string(), "That username is already taken.");
        assert_eq!(credential_failure(AccountError::MissingField("password")).to_string(), "The password is required.");
    }

    #[test]
    fn test_storage_failure_keeps_its_report() {
        let e = AccountError::from(StorageError::InvalidKey("bad key".to_string()));
        let report = credential_failure(e);
        assert!(report.downcast_ref::<AccountError>().is_some());
    }
}
