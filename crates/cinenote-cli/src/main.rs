use clap::{ArgAction, Parser, Subcommand};
use cinenote_config::PathManager;
use cinenote_models::{Language, SortOrder};
use commands::{auth, clear, config, discover, review, stats};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinenote")]
#[command(about = "CineNote - a movie diary that ranks you up as you watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to the daily-rotated file in the log directory instead of stderr
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a local account and log in
    Signup {
        #[arg(long)]
        username: Option<String>,
    },
    /// Log in with username and password
    Login {
        #[arg(long)]
        username: Option<String>,
    },
    /// Switch to a saved profile without a password
    Switch {
        /// Username of a saved profile (prompts when omitted)
        username: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Manage saved profiles
    Profiles {
        #[command(subcommand)]
        cmd: Option<ProfilesCommands>,
    },
    /// Log a film to the diary
    #[command(long_about = "Search for a film and add it to your diary with a 1-5 star rating and a short review. Use --watched to log it without writing anything.")]
    Add {
        /// Title to search for
        query: Option<String>,

        /// Release year hint for the search
        #[arg(long)]
        year: Option<String>,

        /// Pick the Nth search result (1-based) instead of choosing interactively
        #[arg(long)]
        pick: Option<usize>,

        /// Star rating, 1-5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        /// Review text
        #[arg(long, conflicts_with = "watched")]
        review: Option<String>,

        /// Log as watched with no review text
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,
    },
    /// Change the rating or text of a diary entry
    Edit {
        /// Review id (a unique prefix is enough)
        id: String,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        #[arg(long)]
        review: Option<String>,

        /// Re-fetch the film's details from TMDB
        #[arg(long, action = ArgAction::SetTrue)]
        refresh: bool,
    },
    /// Remove a diary entry
    Delete {
        /// Review id (a unique prefix is enough)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// List the diary
    List {
        #[arg(long, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
    },
    /// Rank, progress and watch streak
    Stats,
    /// All ranks and which are unlocked
    Ranks,
    /// Search the movie database
    Search {
        query: String,

        #[arg(long)]
        year: Option<String>,
    },
    /// Ask for AI film suggestions
    #[command(long_about = "Describe a mood or a request and get three film suggestions. Without a query you can choose one of the quick picks.")]
    Recommend {
        query: Option<String>,

        /// Answer in this language instead of the configured one
        #[arg(long)]
        language: Option<Language>,
    },
    /// What is playing and coming soon in cinemas
    Upcoming,
    /// Show or change settings
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear the session, stored API keys or all local data
    Clear {
        /// Remove all diaries, accounts and credentials
        #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["session", "credentials"])]
        all: bool,

        /// Log out without touching any data
        #[arg(long, action = ArgAction::SetTrue)]
        session: bool,

        /// Remove stored API keys
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfilesCommands {
    /// List saved profiles
    List,
    /// Remove a profile from the quick-switch list (the account is kept)
    Forget { username: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (API keys are masked)
    Show {
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Set the interface language, or toggle it when omitted
    Language { language: Option<Language> },
    /// Store the TMDB API key (prompts when omitted)
    TmdbKey { key: Option<String> },
    /// Store the Gemini API key (prompts when omitted)
    GeminiKey { key: Option<String> },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli.log_file.then(|| PathManager::default().log_file());
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Signup { username } => auth::run_signup(username, &output),
        Commands::Login { username } => auth::run_login(username, &output),
        Commands::Switch { username } => auth::run_switch(username, &output),
        Commands::Logout => auth::run_logout(&output),
        Commands::Whoami => auth::run_whoami(&output),
        Commands::Profiles { cmd } => auth::run_profiles(cmd.unwrap_or(ProfilesCommands::List), &output),
        Commands::Add {
            query,
            year,
            pick,
            rating,
            review,
            watched,
        } => {
            let args = review::AddArgs {
                query,
                year,
                pick,
                rating,
                review,
                watched,
            };
            review::run_add(args, &output).await
        }
        Commands::Edit {
            id,
            rating,
            review,
            refresh,
        } => review::run_edit(&id, rating, review, refresh, &output).await,
        Commands::Delete { id, yes } => review::run_delete(&id, yes, &output),
        Commands::List { sort } => review::run_list(sort, &output),
        Commands::Stats => stats::run_stats(&output),
        Commands::Ranks => stats::run_ranks(&output),
        Commands::Search { query, year } => discover::run_search(&query, year.as_deref(), &output).await,
        Commands::Recommend { query, language } => discover::run_recommend(query, language, &output).await,
        Commands::Upcoming => discover::run_upcoming(&output).await,
        Commands::Config { cmd } => config::run_config(cmd.unwrap_or(ConfigCommands::Show { full: false }), &output),
        Commands::Clear {
            all,
            session,
            credentials,
            yes,
        } => clear::run_clear(all, session, credentials, yes, &output),
    }
}
