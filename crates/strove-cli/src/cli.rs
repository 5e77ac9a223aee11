//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{ai, auth, navigate, status, theme};

/// Strove client: session, navigation and AI assistant from the terminal.
#[derive(Parser, Debug)]
#[command(name = "strove")]
#[command(author, version = env!("STROVE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Strove API base URL
    #[arg(long, env = "STROVE_API_BASE_URL", global = true)]
    pub api_url: Option<String>,

    /// Storage file holding the session and preferences
    #[arg(long, env = "STROVE_STORAGE", global = true)]
    pub storage: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with a username or email
    Login(auth::LoginArgs),

    /// Create an account and sign in to it
    Register(auth::RegisterArgs),

    /// Forget the local session
    Logout(auth::LogoutArgs),

    /// Display the signed-in account
    Whoami(auth::WhoamiArgs),

    /// Show session and configuration state
    Status(status::StatusArgs),

    /// Resolve a route through the navigation guard
    Navigate(navigate::NavigateArgs),

    /// Show or change the color theme
    Theme(theme::ThemeArgs),

    /// AI assistant operations
    Ai(ai::AiCommand),
}
