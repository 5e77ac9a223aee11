//! strove - command-line host for the Strove client session core.
//!
//! Keeps a session in a local storage file, talks to the Strove API with it,
//! and runs the navigation guard the same way the web client does.

mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{ai, auth, navigate, status, theme};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let global = cli.global;
    match cli.command {
        Commands::Login(args) => auth::login(&global, args).await,
        Commands::Register(args) => auth::register(&global, args).await,
        Commands::Logout(args) => auth::logout(&global, args),
        Commands::Whoami(args) => auth::whoami(&global, args).await,
        Commands::Status(args) => status::run(&global, args),
        Commands::Navigate(args) => navigate::run(&global, args),
        Commands::Theme(args) => theme::run(&global, args),
        Commands::Ai(cmd) => ai::handle(&global, cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output on stdout stays parseable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
