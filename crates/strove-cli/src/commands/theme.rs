//! Theme command implementation.

use anyhow::Result;
use clap::{Args, Subcommand};

use strove_core::Theme;

use crate::cli::GlobalArgs;
use crate::context::ClientContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ThemeArgs {
    /// Treat the system as preferring dark mode when nothing is stored
    #[arg(long, env = "STROVE_PREFER_DARK")]
    pub prefer_dark: bool,

    #[command(subcommand)]
    pub action: Option<ThemeAction>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ThemeAction {
    /// Print the active theme (default)
    Show,
    /// Switch between light and dark
    Toggle,
    /// Use the dark theme
    Dark,
    /// Use the light theme
    Light,
}

pub fn run(global: &GlobalArgs, args: ThemeArgs) -> Result<()> {
    let ctx = ClientContext::open(global)?;
    let themes = ctx.theme(args.prefer_dark);

    let theme = match args.action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => {
            println!("{}", themes.current());
            return Ok(());
        }
        ThemeAction::Toggle => themes.toggle(),
        ThemeAction::Dark => {
            themes.set(Theme::Dark);
            Theme::Dark
        }
        ThemeAction::Light => {
            themes.set(Theme::Light);
            Theme::Light
        }
    };

    output::success(&format!("Theme set to {}", theme));
    Ok(())
}
