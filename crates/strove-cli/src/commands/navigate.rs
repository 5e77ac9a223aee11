//! Navigate command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use strove_core::router::GuardOutcome;

use crate::cli::GlobalArgs;
use crate::context::ClientContext;
use crate::output;

#[derive(Args, Debug)]
pub struct NavigateArgs {
    /// Route path, e.g. /dashboard
    pub path: String,
}

pub fn run(global: &GlobalArgs, args: NavigateArgs) -> Result<()> {
    let ctx = ClientContext::open(global)?;
    let router = ctx.router();

    let navigation = router
        .navigate(&args.path)
        .with_context(|| format!("Failed to navigate to {}", args.path))?;

    let route = navigation
        .route
        .as_ref()
        .map(|r| r.name.as_str())
        .unwrap_or("(unregistered)");

    output::field("Requested", &navigation.requested);
    output::field("Route", &format!("{} {}", navigation.path, route.dimmed()));
    if let GuardOutcome::Redirect(to) = &navigation.outcome {
        output::field("Guard", &format!("redirected to {}", to));
    }
    Ok(())
}
