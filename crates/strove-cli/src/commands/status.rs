//! Status command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::GlobalArgs;
use crate::context::ClientContext;
use crate::output;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Status {
    authenticated: bool,
    username: Option<String>,
    api_url: String,
    storage: String,
}

pub fn run(global: &GlobalArgs, args: StatusArgs) -> Result<()> {
    let ctx = ClientContext::open(global)?;
    let session = ctx.store().snapshot();

    let status = Status {
        authenticated: session.is_authenticated(),
        username: session.username,
        api_url: ctx.config().base_url.to_string(),
        storage: ctx.storage_path().display().to_string(),
    };

    if args.json {
        return output::json(&status, false);
    }

    output::field(
        "Authenticated",
        if status.authenticated { "yes" } else { "no" },
    );
    if let Some(username) = &status.username {
        output::field("Username", username);
    }
    output::field("API", &status.api_url);
    output::field("Storage", &status.storage);
    Ok(())
}
