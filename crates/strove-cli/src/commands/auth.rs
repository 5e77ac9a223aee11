//! Login, registration, logout and whoami.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use strove_core::{Credential, LoginCredentials};

use crate::cli::GlobalArgs;
use crate::context::ClientContext;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username or email
    #[arg(long, short = 'u')]
    pub login_name: String,

    /// Account password
    #[arg(long, env = "STROVE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "STROVE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Ask the server instead of reading the local session
    #[arg(long)]
    pub remote: bool,
}

pub async fn login(global: &GlobalArgs, args: LoginArgs) -> Result<()> {
    let ctx = ClientContext::open(global)?;
    let credentials = LoginCredentials::new(args.login_name, args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let credential = ctx
        .session()?
        .login_with(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    print_credential(&credential);
    Ok(())
}

pub async fn register(global: &GlobalArgs, args: RegisterArgs) -> Result<()> {
    let ctx = ClientContext::open(global)?;

    eprintln!("{}", "Creating account...".dimmed());

    let credential = ctx
        .session()?
        .register(&args.username, &args.email, &args.password)
        .await
        .context("Failed to register")?;

    output::success("Account created");
    println!();
    print_credential(&credential);
    Ok(())
}

pub fn logout(global: &GlobalArgs, _args: LogoutArgs) -> Result<()> {
    let ctx = ClientContext::open(global)?;

    if !ctx.store().is_authenticated() {
        output::success("Already logged out");
        return Ok(());
    }

    ctx.session()?.logout();
    output::success("Logged out");
    Ok(())
}

pub async fn whoami(global: &GlobalArgs, args: WhoamiArgs) -> Result<()> {
    let ctx = ClientContext::open(global)?;
    let session = ctx.store().snapshot();

    if !session.is_authenticated() {
        bail!("No active session. Run 'strove login' first.");
    }

    if args.remote {
        let me = ctx
            .session()?
            .current_user()
            .await
            .context("Failed to fetch current user")?;
        return output::json(&me, true);
    }

    output::field("Username", session.username.as_deref().unwrap_or("-"));
    output::field("Email", session.email.as_deref().unwrap_or("-"));
    Ok(())
}

fn print_credential(credential: &Credential) {
    output::field("Username", credential.username.as_deref().unwrap_or("-"));
    output::field("Email", credential.email.as_deref().unwrap_or("-"));
}
