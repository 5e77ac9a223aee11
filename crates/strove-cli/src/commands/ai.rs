//! AI assistant subcommands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use strove_http::ApiResponse;
use strove_http::ai::DEFAULT_HISTORY_LIMIT;
use strove_http::endpoints::Provider;

use crate::cli::GlobalArgs;
use crate::context::ClientContext;
use crate::output;

#[derive(Args, Debug)]
pub struct AiCommand {
    #[command(subcommand)]
    pub command: AiSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AiSubcommand {
    /// Send a chat message
    Chat(ChatArgs),

    /// List recent conversations
    History(HistoryArgs),

    /// Delete a conversation
    Delete(DeleteArgs),

    /// Generate writing prompts for a keyword
    Inspire(InspireArgs),

    /// Rewrite text in a given style
    Polish(PolishArgs),

    /// Check the provider settings
    TestConnection(TestConnectionArgs),
}

/// AI provider settings, forwarded with every request.
#[derive(Args, Debug)]
pub struct ProviderArgs {
    /// Provider API key
    #[arg(long, env = "STROVE_AI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Provider name
    #[arg(long, env = "STROVE_AI_PROVIDER", default_value = "openai")]
    pub provider: String,

    /// Model name
    #[arg(long, env = "STROVE_AI_MODEL")]
    pub model: String,

    /// Custom provider endpoint
    #[arg(long, env = "STROVE_AI_URL")]
    pub provider_url: Option<String>,
}

impl From<ProviderArgs> for Provider {
    fn from(args: ProviderArgs) -> Self {
        Provider {
            api_key: args.api_key,
            provider: args.provider,
            model: args.model,
            api_url: args.provider_url,
        }
    }
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    pub message: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of conversations to fetch
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub limit: u32,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Conversation ID
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct InspireArgs {
    pub keyword: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Args, Debug)]
pub struct PolishArgs {
    pub text: String,

    /// Target style
    #[arg(long, default_value = "formal")]
    pub style: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Args, Debug)]
pub struct TestConnectionArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,
}

pub async fn handle(global: &GlobalArgs, cmd: AiCommand) -> Result<()> {
    let ctx = ClientContext::open(global)?;
    let ai = ctx.ai()?;

    match cmd.command {
        AiSubcommand::Chat(args) => {
            let response = ai
                .chat(&args.message, &args.provider.into())
                .await
                .context("Chat request failed")?;
            let reply = payload(response, "Chat failed")?;
            println!("{}", reply.reply);
            eprintln!("{}", format!("conversation {}", reply.conversation_id).dimmed());
        }
        AiSubcommand::History(args) => {
            let response = ai
                .history(args.limit)
                .await
                .context("Failed to fetch history")?;
            for conversation in payload(response, "Failed to fetch history")? {
                println!(
                    "{} {}",
                    format!("#{}", conversation.id).bold(),
                    conversation.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
                );
                output::field("You", &conversation.message);
                output::field("AI", &conversation.response);
                println!();
            }
        }
        AiSubcommand::Delete(args) => {
            let response = ai
                .delete_conversation(args.id)
                .await
                .context("Failed to delete conversation")?;
            accepted(&response, "Failed to delete conversation")?;
            output::success(&format!("Deleted conversation {}", args.id));
        }
        AiSubcommand::Inspire(args) => {
            let response = ai
                .generate_inspiration(&args.keyword, &args.provider.into())
                .await
                .context("Inspiration request failed")?;
            for idea in payload(response, "Inspiration failed")? {
                println!("- {}", idea);
            }
        }
        AiSubcommand::Polish(args) => {
            let response = ai
                .polish_text(&args.text, &args.style, &args.provider.into())
                .await
                .context("Polish request failed")?;
            println!("{}", payload(response, "Polish failed")?);
        }
        AiSubcommand::TestConnection(args) => {
            let response = ai
                .test_connection(&args.provider.into())
                .await
                .context("Connection test failed")?;
            accepted(&response, "Connection test failed")?;
            output::success(response.message.as_deref().unwrap_or("Connection OK"));
        }
    }

    Ok(())
}

/// Fail unless the server reported success.
fn accepted<T>(response: &ApiResponse<T>, fallback: &str) -> Result<()> {
    if !response.success {
        bail!(
            "{}",
            response
                .message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback)
        );
    }
    Ok(())
}

/// The payload of a successful response.
fn payload<T>(response: ApiResponse<T>, fallback: &str) -> Result<T> {
    accepted(&response, fallback)?;
    response
        .into_data()
        .with_context(|| format!("{}: empty response", fallback))
}
