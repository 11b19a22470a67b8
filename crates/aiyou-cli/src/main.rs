//! aiyou: command line client for the AI.YOU platform

mod commands;
mod config;

use std::path::PathBuf;

use aiyou_core::CancellationToken;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{
    audio::TranscribeArgs, chat::ChatArgs, conversation::SaveConversationArgs,
    models::CreateModelArgs, rate_test::RateTestArgs, threads::ThreadsArgs,
};
use config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "aiyou", version, about = "Command line client for the AI.YOU platform")]
struct Cli {
    /// Config file (default: ~/.aiyou/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, env = "AIYOU_BASE_URL", global = true)]
    base_url: Option<String>,

    #[arg(long, env = "AIYOU_EMAIL", global = true)]
    email: Option<String>,

    #[arg(long, env = "AIYOU_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Pre-issued bearer token, used when no email/password is given
    #[arg(long, env = "AIYOU_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Debug logging
    #[arg(long, global = true, conflicts_with = "quiet")]
    debug: bool,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a message to an assistant
    Chat(ChatArgs),
    /// List your assistants
    Assistants,
    /// List available models
    Models,
    /// Register a new model
    CreateModel(CreateModelArgs),
    /// List conversation threads
    Threads(ThreadsArgs),
    /// Delete a conversation thread
    DeleteThread {
        thread_id: String,
    },
    /// Save a conversation
    SaveConversation(SaveConversationArgs),
    /// Show one conversation thread
    Conversation {
        thread_id: String,
    },
    /// Transcribe an audio file
    Transcribe(TranscribeArgs),
    /// Fire concurrent requests through the client-side rate limiter
    RateTest(RateTestArgs),
}

fn init_logging(debug: bool, quiet: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.quiet);

    let file = config::load_file(cli.config.as_deref())?;
    let builder = config::resolve(
        file,
        Overrides {
            base_url: cli.base_url,
            email: cli.email,
            password: cli.password,
            token: cli.token,
        },
    )?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight requests");
                cancel.cancel();
            }
        });
    }
    let builder = builder.cancellation(cancel);

    match cli.command {
        Commands::Chat(args) => commands::chat::run(&builder.build()?, args).await,
        Commands::Assistants => commands::assistants::run(&builder.build()?).await,
        Commands::Models => commands::models::list(&builder.build()?).await,
        Commands::CreateModel(args) => commands::models::create(&builder.build()?, args).await,
        Commands::Threads(args) => commands::threads::list(&builder.build()?, args).await,
        Commands::DeleteThread { thread_id } => {
            commands::threads::delete(&builder.build()?, &thread_id).await
        }
        Commands::SaveConversation(args) => {
            commands::conversation::save(&builder.build()?, args).await
        }
        Commands::Conversation { thread_id } => {
            commands::conversation::show(&builder.build()?, &thread_id).await
        }
        Commands::Transcribe(args) => commands::audio::run(&builder.build()?, args).await,
        Commands::RateTest(args) => commands::rate_test::run(builder, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_with_token() {
        let cli = Cli::try_parse_from([
            "aiyou", "--token", "tok", "chat", "asst_1", "hello", "--stream",
        ])
        .unwrap();
        assert_eq!(cli.token.as_deref(), Some("tok"));
        match cli.command {
            Commands::Chat(args) => {
                assert_eq!(args.assistant_id, "asst_1");
                assert_eq!(args.message, "hello");
                assert!(args.stream);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_debug_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["aiyou", "--debug", "--quiet", "models"]).is_err());
    }
}
