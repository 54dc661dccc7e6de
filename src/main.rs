use std::io;
use std::process::ExitCode;

use chat_context::cli::chat::ChatContext;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Line to run instead of entering the interactive view (repeatable)
    #[arg(short, long = "input", value_name = "LINE")]
    inputs: Vec<String>,

    /// Log every change to the conversation state
    #[arg(short, long, env = "CHAT_CONTEXT_WATCH")]
    watch: bool,

    /// Enable verbose logging
    #[arg(short, long, env = "CHAT_CONTEXT_VERBOSE")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat session
    Chat {
        /// Line to run instead of entering the interactive view (repeatable)
        #[arg(short, long = "input", value_name = "LINE")]
        inputs: Vec<String>,

        /// Log every change to the conversation state
        #[arg(short, long, env = "CHAT_CONTEXT_WATCH")]
        watch: bool,

        /// Enable verbose logging
        #[arg(short, long, env = "CHAT_CONTEXT_VERBOSE")]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load CHAT_CONTEXT_* settings from .env before parsing
    dotenv().ok();

    let cli = Cli::parse();

    let (inputs, watch, verbose) = match cli.command {
        Some(Commands::Chat {
            inputs,
            watch,
            verbose,
        }) => (inputs, watch, verbose),
        None => (cli.inputs, cli.watch, cli.verbose),
    };

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting chat view");

    let interactive = inputs.is_empty();
    let mut chat_context = ChatContext::new(Box::new(io::stdout()), inputs, interactive);
    let observers = if watch {
        chat_context.observe()
    } else {
        Vec::new()
    };

    let code = chat_context.run().await?;

    drop(chat_context);
    for observer in observers {
        observer.await?;
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_input_collects_lines() {
        let cli = Cli::try_parse_from(["chat-context", "-i", "hello", "-i", "/answer hi"]).unwrap();
        assert_eq!(cli.inputs, vec!["hello", "/answer hi"]);
    }

    #[test]
    fn test_verbose_read_from_environment() {
        std::env::set_var("CHAT_CONTEXT_VERBOSE", "true");
        let cli = Cli::try_parse_from(["chat-context"]);
        std::env::remove_var("CHAT_CONTEXT_VERBOSE");

        assert!(cli.unwrap().verbose);
    }

    #[test]
    fn test_chat_subcommand_takes_inputs() {
        let cli = Cli::try_parse_from(["chat-context", "chat", "--input", "q1"]).unwrap();
        match cli.command {
            Some(Commands::Chat { inputs, .. }) => assert_eq!(inputs, vec!["q1"]),
            None => panic!("expected chat subcommand"),
        }
    }
}
