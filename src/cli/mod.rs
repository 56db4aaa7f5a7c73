//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and dispatches into the
//! interactive chat loop or the one-shot `say` mode.

pub mod say;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::core::config::{resolve_endpoint, Config};
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "gemchat")]
#[command(about = "A terminal chat interface for a Gemini-proxy generation backend")]
#[command(
    long_about = "Gemchat is a full-screen terminal chat interface that talks to a \
Gemini-proxy generation backend. Each prompt is sent independently and the reply is \
rendered as markdown in the transcript.\n\n\
Endpoint resolution (first match wins):\n\
  --endpoint flag\n\
  GEMCHAT_ENDPOINT environment variable\n\
  endpoint key in the config file\n\
  http://localhost:8080\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit the application\n\
  Backspace         Delete characters in the input field"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the generation backend
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(long, value_name = "FILE")]
    pub debug_log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a single prompt without the TUI and print the reply
    Say {
        /// The prompt to send
        prompt: Vec<String>,
    },
}

pub async fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = &args.debug_log {
        crate::logging::init_debug_log(path)?;
    }

    let config = Config::load()?;
    let endpoint = resolve_endpoint(args.endpoint.as_deref(), &config);

    match args.command {
        Some(Commands::Say { prompt }) => say::run_say(prompt, &endpoint).await,
        None => run_chat(endpoint).await,
    }
}
