//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod health;
pub mod render;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::health::run_health;
use crate::cli::render::run_render;
use crate::cli::say::{run_say, SayFormat};
use crate::cli::settings::{apply_set, apply_unset, SettingRegistry};
use crate::core::config::Config;
use crate::ui::chat_loop::{run_chat, ChatOptions};

/// Environment variable holding the diagnostics filter.
pub const LOG_ENV: &str = "LUMINA_LOG";

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", rustc ",
    env!("VERGEN_RUSTC_SEMVER"),
    ")"
);

#[derive(Parser)]
#[command(name = "lumina")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal chat client for the Lumina AI agent")]
#[command(
    long_about = "Lumina is a line-oriented chat client for a hosted AI agent. Answers are \
rendered into safe HTML with copyable, runnable code blocks.\n\n\
Environment Variables:\n\
  LUMINA_BACKEND_URL  Agent base URL (overrides the config file)\n\
  LUMINA_LOG          Diagnostics filter, e.g. debug or lumina=trace (default: warn)\n\n\
Commands inside the chat:\n\
  /copy <id>          Copy a code block\n\
  /run <id>           Run a javascript or python block, preview html/css\n\
  /clear              Start over, even while an answer is pending\n\
  /help               List every command"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the agent backend
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Session id sent with every question
    #[arg(long, global = true, value_name = "ID")]
    pub session_id: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Keep an HTML transcript page at this path
    #[arg(short = 't', long, global = true, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question and print the answer
    Say {
        /// Print the rendered HTML fragment instead of the answer text
        #[arg(long)]
        html: bool,
        /// The question
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        prompt: Vec<String>,
    },
    /// Render answer text from a file (or stdin) to the safe HTML fragment
    Render {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Print only the content category
        #[arg(long)]
        classify: bool,
    },
    /// Check that the agent backend is reachable
    Health,
    /// Show the current configuration
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            backend_url: self.backend_url.clone(),
            session_id: self.session_id.clone(),
            log: self.log.clone(),
            transcript: self.transcript.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

/// Diagnostics go to stderr so they never mix with answers on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let options = args.chat_options();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(options).await,
        Commands::Say { html, prompt } => {
            let format = if html {
                SayFormat::Html
            } else {
                SayFormat::Text
            };
            run_say(prompt, format, options).await
        }
        Commands::Render { file, classify } => run_render(file, classify).await,
        Commands::Health => run_health(options.backend_url).await,
        Commands::Config => {
            let config = Config::load()?;
            config.print_all();
            println!();
            println!("Config file: {}", Config::get_config_path()?.display());
            println!(
                "Settable keys: {}",
                SettingRegistry::new().keys_display_order().join(", ")
            );
            Ok(())
        }
        Commands::Set { key, value } => {
            let registry = SettingRegistry::new();
            let config_path = Config::get_config_path()?;
            match apply_set(&registry, &config_path, &key, &value) {
                Ok(message) => {
                    println!("{message}");
                    Ok(())
                }
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
        }
        Commands::Unset { key } => {
            let registry = SettingRegistry::new();
            let config_path = Config::get_config_path()?;
            match apply_unset(&registry, &config_path, &key) {
                Ok(message) => {
                    println!("{message}");
                    Ok(())
                }
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
