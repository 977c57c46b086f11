//! Lumina is a terminal chat client for a hosted AI agent.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the request lifecycle, the agent client,
//!   code actions and the sandbox that runs code blocks.
//! - [`ui`] renders assistant answers into safe HTML, runs the interactive
//!   chat loop and writes the transcript page.
//! - [`commands`] implements slash-command parsing used by the chat loop.
//! - [`api`] defines the payloads exchanged with the agent backend.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
