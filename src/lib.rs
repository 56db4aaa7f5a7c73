//! Gemchat is a terminal chat client for a Gemini-proxy generation backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session state (transcript, draft, pending flag), the
//!   submission controller that runs one request/response cycle at a time,
//!   and configuration.
//! - [`api`] defines the wire payloads and the HTTP client for the
//!   generation backend.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`cli`] parses arguments and dispatches into the chat loop or the
//!   one-shot `say` mode.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::run`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
