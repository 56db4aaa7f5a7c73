//! TUI-less "say" command

use std::error::Error;

use crate::api::client::HttpGenerationClient;
use crate::core::submit::SubmissionController;

/// Runs exactly one submission cycle and prints the bot reply (or the
/// fallback text when the cycle failed) to stdout.
pub async fn run_say(prompt: Vec<String>, endpoint: &str) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: gemchat say <prompt>");
        std::process::exit(1);
    }

    let mut controller = SubmissionController::new(HttpGenerationClient::new(endpoint));
    controller.session_mut().set_draft(prompt);
    controller.submit().await;

    if let Some(reply) = controller.session().transcript().iter().rev().find(|m| m.is_bot()) {
        println!("{}", reply.content);
    }

    Ok(())
}
