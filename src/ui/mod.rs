//! Terminal UI layer for interactive chat sessions.
//!
//! Ownership boundary: this layer presents session state and captures
//! interaction; [`crate::core`] owns the transcript and submission logic.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
