//! Shared constants used across the application

/// Transcript text shown in place of a bot reply when a submission fails for
/// any reason (transport, backend status, malformed response).
pub const GENERATION_FALLBACK_TEXT: &str = "There was an error submitting the form.";

/// Default generation endpoint when neither flag, environment variable, nor
/// config file provides one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Path of the generation resource on the backend.
pub const GENERATE_PATH: &str = "api/generate";
