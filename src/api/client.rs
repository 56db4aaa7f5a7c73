//! HTTP boundary to the generation backend.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{GenerateRequest, GenerateResponse};
use crate::core::constants::GENERATE_PATH;
use crate::utils::url::construct_api_url;

/// Failures crossing the backend boundary. Malformed extraction paths inside
/// a decoded response are handled by the caller; this type covers the wire.
#[derive(Debug)]
pub enum GenerationError {
    /// The request never produced an HTTP response.
    Transport(reqwest::Error),
    /// The backend answered with a non-success status.
    Backend { status: StatusCode, body: String },
    /// The backend answered 2xx but the body was not decodable.
    Malformed(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Transport(err) => {
                write!(f, "failed to reach generation backend: {err}")
            }
            GenerationError::Backend { status, body } => {
                write!(f, "generation backend returned {status}: {body}")
            }
            GenerationError::Malformed(detail) => {
                write!(f, "generation backend sent an undecodable body: {detail}")
            }
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GenerationError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, GenerationError>;
}

/// Production client: `POST <endpoint>/api/generate` with a JSON `{"q": ...}`
/// body.
#[derive(Clone)]
pub struct HttpGenerationClient {
    client: reqwest::Client,
    generate_url: String,
}

impl HttpGenerationClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            generate_url: construct_api_url(endpoint, GENERATE_PATH),
        }
    }

    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, GenerationError> {
        let response = self
            .client
            .post(&self.generate_url)
            .header("Content-Type", "application/json")
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .map_err(GenerationError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(GenerationError::Backend { status, body });
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|err| GenerationError::Malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_joins_endpoint_and_path() {
        let client = HttpGenerationClient::new("http://localhost:8080/");
        assert_eq!(client.generate_url(), "http://localhost:8080/api/generate");
    }

    #[test]
    fn backend_errors_carry_status_and_body() {
        let err = GenerationError::Backend {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("boom"));
    }
}
