//! Submission controller: one request/response cycle per user submit.
//!
//! The controller is a two-state machine (idle / submitting) whose only
//! discriminant is the session's pending flag. The optimistic phase runs
//! synchronously before any await, so the transcript always shows the prompt
//! before control yields to the network, and a second submit observes the
//! pending flag already set.

use crate::api::client::{GenerationClient, GenerationError};
use crate::api::GenerateResponse;
use crate::core::constants::GENERATION_FALLBACK_TEXT;
use crate::core::message::Role;
use crate::core::session::{ChatSession, SessionSnapshot};

/// Preconditions under which a submit call is silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// The trimmed draft is empty; nothing to send.
    EmptyInput,
    /// A submission cycle is already in flight.
    AlreadySubmitting,
}

/// Result of one exchange with the generation backend.
pub type GenerationOutcome = Result<GenerateResponse, GenerationError>;

pub struct SubmissionController<C> {
    session: ChatSession,
    client: C,
}

impl<C> SubmissionController<C> {
    pub fn new(client: C) -> Self {
        Self {
            session: ChatSession::new(),
            client,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        self.session.snapshot()
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Runs the precondition checks and, when they pass, the optimistic
    /// phase: pending set, user message appended as typed, draft cleared.
    /// Returns the prompt to send. The three mutations happen back to back
    /// with no await in between, which is what closes the race window
    /// between checking and setting the pending flag.
    pub fn take_prompt(&mut self) -> Result<String, SubmitRejection> {
        if self.session.is_pending() {
            tracing::debug!("submit ignored: a submission is already in flight");
            return Err(SubmitRejection::AlreadySubmitting);
        }
        if self.session.draft().trim().is_empty() {
            tracing::debug!("submit ignored: draft is empty");
            return Err(SubmitRejection::EmptyInput);
        }

        self.session.set_pending(true);
        // Validation looked at the trimmed draft; the transcript keeps the
        // text exactly as typed.
        let prompt = self.session.draft().to_string();
        self.session.append_message(Role::User, prompt.clone());
        self.session.set_draft(String::new());
        Ok(prompt)
    }

    /// Applies the outcome of the exchange. This is the single mutation path
    /// for success and failure: exactly one bot message is appended and the
    /// pending flag is cleared on every path, so the session can never stay
    /// locked after a resolved request.
    pub fn complete(&mut self, outcome: GenerationOutcome) {
        match outcome {
            Ok(response) => match response.first_part() {
                Some(text) => {
                    let text = text.to_string();
                    self.session.append_message(Role::Bot, text);
                }
                None => {
                    tracing::warn!("generation response missing first candidate part");
                    self.session
                        .append_message(Role::Bot, GENERATION_FALLBACK_TEXT);
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "generation request failed");
                self.session
                    .append_message(Role::Bot, GENERATION_FALLBACK_TEXT);
            }
        }
        self.session.set_pending(false);
    }
}

impl<C: GenerationClient> SubmissionController<C> {
    /// One full submission cycle. Rejected preconditions are a no-op; every
    /// other path resolves back to idle.
    pub async fn submit(&mut self) {
        let prompt = match self.take_prompt() {
            Ok(prompt) => prompt,
            Err(_) => return,
        };
        let outcome = self.client.generate(&prompt).await;
        self.complete(outcome);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::core::message::Message;

    /// Serves queued outcomes and counts calls. Panics when called with an
    /// empty queue, which doubles as a no-network-call assertion.
    struct StubClient {
        outcomes: Mutex<Vec<GenerationOutcome>>,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn with_outcome(outcome: GenerationOutcome) -> Self {
            Self {
                outcomes: Mutex::new(vec![outcome]),
                calls: AtomicUsize::new(0),
            }
        }

        fn unreachable() -> Self {
            Self {
                outcomes: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationClient for StubClient {
        async fn generate(&self, _prompt: &str) -> GenerationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .expect("unexpected call to generation client")
        }
    }

    fn well_formed(text: &str) -> GenerationOutcome {
        Ok(serde_json::from_str(&format!(
            r#"{{"response":{{"Candidates":[{{"Content":{{"Parts":[{}]}}}}]}}}}"#,
            serde_json::to_string(text).unwrap()
        ))
        .unwrap())
    }

    fn transcript(controller: &SubmissionController<StubClient>) -> Vec<&Message> {
        controller.session().transcript().iter().collect()
    }

    #[tokio::test]
    async fn successful_cycle_appends_user_then_bot() {
        let mut controller = SubmissionController::new(StubClient::with_outcome(well_formed(
            "Hi there!",
        )));
        controller.session_mut().set_draft("Hello");
        controller.submit().await;

        let messages = transcript(&controller);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], &Message::user("Hello"));
        assert_eq!(messages[1], &Message::bot("Hi there!"));
        assert!(!controller.session().is_pending());
        assert_eq!(controller.session().draft(), "");
    }

    #[tokio::test]
    async fn whitespace_draft_is_ignored_without_a_network_call() {
        let mut controller = SubmissionController::new(StubClient::unreachable());
        controller.session_mut().set_draft("  ");
        controller.submit().await;

        assert!(transcript(&controller).is_empty());
        assert_eq!(controller.session().draft(), "  ");
        assert!(!controller.session().is_pending());
        assert_eq!(controller.client().calls(), 0);
    }

    #[tokio::test]
    async fn backend_failure_degrades_into_fallback_message() {
        let mut controller =
            SubmissionController::new(StubClient::with_outcome(Err(GenerationError::Backend {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "internal error".to_string(),
            })));
        controller.session_mut().set_draft("Test");
        controller.submit().await;

        let messages = transcript(&controller);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], &Message::user("Test"));
        assert_eq!(messages[1], &Message::bot(GENERATION_FALLBACK_TEXT));
        assert!(!controller.session().is_pending());
    }

    #[tokio::test]
    async fn missing_candidates_degrade_into_fallback_message() {
        let outcome: GenerationOutcome = Ok(serde_json::from_str(r#"{"response":{}}"#).unwrap());
        let mut controller = SubmissionController::new(StubClient::with_outcome(outcome));
        controller.session_mut().set_draft("Test");
        controller.submit().await;

        let messages = transcript(&controller);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], &Message::bot(GENERATION_FALLBACK_TEXT));
        assert!(!controller.session().is_pending());
    }

    #[tokio::test]
    async fn non_string_first_part_degrades_into_fallback_message() {
        let outcome: GenerationOutcome = Ok(serde_json::from_str(
            r#"{"response":{"Candidates":[{"Content":{"Parts":[42]}}]}}"#,
        )
        .unwrap());
        let mut controller = SubmissionController::new(StubClient::with_outcome(outcome));
        controller.session_mut().set_draft("Test");
        controller.submit().await;

        assert_eq!(
            transcript(&controller)[1],
            &Message::bot(GENERATION_FALLBACK_TEXT)
        );
    }

    #[test]
    fn pending_brackets_the_exchange() {
        let mut controller = SubmissionController::new(StubClient::unreachable());
        assert!(!controller.session().is_pending());

        controller.session_mut().set_draft("Hello");
        let prompt = controller.take_prompt().expect("preconditions should pass");
        assert_eq!(prompt, "Hello");
        assert!(controller.session().is_pending());
        assert_eq!(controller.session().draft(), "");

        controller.complete(well_formed("Hi there!"));
        assert!(!controller.session().is_pending());
    }

    #[test]
    fn submit_while_pending_leaves_session_untouched() {
        let mut controller = SubmissionController::new(StubClient::unreachable());
        controller.session_mut().set_draft("first");
        controller.take_prompt().unwrap();

        controller.session_mut().set_draft("second");
        assert_eq!(
            controller.take_prompt(),
            Err(SubmitRejection::AlreadySubmitting)
        );
        assert_eq!(controller.session().transcript().len(), 1);
        assert_eq!(controller.session().draft(), "second");
    }

    #[test]
    fn untrimmed_draft_is_stored_as_typed() {
        let mut controller = SubmissionController::new(StubClient::unreachable());
        controller.session_mut().set_draft("  padded prompt  ");
        let prompt = controller.take_prompt().unwrap();

        assert_eq!(prompt, "  padded prompt  ");
        assert_eq!(
            controller.session().transcript()[0],
            Message::user("  padded prompt  ")
        );
    }

    #[test]
    fn draft_cleared_even_when_cycle_fails() {
        let mut controller = SubmissionController::new(StubClient::unreachable());
        controller.session_mut().set_draft("Test");
        controller.take_prompt().unwrap();
        assert_eq!(controller.session().draft(), "");

        controller.complete(Err(GenerationError::Backend {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        }));
        assert_eq!(controller.session().draft(), "");
        assert!(!controller.session().is_pending());
    }

    #[test]
    fn session_stays_usable_after_failure() {
        let mut controller = SubmissionController::new(StubClient::unreachable());
        controller.session_mut().set_draft("one");
        controller.take_prompt().unwrap();
        controller.complete(Err(GenerationError::Malformed("bad json".to_string())));

        controller.session_mut().set_draft("two");
        assert!(controller.take_prompt().is_ok());
        controller.complete(well_formed("reply"));
        assert_eq!(controller.session().transcript().len(), 4);
    }
}
