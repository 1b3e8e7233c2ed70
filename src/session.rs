// src/session.rs
//
// One submission round: user message appended, indicator started, a single
// search task spawned, and its outcome delivered back over a channel. The
// channel replaces any polling of the message count; the outcome itself
// drives both the assistant append and the indicator transition.

use crate::chat::{ChatMessage, MessageStore, Role};
use crate::completion::CompletionClient;
use crate::indicator::{IndicatorState, TypingIndicator};
use crate::models::{JobRecord, SearchRequest};
use crate::render::{JOBS_SECTION_MARKER, REFINE_PROMPT};
use crate::search::SearchClient;
use log::{debug, warn};
use std::time::Duration;
use tokio::sync::mpsc;

pub const NO_RESULTS_TEXT: &str = "I couldn't find any jobs matching your criteria. Could you try a different search or be more specific?";

pub const CONNECTION_TROUBLE_TEXT: &str = "I'm having trouble connecting to the job search service. Please try again later or rephrase your query.";

/// How a round ended. Zero jobs is a successful outcome; `Reply` is a
/// free-form advisor turn with no job results attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Jobs(Vec<JobRecord>),
    Reply(String),
    Failed,
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptyInput,
    RoundPending,
}

/// Conversation state for one session: the timeline, the typing indicator
/// and the in-flight round plumbing. The store is the only mutable state
/// and is only touched from `submit` and `apply_outcome`.
pub struct ChatSession {
    store: MessageStore,
    indicator: TypingIndicator,
    client: SearchClient,
    has_searched: bool,
    outcome_tx: mpsc::UnboundedSender<RoundOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<RoundOutcome>,
}

impl ChatSession {
    pub fn new(client: SearchClient, typing_timeout: Duration) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            store: MessageStore::new(),
            indicator: TypingIndicator::new(typing_timeout),
            client,
            has_searched: false,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn indicator(&self) -> &TypingIndicator {
        &self.indicator
    }

    pub fn indicator_mut(&mut self) -> &mut TypingIndicator {
        &mut self.indicator
    }

    /// True once a search has completed successfully (with or without
    /// results); gates the tips panel.
    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Starts a round: appends the user message, shows the indicator and
    /// spawns the search. Rejected while the previous round's indicator is
    /// still pending, or for blank input.
    pub fn submit(&mut self, input: &str) -> Result<(), SubmitRejection> {
        if input.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }
        if self.indicator.is_pending() {
            return Err(SubmitRejection::RoundPending);
        }

        self.store.append(ChatMessage::user(input));
        self.indicator.start();

        let request = SearchRequest::from_input(input);
        let client = self.client.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = match client.search(&request).await {
                Ok(jobs) => RoundOutcome::Jobs(jobs),
                Err(e) => {
                    warn!("round failed: {}", e);
                    RoundOutcome::Failed
                }
            };
            // Receiver only drops at session teardown; a send failure then
            // is irrelevant.
            let _ = outcome_tx.send(outcome);
        });

        Ok(())
    }

    /// Starts a free-form advisor round instead of a structured search.
    /// Same guards and indicator lifecycle as `submit`; the reply comes
    /// from the chat-completion endpoint.
    pub fn submit_advice(&mut self, input: &str) -> Result<(), SubmitRejection> {
        if input.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }
        if self.indicator.is_pending() {
            return Err(SubmitRejection::RoundPending);
        }

        let history = self.history_json();
        self.store.append(ChatMessage::user(input));
        self.indicator.start();

        let input = input.to_string();
        let outcome_tx = self.outcome_tx.clone();
        let client = CompletionClient::from_config();
        tokio::spawn(async move {
            let outcome = match client.complete(&input, &history).await {
                Ok(reply) => RoundOutcome::Reply(reply),
                Err(e) => {
                    warn!("advice round failed: {}", e);
                    RoundOutcome::Failed
                }
            };
            let _ = outcome_tx.send(outcome);
        });

        Ok(())
    }

    /// The timeline as completion-endpoint messages, greeting included.
    fn history_json(&self) -> Vec<serde_json::Value> {
        self.store
            .messages()
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                serde_json::json!({ "role": role, "content": m.content })
            })
            .collect()
    }

    /// Drains finished rounds and advances the visual timeout. Called from
    /// the UI tick; returns the indicator state observed this tick so the
    /// caller can react to `TimedOut`.
    pub fn pump(&mut self) -> IndicatorState {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
        self.indicator.tick()
    }

    /// Applies a finished round to the timeline. Always appends an
    /// assistant message, even when the outcome arrives after the visual
    /// timeout.
    pub fn apply_outcome(&mut self, outcome: RoundOutcome) {
        let message = match outcome {
            RoundOutcome::Failed => ChatMessage::assistant(CONNECTION_TROUBLE_TEXT),
            RoundOutcome::Reply(reply) => ChatMessage::assistant(reply),
            RoundOutcome::Jobs(jobs) => {
                self.has_searched = true;
                if jobs.is_empty() {
                    ChatMessage::assistant(NO_RESULTS_TEXT)
                } else {
                    let content = compose_search_reply(&jobs);
                    ChatMessage::assistant_with_jobs(content, jobs)
                }
            }
        };

        debug!("round resolved: {} message(s) in timeline", self.store.len() + 1);
        self.store.append(message);
        self.indicator.resolve();
    }

    /// Awaits the next finished round. Test and headless-driver hook; the
    /// TUI drains through `pump` instead.
    pub async fn recv_outcome(&mut self) -> Option<RoundOutcome> {
        self.outcome_rx.recv().await
    }
}

/// Builds the assistant reply for a non-empty result list: a short intro,
/// the job section marker, one markup block per job and the refine prompt.
pub fn compose_search_reply(jobs: &[JobRecord]) -> String {
    let mut content = format!(
        "I found {} job opportunities that might interest you:\n\n{}\n\n",
        jobs.len(),
        JOBS_SECTION_MARKER
    );

    for job in jobs {
        content.push_str(&format!("**{}** at {}\n", job.title, job.company));
        if let Some(location) = &job.location {
            content.push_str(&format!("📍 {}\n", location));
        }
        if let Some(job_type) = &job.job_type {
            content.push_str(&format!("💼 {}\n", job_type));
        }
        if let Some(salary) = &job.salary_range {
            content.push_str(&format!("💰 {}\n", salary));
        }
        if job.is_women_friendly.unwrap_or(false) {
            content.push_str("✓ Women-friendly workplace\n");
        }
        if let Some(skills) = &job.skills {
            if !skills.is_empty() {
                content.push_str(&format!("Skills: {}\n", skills.join(", ")));
            }
        }
        content.push_str(&format!("[Apply Here]({})\n\n", job.application_url));
    }

    content.push_str(REFINE_PROMPT);
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> ChatSession {
        ChatSession::new(
            SearchClient::new("http://localhost:0/unused"),
            Duration::from_secs(10),
        )
    }

    #[tokio::test]
    async fn test_blank_input_rejected() {
        let mut session = session();
        assert_eq!(session.submit("   "), Err(SubmitRejection::EmptyInput));
        assert_eq!(session.store().len(), 1);
    }

    #[tokio::test]
    async fn test_second_submission_rejected_while_pending() {
        let mut session = session();
        session.submit("rust jobs").unwrap();
        assert_eq!(
            session.submit("another one"),
            Err(SubmitRejection::RoundPending)
        );
        // Only greeting + first user message made it in.
        assert_eq!(session.store().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_results_round() {
        // Scenario: endpoint answers {results: []}.
        let mut session = session();
        session.submit("obscure role in nowhere").unwrap();

        session.apply_outcome(RoundOutcome::Jobs(Vec::new()));

        let last = session.store().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, NO_RESULTS_TEXT);
        assert!(last.jobs.is_empty());
        assert!(session.has_searched());
        assert!(!session.indicator().is_pending());
    }

    #[tokio::test]
    async fn test_failed_round_appends_canned_trouble_text() {
        let mut session = session();
        session.submit("rust jobs").unwrap();

        session.apply_outcome(RoundOutcome::Failed);

        let last = session.store().last().unwrap();
        assert_eq!(last.content, CONNECTION_TROUBLE_TEXT);
        assert!(!session.has_searched());
        // The error still resolved the round; a new submission is accepted.
        assert!(session.submit("try again").is_ok());
    }

    #[tokio::test]
    async fn test_round_against_http_endpoint() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "title": "Data Scientist",
                    "company": "Spotify",
                    "application_url": "https://spotify.example/jobs/7",
                    "is_women_friendly": true
                }]
            })))
            .mount(&mock_server)
            .await;

        let mut session =
            ChatSession::new(SearchClient::new(mock_server.uri()), Duration::from_secs(10));
        session.submit("Data Science positions").unwrap();

        let outcome = session.recv_outcome().await.unwrap();
        session.apply_outcome(outcome);

        let last = session.store().last().unwrap();
        assert_eq!(last.jobs.len(), 1);
        assert!(last.content.contains("**Data Scientist** at Spotify"));
        assert!(last.content.contains(JOBS_SECTION_MARKER));
        assert!(last.content.ends_with(REFINE_PROMPT));
    }

    #[tokio::test]
    async fn test_http_error_round() {
        // Scenario: endpoint answers 500; the round resolves, not times out.
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let mut session =
            ChatSession::new(SearchClient::new(mock_server.uri()), Duration::from_secs(10));
        session.submit("anything").unwrap();

        let outcome = session.recv_outcome().await.unwrap();
        assert_eq!(outcome, RoundOutcome::Failed);
        session.apply_outcome(outcome);

        assert_eq!(session.store().last().unwrap().content, CONNECTION_TROUBLE_TEXT);
        assert_eq!(session.indicator().state(), IndicatorState::Idle);
    }

    #[tokio::test]
    async fn test_visual_timeout_then_late_outcome() {
        // Scenario: nothing arrives within the ceiling; the indicator times
        // out, the controller resets, and the late response is still
        // appended.
        let mut session = ChatSession::new(
            SearchClient::new("http://localhost:0/unused"),
            Duration::ZERO,
        );
        session.submit("slow backend").unwrap();

        assert_eq!(session.pump(), IndicatorState::TimedOut);
        assert!(!session.indicator().is_pending());
        // Timed out, so the next submission is no longer blocked.
        assert_eq!(session.submit(""), Err(SubmitRejection::EmptyInput));

        let before = session.store().len();
        session.apply_outcome(RoundOutcome::Jobs(vec![JobRecord::basic(
            "Late Result",
            "Slowpoke Inc",
            "https://slow.example/apply",
        )]));
        assert_eq!(session.store().len(), before + 1);
        assert_eq!(session.store().last().unwrap().jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_advice_reply_appends_plain_assistant_message() {
        let mut session = session();
        session.submit_advice("How do I move into data engineering?").unwrap();

        session.apply_outcome(RoundOutcome::Reply(
            "Start with SQL and a pipeline project.".to_string(),
        ));

        let last = session.store().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Start with SQL and a pipeline project.");
        assert!(last.jobs.is_empty());
        // Advisor turns never count as a search.
        assert!(!session.has_searched());
    }

    #[tokio::test]
    async fn test_history_includes_greeting_and_roles() {
        let mut session = session();
        session.store.append(ChatMessage::user("hello"));

        let history = session.history_json();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["role"], "assistant");
        assert_eq!(history[1]["role"], "user");
        assert_eq!(history[1]["content"], "hello");
    }

    #[test]
    fn test_compose_reply_includes_optional_lines_only_when_present() {
        let mut job = JobRecord::basic("Engineer", "Acme", "https://acme.example/apply");
        job.location = Some("Boston".to_string());
        job.skills = Some(vec!["Rust".to_string(), "Tokio".to_string()]);

        let content = compose_search_reply(&[job]);
        assert!(content.starts_with("I found 1 job opportunities"));
        assert!(content.contains("📍 Boston"));
        assert!(content.contains("Skills: Rust, Tokio"));
        assert!(!content.contains("💼"));
        assert!(!content.contains("💰"));
        assert!(!content.contains("Women-friendly workplace"));
        assert!(content.contains("[Apply Here](https://acme.example/apply)"));
    }
}
