// src/completion.rs
//
// Thin client for the hosted chat-completion endpoint, used for free-form
// advisor turns outside the structured job search. Request/response
// shuttling only; the assistant's behavior lives in the system prompt.

use crate::config::get_config;
use crate::errors::{JobchatError, JobchatResult};
use reqwest::Client;
use serde_json::{json, Value};

/// Persona and guidance rules for the conversational assistant.
pub const SYSTEM_PROMPT: &str = "You are a career advisor specializing in helping women find job opportunities. \
Your goal is to provide personalized job recommendations based on the user's experience, skills, and preferences.\n\n\
Follow these guidelines:\n\
1. Ask about their background, skills, and interests if not provided\n\
2. Suggest specific job roles that match their profile\n\
3. Be encouraging and empowering\n\
4. Provide actionable advice for career transitions\n\
5. Focus on roles where women are traditionally underrepresented if the user shows interest\n\
6. Suggest resources for skill development if needed\n\n\
Keep your responses concise, supportive, and focused on providing valuable career guidance.";

#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_config() -> Self {
        let config = get_config();
        Self::new(config.chat_url, config.api_key, config.model)
    }

    /// Sends the conversation to the completion endpoint and returns the
    /// assistant's reply text.
    pub async fn complete(&self, user_input: &str, history: &[Value]) -> JobchatResult<String> {
        let mut messages = vec![json!({ "role": "system", "content": SYSTEM_PROMPT })];
        messages.extend(history.iter().cloned());
        messages.push(json!({ "role": "user", "content": user_input }));

        let payload = json!({
            "model": self.model,
            "messages": messages,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| JobchatError::api_error(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(JobchatError::api_error(format!(
                "API returned error: {} - {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| JobchatError::api_error(format!("Failed to parse API response: {}", e)))?;

        if let Some(error) = body["error"].as_object() {
            return Err(JobchatError::api_error(format!(
                "{}: {}",
                error["type"].as_str().unwrap_or("unknown"),
                error["message"].as_str().unwrap_or("no message")
            )));
        }

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| JobchatError::api_error("Response missing expected content"))?
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_completion_extracts_choice_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Tell me about your skills." } }
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(
            format!("{}/v1/chat/completions", mock_server.uri()),
            "test-key",
            "gpt-4o",
        );
        let reply = client.complete("I want a new role", &[]).await.unwrap();
        assert_eq!(reply, "Tell me about your skills.");
    }

    #[tokio::test]
    async fn test_completion_non_success_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(mock_server.uri(), "test-key", "gpt-4o");
        let result = client.complete("hello", &[]).await;
        assert!(matches!(result, Err(JobchatError::Completion(_))));
    }

    #[test]
    fn test_system_prompt_names_the_persona() {
        assert!(SYSTEM_PROMPT.starts_with("You are a career advisor"));
        assert!(SYSTEM_PROMPT.contains("underrepresented"));
    }
}
