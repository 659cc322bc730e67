use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Failure of a chat-completion request
#[derive(Debug)]
pub enum AiRequestError {
    /// Request could not be sent or the body not read
    Transport(String),
    /// Endpoint answered with a non-success status
    Status { status: u16, body: String },
    /// Body is not a chat-completion response
    Decode(String),
    /// Response carried no completion text
    EmptyCompletion,
}

impl fmt::Display for AiRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiRequestError::Transport(msg) => write!(f, "AI request failed: {}", msg),
            AiRequestError::Status { status, body } => {
                write!(f, "AI endpoint returned status {}: {}", status, body)
            }
            AiRequestError::Decode(msg) => write!(f, "Failed to parse AI response: {}", msg),
            AiRequestError::EmptyCompletion => write!(f, "AI response has no content"),
        }
    }
}

impl std::error::Error for AiRequestError {}

/// A single prompt-in, text-out exchange with a text-generation endpoint
#[allow(async_fn_in_trait)]
pub trait ChatCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, AiRequestError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion client for OpenAI-compatible endpoints
pub struct HttpChatClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    model: String,
}

impl HttpChatClient {
    /// `base_url` is the API root; `/chat/completions` is appended to it
    pub fn new(base_url: &str, token: &str, model: &str, timeout: Duration) -> Result<Self, AiRequestError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiRequestError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: completions_endpoint(base_url),
            token: token.to_string(),
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Join the API root and the chat-completions path
pub fn completions_endpoint(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{}/chat/completions", base)
    }
}

/// Extract the first completion text from a chat-completion response body
pub fn parse_completion(body: &[u8]) -> Result<String, AiRequestError> {
    let response: ChatResponse =
        serde_json::from_slice(body).map_err(|e| AiRequestError::Decode(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(AiRequestError::EmptyCompletion)
}

impl ChatCompletion for HttpChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiRequestError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiRequestError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AiRequestError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AiRequestError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        parse_completion(&body)
    }
}
