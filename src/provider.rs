//! Chat model providers
//!
//! The node talks to the model only through [`ChatModel`], so tests and
//! alternative backends can be swapped in at construction time.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::{Duration, Instant};

use crate::error::{PcBuilderError, Result};
use crate::types::{ChatCompletion, Message, ModelConfig, Role, Usage};

/// A language model that answers a full message history with one reply
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logging
    fn model_id(&self) -> &str;

    /// Generate the next assistant reply for `messages`
    async fn complete(&self, messages: &[Message]) -> Result<ChatCompletion>;
}

/// [`ChatModel`] backed by an OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct OpenAiChatModel {
    config: ModelConfig,
    client: Client<OpenAIConfig>,
}

impl OpenAiChatModel {
    /// Create a client from `config`
    ///
    /// Falls back to `OPENAI_API_KEY` when no key is configured. A custom
    /// base URL without a key is assumed to be a local server (e.g. Ollama).
    pub fn new(config: ModelConfig) -> Result<Self> {
        Self::with_env(config, |key| std::env::var(key).ok())
    }

    fn with_env(config: ModelConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| env("OPENAI_API_KEY").filter(|k| !k.is_empty()));

        let mut openai_config = OpenAIConfig::new();
        match (&config.base_url, api_key) {
            (Some(base_url), Some(key)) => {
                openai_config = openai_config.with_api_base(base_url).with_api_key(key);
            }
            (Some(base_url), None) => {
                // Ollama doesn't need a real key
                openai_config = openai_config.with_api_base(base_url).with_api_key("ollama");
            }
            (None, Some(key)) => {
                openai_config = openai_config.with_api_key(key);
            }
            (None, None) => return Err(PcBuilderError::MissingApiKey),
        }

        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(PcBuilderError::Config(format!(
                "temperature must be between 0 and 2, got {}",
                config.temperature
            )));
        }

        // Rate-limit responses surface as errors instead of being retried
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Ok(Self {
            config,
            client: Client::with_config(openai_config).with_backoff(no_retry),
        })
    }

    fn to_request_message(m: &Message) -> Result<ChatCompletionRequestMessage> {
        let message = match m.role {
            Role::System => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(m.content.clone())
                    .build()?,
            ),
            Role::User => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(m.content.clone())
                    .build()?,
            ),
            Role::Assistant => ChatCompletionRequestMessage::Assistant(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(m.content.clone())
                    .build()?,
            ),
        };
        Ok(message)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, messages: &[Message]) -> Result<ChatCompletion> {
        let start = Instant::now();

        let messages = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature);

        if let Some(max_tokens) = self.config.max_tokens {
            request_builder.max_tokens(max_tokens);
        }

        let request = request_builder.build()?;
        let response = self.client.chat().create(request).await?;

        let choice = response.choices.first().ok_or(PcBuilderError::EmptyResponse)?;
        let content = choice.message.content.clone().unwrap_or_default();

        let usage = response
            .usage
            .map(|u| Usage::new(u.prompt_tokens as u64, u.completion_tokens as u64))
            .unwrap_or_default();

        Ok(ChatCompletion {
            response: content,
            usage,
            execution_time: start.elapsed(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_body(content: &str) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4.1-nano",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop",
                "logprobs": null
            }],
            "usage": { "prompt_tokens": 42, "completion_tokens": 8, "total_tokens": 50 }
        })
    }

    fn model_for(server: &MockServer) -> OpenAiChatModel {
        let config = ModelConfig::default()
            .with_base_url(server.uri())
            .with_api_key("sk-test");
        OpenAiChatModel::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_complete_sends_history_and_parses_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Try a Ryzen 5 7600.")))
            .expect(1)
            .mount(&server)
            .await;

        let model = model_for(&server);
        let history = vec![
            Message::system("You are PCBuilderAI"),
            Message::user("I need a $1000 gaming PC"),
        ];

        let completion = model.complete(&history).await.unwrap();
        assert_eq!(completion.response, "Try a Ryzen 5 7600.");
        assert_eq!(completion.usage, Usage::new(42, 8));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(body["model"], "gpt-4.1-nano");
        let temperature = body["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are PCBuilderAI");
        assert_eq!(messages[1]["role"], "user");
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "message": "Invalid request",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": null
                }
            })))
            .mount(&server)
            .await;

        let model = model_for(&server);
        let err = model.complete(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, PcBuilderError::OpenAi(_)));
        assert!(err.is_provider());
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_response() {
        let server = MockServer::start().await;
        let mut body = completion_body("unused");
        body["choices"] = json!([]);
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let model = model_for(&server);
        let err = model.complete(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, PcBuilderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_rate_limit_fails_after_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "message": "Rate limit reached",
                    "type": "rate_limit_error",
                    "param": null,
                    "code": "rate_limit_exceeded"
                }
            })))
            .mount(&server)
            .await;

        let model = model_for(&server);
        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            model.complete(&[Message::user("hi")]),
        )
        .await
        .expect("rate-limited call should fail without retrying");

        let err = outcome.unwrap_err();
        assert!(matches!(err, PcBuilderError::OpenAi(_)));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[test]
    fn test_missing_api_key() {
        let err = OpenAiChatModel::with_env(ModelConfig::default(), |_| None).err();
        assert!(matches!(err, Some(PcBuilderError::MissingApiKey)));

        // Empty env values count as unset
        let err = OpenAiChatModel::with_env(ModelConfig::default(), |_| Some(String::new())).err();
        assert!(matches!(err, Some(PcBuilderError::MissingApiKey)));
    }

    #[test]
    fn test_api_key_from_env() {
        let model = OpenAiChatModel::with_env(ModelConfig::default(), |key| {
            (key == "OPENAI_API_KEY").then(|| "sk-env".to_string())
        })
        .unwrap();
        assert_eq!(model.model_id(), "gpt-4.1-nano");
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let config = ModelConfig::default()
            .with_api_key("sk-test")
            .with_temperature(3.5);
        assert!(matches!(
            OpenAiChatModel::new(config),
            Err(PcBuilderError::Config(_))
        ));
    }

    #[test]
    fn test_base_url_without_key_is_allowed() {
        let config = ModelConfig::new("llama3").with_base_url("http://localhost:11434/v1");
        let model = OpenAiChatModel::new(config).unwrap();
        assert_eq!(model.model_id(), "llama3");
    }
}
