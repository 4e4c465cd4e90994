//! Single-node conversation graph
//!
//! `__start__ -> pc_builder_node`. The graph threads a [`MessagesState`]
//! through the node and hands the new state back to the caller, who carries it
//! into the next turn.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::config::Configuration;
use crate::error::Result;
use crate::node::PcBuilderNode;
use crate::provider::{ChatModel, OpenAiChatModel};
use crate::types::{Message, ModelConfig, Role};

/// Conversation state passed into and out of the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesState {
    pub messages: Vec<Message>,
}

impl MessagesState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Most recent assistant reply, if any
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

impl From<Vec<Message>> for MessagesState {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

/// Compiled PCBuilderAI graph
#[derive(Clone)]
pub struct Graph {
    name: String,
    node: PcBuilderNode,
}

impl Graph {
    pub const DEFAULT_NAME: &'static str = "PCBuilderAI Graph";

    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            node: PcBuilderNode::new(model),
        }
    }

    /// Build a graph over an OpenAI-compatible model
    pub fn openai(config: ModelConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(OpenAiChatModel::new(config)?)))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node names in execution order
    pub fn nodes(&self) -> &'static [&'static str] {
        &[PcBuilderNode::NAME]
    }

    /// Run one turn and return the new state
    #[instrument(skip_all, fields(graph = %self.name, messages = state.messages.len()))]
    pub async fn invoke(&self, state: &MessagesState, config: &Configuration) -> Result<MessagesState> {
        let messages = self.node.process(&state.messages, config).await?;
        Ok(MessagesState { messages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExperienceLevel;
    use crate::prompts::system_prompt;
    use crate::provider::testing::ScriptedModel;

    #[test]
    fn test_graph_metadata() {
        let graph = Graph::new(Arc::new(ScriptedModel::replying("ok")));
        assert_eq!(graph.name(), "PCBuilderAI Graph");
        assert_eq!(graph.nodes(), &["pc_builder_node"]);
        assert_eq!(graph.with_name("custom").name(), "custom");
    }

    #[tokio::test]
    async fn test_invoke_multi_turn() {
        let model = Arc::new(ScriptedModel::new(|messages: &[Message]| {
            Ok(format!("reply #{}", messages.len()))
        }));
        let graph = Graph::new(model.clone());
        let config = Configuration::new().with_experience("intermediate");

        let state = MessagesState::new(vec![Message::user(
            "I need help building a gaming PC with a $1000 budget",
        )]);
        let state = graph.invoke(&state, &config).await.unwrap();
        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.last_reply(), Some("reply #2"));

        let mut next = state.clone();
        next.messages.push(Message::user("What about the GPU?"));
        let next = graph.invoke(&next, &config).await.unwrap();

        assert_eq!(next.messages.len(), 5);
        assert_eq!(next.messages[0].content, system_prompt(ExperienceLevel::Intermediate));
        assert_eq!(next.messages[4].role, Role::Assistant);
        assert_eq!(next.last_reply(), Some("reply #4"));
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invoke_failure_leaves_state() {
        let graph = Graph::new(Arc::new(ScriptedModel::failing()));
        let state = MessagesState::new(vec![Message::user("hi")]);

        assert!(graph.invoke(&state, &Configuration::new()).await.is_err());
        assert_eq!(state.messages, vec![Message::user("hi")]);
    }

    #[test]
    fn test_state_serde_shape() {
        let state: MessagesState = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"hi"}]}"#,
        )
        .unwrap();
        assert_eq!(state, MessagesState::from(vec![Message::user("hi")]));
        assert_eq!(state.last_reply(), None);
    }
}
