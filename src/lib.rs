//! # PCBuilderAI
//!
//! A PC building assistant. Picks a system prompt from the caller's declared
//! experience level, injects it once at the head of the conversation, and
//! forwards the history to a chat model.

pub mod config;
pub mod error;
pub mod graph;
pub mod node;
pub mod provider;
pub mod types;

mod prompts;

// Re-exports
pub use config::{Configuration, ExperienceLevel};
pub use error::{PcBuilderError, Result};
pub use graph::{Graph, MessagesState};
pub use node::{with_system_message, PcBuilderNode};
pub use prompts::{system_prompt, system_prompt_for_tag};
pub use provider::{ChatModel, OpenAiChatModel};
pub use types::{ChatCompletion, Message, ModelConfig, Role, Usage};
