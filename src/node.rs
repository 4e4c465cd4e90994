use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::error::Result;
use crate::prompts::system_prompt;
use crate::provider::ChatModel;
use crate::types::Message;

/// Return `history` with a system message at its head
///
/// When the first message is already a system message the history is copied
/// as-is and `system_text` is discarded; an existing instruction is never
/// replaced.
pub fn with_system_message(history: &[Message], system_text: &str) -> Vec<Message> {
    match history.first() {
        Some(first) if first.is_system() => history.to_vec(),
        _ => {
            let mut messages = Vec::with_capacity(history.len() + 2);
            messages.push(Message::system(system_text));
            messages.extend_from_slice(history);
            messages
        }
    }
}

/// The PC builder conversation step
///
/// Injects the experience-level instruction once, asks the model for the next
/// reply and returns the extended history.
#[derive(Clone)]
pub struct PcBuilderNode {
    model: Arc<dyn ChatModel>,
}

impl PcBuilderNode {
    pub const NAME: &'static str = "pc_builder_node";

    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Run one conversation turn
    ///
    /// The caller's history is only borrowed. On provider failure the error is
    /// returned unchanged and no history is produced.
    pub async fn process(&self, history: &[Message], config: &Configuration) -> Result<Vec<Message>> {
        let experience = config.experience();
        let system_text = system_prompt(experience);

        let mut messages = with_system_message(history, system_text);
        debug!(
            %experience,
            injected = messages.len() > history.len(),
            history_len = history.len(),
            "prepared messages"
        );

        let completion = match self.model.complete(&messages).await {
            Ok(completion) => completion,
            Err(e) => {
                warn!(model = self.model.model_id(), error = %e, "model call failed");
                return Err(e);
            }
        };

        info!(
            model = self.model.model_id(),
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            elapsed = ?completion.execution_time,
            "model replied"
        );

        messages.push(Message::assistant(completion.response));
        Ok(messages)
    }
}
