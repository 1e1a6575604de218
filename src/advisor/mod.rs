pub mod backend;
pub mod models;
pub mod prompt;

use anyhow::Result;
use tracing::debug;

use backend::ChatBackend;
use models::ChatMessage;

/// A multi-turn conversation with the analysis model.
///
/// The full history is replayed on every turn so follow-up questions can
/// reference earlier data and recommendations.
pub struct AdvisorSession {
    backend: Box<dyn ChatBackend>,
    messages: Vec<ChatMessage>,
}

impl AdvisorSession {
    pub fn new(backend: Box<dyn ChatBackend>) -> Self {
        Self {
            backend,
            messages: vec![ChatMessage::system(prompt::SYSTEM_MESSAGE)],
        }
    }

    /// Send one user message and return the model's reply.
    pub async fn send(&mut self, content: &str) -> Result<String> {
        self.messages.push(ChatMessage::user(content));
        let reply = self.backend.complete(&self.messages).await?;
        self.messages.push(ChatMessage::assistant(reply.clone()));

        debug!(
            model = self.backend.model_name(),
            turns = self.messages.len(),
            "Advisor turn completed"
        );
        Ok(reply)
    }

    /// Number of messages in the history, including the system message.
    pub fn history_len(&self) -> usize {
        self.messages.len()
    }
}
