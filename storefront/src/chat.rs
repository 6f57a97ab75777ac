//! Chat assistant transcript.
//!
//! Each prompt is a stateless backend call; the transcript only lives in
//! memory.

use crate::api::ApiError;
use crate::environment::StorefrontEnvironment;
use chrono::{DateTime, Utc};
use ticket_booth_core::{async_effect, smallvec, Effect, Reducer, SmallVec};

/// Shown when the assistant cannot answer
pub const APOLOGY: &str = "Sorry, there was a problem. Make sure the server is running.";

/// Who wrote a message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    /// The visitor
    Sent,
    /// The assistant
    Received,
}

/// One transcript entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Author
    pub role: ChatRole,
    /// Text
    pub text: String,
    /// When it was added
    pub at: DateTime<Utc>,
}

/// Chat transcript
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    pending: usize,
}

impl ChatState {
    /// Messages in order
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether an answer is still outstanding
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        self.pending > 0
    }
}

/// Chat actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatAction {
    /// Send a prompt; blank prompts are ignored
    Send(String),
    /// The assistant answered
    Replied {
        /// Reply text or failure
        result: Result<String, ApiError>,
    },
}

/// Reducer for the chat transcript
#[derive(Clone, Debug, Default)]
pub struct ChatReducer;

impl ChatReducer {
    /// Creates the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ChatReducer {
    type State = ChatState;
    type Action = ChatAction;
    type Environment = StorefrontEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ChatAction::Send(prompt) => {
                let prompt = prompt.trim().to_string();
                if prompt.is_empty() {
                    return SmallVec::new();
                }

                state.messages.push(ChatMessage {
                    role: ChatRole::Sent,
                    text: prompt.clone(),
                    at: env.clock.now(),
                });
                state.pending += 1;

                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = api.chat(&prompt).await;
                    Some(ChatAction::Replied { result })
                }]
            },

            ChatAction::Replied { result } => {
                state.pending = state.pending.saturating_sub(1);
                let text = match result {
                    Ok(text) if !text.trim().is_empty() => text,
                    Ok(_) => APOLOGY.to_string(),
                    Err(e) => {
                        tracing::warn!(error = %e, "Chat request failed");
                        APOLOGY.to_string()
                    },
                };

                state.messages.push(ChatMessage {
                    role: ChatRole::Received,
                    text,
                    at: env.clock.now(),
                });
                SmallVec::new()
            },
        }
    }
}
