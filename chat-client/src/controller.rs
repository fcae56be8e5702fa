//! Chat controller: drives one exchange from user input to recorded reply.

use shared::{iso_timestamp, ChatRequest, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

use crate::session::{ChatTurn, SessionState, ERROR_REPLY};
use crate::transport::ChatTransport;
use crate::ClientError;

/// Result of a `send_message` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input or an exchange already in flight; nothing happened.
    Skipped,
    /// An AI turn with the reply was appended.
    Answered,
    /// An error turn was appended.
    Failed,
}

/// Clears the pending flag when the exchange ends, however it ends.
struct PendingGuard {
    state: Arc<Mutex<SessionState>>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_pending(false);
    }
}

/// Owns a session and the transport used to talk to the tutor.
pub struct ChatController<T> {
    state: Arc<Mutex<SessionState>>,
    transport: T,
}

impl<T: ChatTransport> ChatController<T> {
    pub fn new(transport: T) -> Self {
        Self::with_state(transport, SessionState::default())
    }

    pub fn with_state(transport: T, state: SessionState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            transport,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current session state.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn turns(&self) -> Vec<ChatTurn> {
        self.lock().turns().to_vec()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        self.lock().set_draft(draft);
    }

    /// Remove every turn. Subject and grade stay as they are.
    pub fn clear_chat(&self) {
        self.lock().clear();
    }

    /// Takes effect from the next `send_message`.
    pub fn change_subject(&self, subject: &str) -> Result<(), ClientError> {
        self.lock().set_subject(subject)
    }

    /// Takes effect from the next `send_message`.
    pub fn change_grade(&self, grade: &str) -> Result<(), ClientError> {
        self.lock().set_grade(grade)
    }

    /// Send `text` to the tutor and record the outcome.
    ///
    /// The user turn is appended before the request goes out and exactly one AI
    /// turn after it completes. The context sent with the request is taken from
    /// the turns that existed before this message.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let request = {
            let mut state = self.lock();
            if text.trim().is_empty() || state.is_pending() {
                debug!(pending = state.is_pending(), "Ignoring send");
                return SendOutcome::Skipped;
            }

            let request = ChatRequest {
                message: text.to_string(),
                subject: state.subject().to_string(),
                grade: state.grade().to_string(),
                context: state.context_window(),
            };
            state.push_turn(Sender::User, text, iso_timestamp(), false);
            state.set_draft(String::new());
            state.set_pending(true);
            request
        };
        let pending = PendingGuard {
            state: Arc::clone(&self.state),
        };

        let result = match self.transport.send(&request).await {
            Ok(reply) if reply.success => Ok(reply),
            Ok(_) => Err(ClientError::Rejected),
            Err(e) => Err(e),
        };

        let outcome = {
            let mut state = self.lock();
            match result {
                Ok(reply) => {
                    let timestamp = if reply.timestamp.is_empty() {
                        iso_timestamp()
                    } else {
                        reply.timestamp
                    };
                    state.push_turn(Sender::Ai, reply.response, timestamp, false);
                    SendOutcome::Answered
                }
                Err(e) => {
                    error!(error = %e, "Error sending message");
                    state.push_turn(Sender::Ai, ERROR_REPLY, iso_timestamp(), true);
                    SendOutcome::Failed
                }
            }
        };

        drop(pending);
        outcome
    }
}
