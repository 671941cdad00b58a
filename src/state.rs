//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the store accessors, the chat dispatcher, and a map of open
//! chat sessions. Each session owns one conversation and a cancel signal
//! that aborts its in-flight completion when the session is closed.
//! Every lookup stamps the session as active; sessions idle past a limit
//! are evicted by the background sweeper.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::services::chat::{ChatDispatcher, ChatError};
use crate::services::conversation::Conversation;
use crate::store::StoreData;

// =============================================================================
// CHAT SESSION
// =============================================================================

/// One open chat. The conversation lock is only held to begin or finish a
/// turn, never across network I/O.
pub struct ChatSession {
    pub conversation: Mutex<Conversation>,
    cancel: watch::Sender<bool>,
    last_active: StdMutex<Instant>,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        let (cancel, _) = watch::channel(false);
        Self { conversation: Mutex::new(Conversation::new()), cancel, last_active: StdMutex::new(Instant::now()) }
    }

    /// Mark the session as used now.
    pub fn touch(&self) {
        *self.last_active.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// True while a turn holds the conversation or has it marked loading.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.conversation
            .try_lock()
            .map_or(true, |conv| conv.is_loading())
    }

    /// Receiver handed to each turn's completion call.
    #[must_use]
    pub fn cancel_receiver(&self) -> watch::Receiver<bool> {
        self.cancel.subscribe()
    }

    /// Abort whatever turn is in flight.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StoreData>,
    pub chat: Arc<ChatDispatcher>,
    pub sessions: Arc<RwLock<HashMap<Uuid, Arc<ChatSession>>>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn StoreData>, chat: ChatDispatcher) -> Self {
        Self { store, chat: Arc::new(chat), sessions: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Open a session seeded with the greeting.
    pub async fn open_session(&self) -> (Uuid, Arc<ChatSession>) {
        let id = Uuid::new_v4();
        let session = Arc::new(ChatSession::new());
        self.sessions.write().await.insert(id, session.clone());
        (id, session)
    }

    /// Look up an open session and mark it active.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionNotFound`] for unknown or closed ids.
    pub async fn session(&self, id: Uuid) -> Result<Arc<ChatSession>, ChatError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .inspect(|session| session.touch())
            .ok_or(ChatError::SessionNotFound(id))
    }

    /// Discard a session and cancel its in-flight turn, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::SessionNotFound`] for unknown or closed ids.
    pub async fn close_session(&self, id: Uuid) -> Result<(), ChatError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(ChatError::SessionNotFound(id))?;
        session.cancel();
        Ok(())
    }

    /// Close every session idle for at least `max_idle` with no turn in
    /// flight. Returns the evicted ids.
    pub async fn evict_idle(&self, max_idle: Duration) -> Vec<Uuid> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, session)| session.idle_for() >= max_idle && !session.is_busy())
            .map(|(id, _)| *id)
            .collect();
        for id in &idle {
            if let Some(session) = sessions.remove(id) {
                session.cancel();
            }
        }
        idle
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::llm::types::ChatCompletion;
    use crate::services::chat::FallbackPolicy;
    use crate::store::{AgentChat, MockStore};

    /// App state over mock store data with no completion client.
    #[must_use]
    pub fn test_app_state() -> AppState {
        let chat = ChatDispatcher::new(None, Arc::new(MockStore), Arc::new(MockStore), FallbackPolicy::default());
        AppState::new(Arc::new(MockStore), chat)
    }

    /// App state with explicit chat collaborators.
    #[must_use]
    pub fn test_app_state_with(
        completion: Option<Arc<dyn ChatCompletion>>,
        agent: Arc<dyn AgentChat>,
        policy: FallbackPolicy,
    ) -> AppState {
        let chat = ChatDispatcher::new(completion, Arc::new(MockStore), agent, policy);
        AppState::new(Arc::new(MockStore), chat)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
