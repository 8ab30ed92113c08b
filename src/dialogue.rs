//! Conversation state kept per chat: the pending search mode and the cached
//! result list being paged through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use teloxide::dispatching::dialogue::{InMemStorage, InMemStorageError, Storage};
use teloxide::types::ChatId;
use tracing::warn;

use crate::search::SearchKind;

/// Whether the next text message from a chat is a search keyword
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatMode {
    #[default]
    Idle,
    AwaitingSiteSearchQuery,
    AwaitingGroupSearchQuery,
}

impl ChatMode {
    /// Mode entered when the user picks a search entry
    pub fn awaiting(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Site => ChatMode::AwaitingSiteSearchQuery,
            SearchKind::Group => ChatMode::AwaitingGroupSearchQuery,
        }
    }

    /// The search the next text message should run, if any
    pub fn pending_search(self) -> Option<SearchKind> {
        match self {
            ChatMode::Idle => None,
            ChatMode::AwaitingSiteSearchQuery => Some(SearchKind::Site),
            ChatMode::AwaitingGroupSearchQuery => Some(SearchKind::Group),
        }
    }
}

/// Results of the most recent search and the item currently on screen
///
/// A session is never empty and its cursor always points at a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSession")]
pub struct SearchSession {
    kind: SearchKind,
    results: Vec<String>,
    cursor: usize,
}

/// Unchecked shape of a session as read back from storage
#[derive(Deserialize)]
struct StoredSession {
    kind: SearchKind,
    results: Vec<String>,
    cursor: usize,
}

impl TryFrom<StoredSession> for SearchSession {
    type Error = String;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        if stored.cursor >= stored.results.len() {
            return Err(format!(
                "cursor {} out of range for {} results",
                stored.cursor,
                stored.results.len()
            ));
        }
        Ok(Self {
            kind: stored.kind,
            results: stored.results,
            cursor: stored.cursor,
        })
    }
}

impl SearchSession {
    /// Start a session on the first result; `None` for an empty result list
    pub fn new(kind: SearchKind, results: Vec<String>) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            results,
            cursor: 0,
        })
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    /// Zero-based index of the displayed result
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn current(&self) -> &str {
        &self.results[self.cursor]
    }

    /// Move to the next result, or `None` once the last one was shown
    pub fn advance(mut self) -> Option<Self> {
        if self.cursor + 1 >= self.results.len() {
            return None;
        }
        self.cursor += 1;
        Some(self)
    }
}

/// Everything the bot remembers about one chat
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatState {
    pub mode: ChatMode,
    pub session: Option<SearchSession>,
}

/// Storage for per-chat state
///
/// Updates of one chat are handled one at a time by the dispatcher, so a
/// `get` followed by a `put` for the same chat is not interleaved with
/// another update of that chat.
#[async_trait]
pub trait ChatStateStore: Send + Sync {
    /// State of a chat, the default state if none was stored
    async fn get(&self, chat_id: ChatId) -> ChatState;
    /// Replace the state of a chat
    async fn put(&self, chat_id: ChatId, state: ChatState);
}

/// Process-lifetime store on top of teloxide's dialogue storage
///
/// Chats in the default state have no entry.
#[derive(Clone)]
pub struct InMemChatStore {
    storage: Arc<InMemStorage<ChatState>>,
}

impl InMemChatStore {
    pub fn new() -> Self {
        Self::with_storage(InMemStorage::new())
    }

    /// Share an existing dialogue storage
    pub fn with_storage(storage: Arc<InMemStorage<ChatState>>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> Arc<InMemStorage<ChatState>> {
        Arc::clone(&self.storage)
    }
}

impl Default for InMemChatStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatStateStore for InMemChatStore {
    async fn get(&self, chat_id: ChatId) -> ChatState {
        match self.storage().get_dialogue(chat_id).await {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Failed to read chat state");
                ChatState::default()
            }
        }
    }

    async fn put(&self, chat_id: ChatId, state: ChatState) {
        let result = if state == ChatState::default() {
            match self.storage().remove_dialogue(chat_id).await {
                Err(InMemStorageError::DialogueNotFound) => Ok(()),
                other => other,
            }
        } else {
            self.storage().update_dialogue(chat_id, state).await
        };

        if let Err(e) = result {
            warn!(chat_id = %chat_id, error = %e, "Failed to store chat state");
        }
    }
}
