//! The per-chat conversation state machine.
//!
//! Text messages are handled in `message_handler`, inline button callbacks
//! in `callback_handler`; both mutate chat state only through the
//! `ChatStateStore` owned here.

use std::sync::Arc;
use teloxide::types::ChatId;

use crate::config::ContentPaths;
use crate::dialogue::ChatStateStore;
use crate::errors::TransportError;
use crate::localization::t;
use crate::menu::main_menu;
use crate::search::{SearchKind, Searcher};
use crate::transport::ChatTransport;

/// Decides what to do with inbound updates and performs the outbound actions
pub struct Conversation {
    pub(super) transport: Arc<dyn ChatTransport>,
    pub(super) store: Arc<dyn ChatStateStore>,
    site_search: Arc<dyn Searcher>,
    group_search: Arc<dyn Searcher>,
    pub(super) content: ContentPaths,
}

impl Conversation {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        store: Arc<dyn ChatStateStore>,
        site_search: Arc<dyn Searcher>,
        group_search: Arc<dyn Searcher>,
        content: ContentPaths,
    ) -> Self {
        Self {
            transport,
            store,
            site_search,
            group_search,
            content,
        }
    }

    pub(super) fn searcher(&self, kind: SearchKind) -> &dyn Searcher {
        match kind {
            SearchKind::Site => self.site_search.as_ref(),
            SearchKind::Group => self.group_search.as_ref(),
        }
    }

    /// Send the main reply keyboard with the given prompt
    pub(super) async fn show_main_menu(
        &self,
        chat_id: ChatId,
        prompt_key: &str,
    ) -> Result<(), TransportError> {
        self.transport
            .send_text(chat_id, &t(prompt_key), Some(main_menu()))
            .await?;
        Ok(())
    }
}
