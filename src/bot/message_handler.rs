//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info, warn};

// Import localization
use crate::localization::{t, t_args};

// Import dialogue types
use crate::dialogue::{ChatMode, ChatState, SearchSession};

// Import menu catalog
use crate::menu::{main_menu, Keyboard, TopLevelInput};
use crate::search::SearchKind;

use super::conversation::Conversation;

// Import UI builder functions
use super::ui_builder::{create_result_keyboard, format_result_page};

impl Conversation {
    /// Handle a text message from a chat
    pub async fn on_text_message(&self, chat_id: ChatId, text: &str) -> Result<()> {
        debug!(chat_id = %chat_id, message_length = text.len(), "Received text message");

        let state = self.store.get(chat_id).await;
        match state.mode.pending_search() {
            Some(kind) => self.run_search(chat_id, kind, text, state).await,
            None => self.handle_menu_input(chat_id, text, state).await,
        }
    }

    async fn run_search(
        &self,
        chat_id: ChatId,
        kind: SearchKind,
        keyword: &str,
        mut state: ChatState,
    ) -> Result<()> {
        info!(chat_id = %chat_id, kind = %kind, keyword = %keyword, "Running search");

        let placeholder = match self
            .transport
            .send_text(chat_id, &t_args("searching", &[("keyword", keyword)]), None)
            .await
        {
            Ok(message_id) => Some(message_id),
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Failed to send searching notice");
                None
            }
        };

        let outcome = self.searcher(kind).search(keyword).await;

        if let Some(message_id) = placeholder {
            if let Err(e) = self.transport.delete_message(chat_id, message_id).await {
                warn!(chat_id = %chat_id, error = %e, "Failed to delete searching notice");
            }
        }

        let session = match outcome {
            Ok(links) => SearchSession::new(kind, links),
            Err(e) => {
                warn!(chat_id = %chat_id, kind = %kind, error = %e, "Search failed");
                None
            }
        };

        // The pending mode is consumed by this search whatever the outcome
        state.mode = ChatMode::Idle;

        match session {
            Some(session) => {
                info!(chat_id = %chat_id, results = session.len(), "Search returned results");
                let page = format_result_page(&session);
                state.session = Some(session);
                self.store.put(chat_id, state).await;

                self.transport
                    .send_text(
                        chat_id,
                        &page,
                        Some(Keyboard::Inline(create_result_keyboard(kind))),
                    )
                    .await?;
            }
            None => {
                state.session = None;
                self.store.put(chat_id, state).await;

                self.transport
                    .send_text(chat_id, &t("nothing-found"), None)
                    .await?;
            }
        }

        Ok(())
    }

    async fn handle_menu_input(
        &self,
        chat_id: ChatId,
        text: &str,
        mut state: ChatState,
    ) -> Result<()> {
        let Some(input) = TopLevelInput::parse(text) else {
            debug!(chat_id = %chat_id, "Ignoring unrecognized text");
            return Ok(());
        };

        match input {
            TopLevelInput::Start => {
                info!(chat_id = %chat_id, "Received /start command");
                self.transport
                    .send_text(chat_id, &t("greeting"), Some(main_menu()))
                    .await?;
            }
            TopLevelInput::Open(menu) => {
                debug!(chat_id = %chat_id, menu = ?menu, "Opening sub-menu");
                self.transport
                    .send_text(chat_id, &t(menu.caption_key()), None)
                    .await?;
                self.transport
                    .send_text(
                        chat_id,
                        &t("choose-category"),
                        Some(Keyboard::Inline(menu.keyboard())),
                    )
                    .await?;
            }
            TopLevelInput::SiteSearch | TopLevelInput::GroupSearch => {
                let kind = if input == TopLevelInput::SiteSearch {
                    SearchKind::Site
                } else {
                    SearchKind::Group
                };
                state.mode = ChatMode::awaiting(kind);
                self.store.put(chat_id, state).await;

                self.transport
                    .send_text(chat_id, &t(kind.prompt_key()), None)
                    .await?;
            }
        }

        Ok(())
    }
}

/// Dispatcher endpoint for messages
pub async fn message_handler(msg: Message, conversation: Arc<Conversation>) -> Result<()> {
    match msg.text() {
        Some(text) => conversation.on_text_message(msg.chat.id, text).await,
        None => {
            debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
            Ok(())
        }
    }
}
