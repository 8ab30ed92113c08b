//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::t;

use crate::media::{ensure_document, list_images};
use crate::menu::CallbackAction;
use crate::search::SearchKind;

use super::conversation::Conversation;

// Import UI builder functions
use super::ui_builder::{create_exhausted_keyboard, create_result_keyboard, format_result_page};

impl Conversation {
    /// Handle an inline button press on `message_id`
    pub async fn on_callback(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        data: &str,
    ) -> Result<()> {
        let Some(action) = CallbackAction::parse(data) else {
            debug!(chat_id = %chat_id, data = %data, "Ignoring unknown callback data");
            return Ok(());
        };
        debug!(chat_id = %chat_id, action = ?action, "Received callback");

        match action {
            CallbackAction::PriceList => {
                let dir = self.content.sales_photos.clone();
                self.deliver_album(chat_id, &dir).await
            }
            CallbackAction::AttractionList => {
                let dir = self.content.attraction_photos.clone();
                self.deliver_album(chat_id, &dir).await
            }
            CallbackAction::ApplicationForm => self.deliver_application_form(chat_id).await,
            CallbackAction::NextArticle | CallbackAction::NextGroupArticle => {
                match SearchKind::from_next_action(action) {
                    Some(kind) => self.show_next_result(chat_id, message_id, kind).await,
                    None => Ok(()),
                }
            }
            CallbackAction::Back => self.go_back(chat_id, message_id).await,
        }
    }

    async fn deliver_album(&self, chat_id: ChatId, dir: &Path) -> Result<()> {
        let images = match list_images(dir) {
            Ok(images) => images,
            Err(e) => {
                error!(chat_id = %chat_id, error = %e, "Failed to get images");
                self.transport
                    .send_text(chat_id, &t("documents-failed"), None)
                    .await?;
                return Ok(());
            }
        };

        if let Err(e) = self.transport.send_album(chat_id, &images).await {
            error!(
                chat_id = %chat_id,
                error = %e,
                delivered = e.delivered_images(),
                total = images.len(),
                "Failed to send album"
            );
            self.transport
                .send_text(chat_id, &t("photos-failed"), None)
                .await?;
            return Ok(());
        }

        info!(chat_id = %chat_id, images = images.len(), dir = %dir.display(), "Album sent");
        self.show_main_menu(chat_id, "choose-section").await?;
        Ok(())
    }

    async fn deliver_application_form(&self, chat_id: ChatId) -> Result<()> {
        let path = &self.content.application_form;

        let sent = match ensure_document(path) {
            Ok(()) => self
                .transport
                .send_document(chat_id, path, None)
                .await
                .map_err(anyhow::Error::from),
            Err(e) => Err(e.into()),
        };

        if let Err(e) = sent {
            error!(chat_id = %chat_id, error = %e, "Failed to send application form");
            self.transport
                .send_text(chat_id, &t("documents-failed"), None)
                .await?;
            return Ok(());
        }

        self.transport
            .send_text(chat_id, &t("application-caption"), None)
            .await?;
        info!(chat_id = %chat_id, "Application form sent");
        self.show_main_menu(chat_id, "choose-section").await?;
        Ok(())
    }

    async fn show_next_result(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        kind: SearchKind,
    ) -> Result<()> {
        let mut state = self.store.get(chat_id).await;

        // A session of the other kind is left alone
        let matching = state
            .session
            .as_ref()
            .is_some_and(|session| session.kind() == kind);
        if matching {
            state.session = state.session.take().and_then(|session| session.advance());
            self.store.put(chat_id, state.clone()).await;
        }

        let edit = match state.session.as_ref().filter(|_| matching) {
            Some(session) => {
                self.transport
                    .edit_text(
                        chat_id,
                        message_id,
                        &format_result_page(session),
                        Some(create_result_keyboard(kind)),
                    )
                    .await
            }
            None => {
                debug!(chat_id = %chat_id, "No more results");
                self.transport
                    .edit_text(
                        chat_id,
                        message_id,
                        &t("no-more-articles"),
                        Some(create_exhausted_keyboard()),
                    )
                    .await
            }
        };

        if let Err(e) = edit {
            error!(chat_id = %chat_id, error = %e, "Failed to edit search result message");
        }
        Ok(())
    }

    async fn go_back(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        if let Err(e) = self.transport.delete_message(chat_id, message_id).await {
            warn!(chat_id = %chat_id, error = %e, "Failed to delete menu message");
        }
        self.show_main_menu(chat_id, "choose-section").await?;
        Ok(())
    }
}

/// Dispatcher endpoint for callback queries
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    conversation: Arc<Conversation>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let result = match (&q.message, q.data.as_deref()) {
        (Some(msg), Some(data)) => conversation.on_callback(msg.chat().id, msg.id(), data).await,
        _ => Ok(()),
    };

    // Answer the callback query to remove the loading state
    if let Err(e) = bot.answer_callback_query(q.id).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    result
}
