//! The outbound side of the chat, as seen by the conversation state machine.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use teloxide::types::{ChatId, MessageId};

use crate::errors::TransportError;
use crate::menu::{InlineKeyboard, Keyboard};

/// Actions the bot can perform in a chat
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a text message, returning the id of the new message
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageId, TransportError>;

    /// Replace the text and inline keyboard of a message sent earlier
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), TransportError>;

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError>;

    /// Upload a local file as a document
    async fn send_document(
        &self,
        chat_id: ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<(), TransportError>;

    /// Upload local images as one or more photo albums
    async fn send_album(&self, chat_id: ChatId, images: &[PathBuf]) -> Result<(), TransportError>;
}
