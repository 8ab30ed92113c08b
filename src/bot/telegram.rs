//! `ChatTransport` over the Telegram Bot API.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use teloxide::prelude::*;
use teloxide::types::{InputFile, InputMedia, InputMediaPhoto, MessageId};
use tracing::{debug, warn};

use super::ui_builder::{to_inline_markup, to_reply_markup};
use crate::errors::TransportError;
use crate::media::album_chunks;
use crate::menu::{InlineKeyboard, Keyboard};
use crate::transport::ChatTransport;

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn send_album_chunk(
        &self,
        chat_id: ChatId,
        chunk: &[PathBuf],
    ) -> Result<(), TransportError> {
        // Media groups need at least two items
        if let [single] = chunk {
            self.bot
                .send_photo(chat_id, InputFile::file(single.clone()))
                .await?;
            return Ok(());
        }

        let media: Vec<InputMedia> = chunk
            .iter()
            .map(|path| InputMedia::Photo(InputMediaPhoto::new(InputFile::file(path.clone()))))
            .collect();
        self.bot.send_media_group(chat_id, media).await?;
        debug!(chat_id = %chat_id, items = chunk.len(), "Sent media group");
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageId, TransportError> {
        let mut request = self.bot.send_message(chat_id, text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_reply_markup(&keyboard)?);
        }
        let message = request.await?;
        Ok(message.id)
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.edit_message_text(chat_id, message_id, text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_inline_markup(&keyboard)?);
        }
        request.await?;
        Ok(())
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        self.bot.delete_message(chat_id, message_id).await?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.send_document(chat_id, InputFile::file(path));
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        request.await?;
        Ok(())
    }

    async fn send_album(&self, chat_id: ChatId, images: &[PathBuf]) -> Result<(), TransportError> {
        if images.is_empty() {
            return Err(TransportError::InvalidRequest("empty album".to_string()));
        }

        let mut delivered = 0;
        for chunk in album_chunks(images) {
            if let Err(e) = self.send_album_chunk(chat_id, chunk).await {
                warn!(
                    chat_id = %chat_id,
                    delivered,
                    total = images.len(),
                    "Album send failed part-way"
                );
                return Err(interrupted(e, delivered, images.len()));
            }
            delivered += chunk.len();
        }

        Ok(())
    }
}

/// Report a chunk failure, noting earlier chunks that already went out
fn interrupted(err: TransportError, delivered: usize, total: usize) -> TransportError {
    if delivered == 0 {
        return err;
    }
    TransportError::AlbumInterrupted {
        delivered,
        total,
        message: err.to_string(),
    }
}
