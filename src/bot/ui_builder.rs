//! UI Builder module for creating keyboards and formatting messages

use reqwest::Url;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

use crate::dialogue::SearchSession;
use crate::errors::TransportError;
use crate::menu::{
    CallbackAction, InlineKeyboard, Keyboard, MenuAction, MenuEntry, BACK_TO_MENU_LABEL,
    NEXT_LABEL,
};
use crate::search::SearchKind;

/// Format the result on screen as `"{position}/{total}\n{link}"`
pub fn format_result_page(session: &SearchSession) -> String {
    format!(
        "{}/{}\n{}",
        session.cursor() + 1,
        session.len(),
        session.current()
    )
}

/// Next + back buttons under a search result
pub fn create_result_keyboard(kind: SearchKind) -> InlineKeyboard {
    InlineKeyboard::single_row(&[
        MenuEntry::callback(NEXT_LABEL, kind.next_action()),
        MenuEntry::callback(BACK_TO_MENU_LABEL, CallbackAction::Back),
    ])
}

/// Only the back button, once there is nothing left to page through
pub fn create_exhausted_keyboard() -> InlineKeyboard {
    InlineKeyboard::single_row(&[MenuEntry::callback(
        BACK_TO_MENU_LABEL,
        CallbackAction::Back,
    )])
}

fn create_inline_button(entry: &MenuEntry) -> Result<InlineKeyboardButton, TransportError> {
    match entry.action {
        MenuAction::Callback(action) => {
            Ok(InlineKeyboardButton::callback(entry.label, action.as_str()))
        }
        MenuAction::OpenUrl(url) => {
            let url = Url::parse(url)
                .map_err(|e| TransportError::InvalidRequest(format!("bad button URL {url}: {e}")))?;
            Ok(InlineKeyboardButton::url(entry.label, url))
        }
    }
}

/// Convert an inline keyboard to its Telegram markup
pub fn to_inline_markup(keyboard: &InlineKeyboard) -> Result<InlineKeyboardMarkup, TransportError> {
    let rows = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(create_inline_button).collect())
        .collect::<Result<Vec<Vec<_>>, _>>()?;

    Ok(InlineKeyboardMarkup::new(rows))
}

/// Convert any keyboard to its Telegram markup
pub fn to_reply_markup(keyboard: &Keyboard) -> Result<ReplyMarkup, TransportError> {
    match keyboard {
        Keyboard::Reply(rows) => {
            let buttons: Vec<Vec<KeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect())
                .collect();
            Ok(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(buttons).resize_keyboard(),
            ))
        }
        Keyboard::Inline(inline) => Ok(ReplyMarkup::InlineKeyboard(to_inline_markup(inline)?)),
    }
}
