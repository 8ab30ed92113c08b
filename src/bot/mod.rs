//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `conversation`: The per-chat state machine and its collaborators
//! - `message_handler`: Handles incoming text messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats messages
//! - `telegram`: Sends the resulting actions through the Bot API

pub mod callback_handler;
pub mod conversation;
pub mod message_handler;
pub mod telegram;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

pub use conversation::Conversation;
pub use telegram::TelegramTransport;
