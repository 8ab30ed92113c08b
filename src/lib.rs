//! # Park Menu Telegram Bot
//!
//! A Telegram bot for the park: a fixed menu tree, static price lists and
//! forms delivered from disk, and keyword search over the park website and
//! its Telegram group with paginated results.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod media;
pub mod menu;
pub mod search;
pub mod transport;
