//! # Search Module
//!
//! The two external search backends the bot forwards keywords to:
//! - `site`: full-text search on the park website, scraped from HTML
//! - `group`: message search in the Telegram group, run through a script

pub mod group;
pub mod site;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SearchError;
use crate::menu::CallbackAction;

pub use group::{parse_script_output, GroupHit, GroupSearch};
pub use site::{extract_result_links, trim_keyword, SiteSearch};

/// Which backend a search runs against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    Site,
    Group,
}

impl SearchKind {
    /// Callback emitted by the "next" button of this kind of results
    pub fn next_action(self) -> CallbackAction {
        match self {
            SearchKind::Site => CallbackAction::NextArticle,
            SearchKind::Group => CallbackAction::NextGroupArticle,
        }
    }

    /// Inverse of [`SearchKind::next_action`]
    pub fn from_next_action(action: CallbackAction) -> Option<Self> {
        match action {
            CallbackAction::NextArticle => Some(SearchKind::Site),
            CallbackAction::NextGroupArticle => Some(SearchKind::Group),
            _ => None,
        }
    }

    /// Localization key of the keyword prompt
    pub fn prompt_key(self) -> &'static str {
        match self {
            SearchKind::Site => "site-search-prompt",
            SearchKind::Group => "group-search-prompt",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKind::Site => write!(f, "site"),
            SearchKind::Group => write!(f, "group"),
        }
    }
}

/// A backend turning a keyword into an ordered list of result links
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<String>, SearchError>;
}
