//! Website search: `GET <base>?s=<keyword>` and scrape the result cards.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::Searcher;
use crate::config::SiteSearchConfig;
use crate::errors::SearchError;

/// Opening `div` tags with their class attribute
static DIV_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*?\bclass\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("div pattern is valid")
});

/// Any opening or closing `div` tag
static DIV_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<div\b|</div\s*>").expect("div tag pattern is valid"));

/// First `href` of an anchor tag
static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["']"#).expect("anchor pattern is valid")
});

/// Character references that appear in `href` attributes
static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|amp|quot|apos|lt|gt);")
        .expect("character reference pattern is valid")
});

/// Classes that mark a result card on the site's search page
const RESULT_CELL_CLASSES: [&str; 2] = ["wf-cell", "iso-item"];

/// Drop the last two characters of longer keywords
///
/// Russian word endings vary by case, so searching the stem matches more
/// articles than the word as typed.
pub fn trim_keyword(keyword: &str) -> String {
    let keyword = keyword.trim();
    let count = keyword.chars().count();
    if count > 2 {
        keyword.chars().take(count - 2).collect()
    } else {
        keyword.to_string()
    }
}

/// Extract the link of every result card, in page order
///
/// A card is a `div` whose class list contains both `wf-cell` and
/// `iso-item`; its link is the first anchor after the card opens and before
/// the card's closing tag. Cards without an anchor are skipped.
pub fn extract_result_links(html: &str) -> Vec<String> {
    let cell_starts: Vec<(usize, usize)> = DIV_OPEN
        .captures_iter(html)
        .filter(|caps| {
            let classes: Vec<&str> = caps[1].split_whitespace().collect();
            RESULT_CELL_CLASSES.iter().all(|class| classes.contains(class))
        })
        .filter_map(|caps| caps.get(0).map(|m| (m.start(), m.end())))
        .collect();

    let mut links = Vec::with_capacity(cell_starts.len());
    for (i, &(_, body_start)) in cell_starts.iter().enumerate() {
        let next_cell = cell_starts
            .get(i + 1)
            .map(|&(next_start, _)| next_start)
            .unwrap_or(html.len());
        let body_end = closing_div(html, body_start).min(next_cell);

        if let Some(caps) = ANCHOR_HREF.captures(&html[body_start..body_end]) {
            links.push(decode_char_refs(&caps[1]));
        }
    }

    links
}

/// Resolve named and numeric character references in an attribute value
///
/// References that do not name a valid character are kept as written.
pub fn decode_char_refs(value: &str) -> String {
    CHAR_REF
        .replace_all(value, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "lt" => Some('<'),
                "gt" => Some('>'),
                _ => {
                    let digits = &name[1..];
                    let code = match digits.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => digits.parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Offset of the `</div>` closing the element whose body starts at `body_start`
fn closing_div(html: &str, body_start: usize) -> usize {
    let mut depth = 1usize;
    for tag in DIV_TAG.find_iter(&html[body_start..]) {
        if tag.as_str().starts_with("</") {
            depth -= 1;
            if depth == 0 {
                return body_start + tag.start();
            }
        } else {
            depth += 1;
        }
    }
    html.len()
}

/// Searches the park website
pub struct SiteSearch {
    client: Client,
    base_url: String,
}

impl SiteSearch {
    pub fn new(config: &SiteSearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client for site search")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl Searcher for SiteSearch {
    async fn search(&self, keyword: &str) -> Result<Vec<String>, SearchError> {
        let query = trim_keyword(keyword);
        debug!(query = %query, base_url = %self.base_url, "Running site search");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("s", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let links = extract_result_links(&body);
        info!(count = links.len(), "Site search cells parsed");

        Ok(links)
    }
}
