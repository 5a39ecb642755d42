//! Thread permalinks and page addressing.
//!
//! A thread is reachable through two incompatible URL encodings:
//!
//! * path style: `/thread-<id>-<page>-1.html`
//! * query style: `/forum.php?mod=viewthread&tid=<id>&page=<page>`
//!
//! [`ThreadUrl`] parses either one and can produce the URL of any other page
//! of the same thread, always in the encoding it was parsed from.
//!
//! # Example
//!
//! ```rust
//! use novelthread_core::ThreadUrl;
//!
//! let url = ThreadUrl::parse("https://www.lightnovel.cn/thread-901251-1-1.html").unwrap();
//! assert_eq!(url.thread_id(), "901251");
//! assert_eq!(url.change_page_index(3), "https://www.lightnovel.cn/thread-901251-3-1.html");
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::{NovelError, Result};

static PATH_STYLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/thread-(\d+)-(\d+)-1\.html$").unwrap());

const QUERY_STYLE_PATH: &str = "/forum.php";

/// Which permalink encoding a [`ThreadUrl`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStyle {
    /// `/thread-<id>-<page>-1.html`
    PathStyle,
    /// `/forum.php?...tid=<id>&page=<page>`
    QueryStyle,
}

/// A parsed thread URL pinned to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadUrl {
    style: UrlStyle,
    thread_id: String,
    page_index: u32,
    href: Url,
}

impl ThreadUrl {
    /// Parses a thread URL in either encoding.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::MalformedUrl`] when the string is not an absolute
    /// URL or its path matches neither encoding.
    pub fn parse(url: &str) -> Result<Self> {
        let href = Url::parse(url).map_err(|e| NovelError::MalformedUrl(format!("{url} ({e})")))?;
        Self::from_url(href)
    }

    /// Parses an already-parsed [`Url`].
    pub fn from_url(href: Url) -> Result<Self> {
        if href.path() == QUERY_STYLE_PATH {
            let mut thread_id = None;
            let mut page_index = 1;
            for (key, value) in href.query_pairs() {
                match key.as_ref() {
                    "tid" => thread_id = Some(value.into_owned()),
                    "page" => {
                        page_index = value
                            .parse::<u32>()
                            .ok()
                            .filter(|page| *page >= 1)
                            .ok_or_else(|| NovelError::MalformedUrl(href.to_string()))?;
                    }
                    _ => {}
                }
            }

            let thread_id = thread_id
                .filter(|tid| !tid.is_empty() && tid.chars().all(|c| c.is_ascii_digit()))
                .ok_or_else(|| NovelError::MalformedUrl(href.to_string()))?;

            return Ok(Self { style: UrlStyle::QueryStyle, thread_id, page_index, href });
        }

        let captures = PATH_STYLE
            .captures(href.path())
            .ok_or_else(|| NovelError::MalformedUrl(href.to_string()))?;
        let thread_id = captures[1].to_string();
        let page_index = captures[2]
            .parse::<u32>()
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| NovelError::MalformedUrl(href.to_string()))?;

        Ok(Self { style: UrlStyle::PathStyle, thread_id, page_index, href })
    }

    pub fn style(&self) -> UrlStyle {
        self.style
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// The URL this value was parsed from.
    pub fn href(&self) -> &Url {
        &self.href
    }

    /// Returns the absolute URL of page `page` of the same thread, in the
    /// receiver's encoding. The receiver is left untouched.
    ///
    /// For query-style URLs only the `page` parameter changes; every other
    /// parameter keeps its value and position. A missing `page` is appended.
    pub fn change_page_index(&self, page: u32) -> String {
        self.page_url(page).into()
    }

    /// Same as [`ThreadUrl::change_page_index`] but returns a parsed [`Url`].
    pub fn page_url(&self, page: u32) -> Url {
        let page = page.max(1);
        let mut url = self.href.clone();

        match self.style {
            UrlStyle::PathStyle => {
                url.set_path(&format!("/thread-{}-{}-1.html", self.thread_id, page));
                url.set_fragment(None);
            }
            UrlStyle::QueryStyle => {
                let mut replaced = false;
                let pairs: Vec<(String, String)> = self
                    .href
                    .query_pairs()
                    .map(|(key, value)| {
                        if key == "page" {
                            replaced = true;
                            (key.into_owned(), page.to_string())
                        } else {
                            (key.into_owned(), value.into_owned())
                        }
                    })
                    .collect();

                let mut query = url.query_pairs_mut();
                query.clear();
                query.extend_pairs(pairs);
                if !replaced {
                    query.append_pair("page", &page.to_string());
                }
                drop(query);
                url.set_fragment(None);
            }
        }

        url
    }
}

impl fmt::Display for ThreadUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.href)
    }
}
