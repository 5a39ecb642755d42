//! Turning crawled chapters into a [`Novel`].
//!
//! Three passes, in order: drop chapters that are too short to be prose,
//! infer title and author from the first surviving chapter, and tag each
//! chapter's first line for generators. None of them can fail; a novel
//! without title or author is a valid result.

use std::sync::LazyLock;

use regex::Regex;

use crate::novel::{Chapter, HeaderType, Novel};

static SEPARATOR_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-=]+$").unwrap());
static AUTHOR_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"作者\s*[：:]\s*(.+?)\s*$").unwrap());

/// Default minimum number of characters a chapter needs to be kept.
pub const DEFAULT_MIN_CHAPTER_CHARS: usize = 100;

/// Title and author inferred from a chapter's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NovelInfo {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Filters chapters and fills in novel metadata.
#[derive(Debug, Clone)]
pub struct NovelAssembler {
    min_chapter_chars: usize,
}

impl Default for NovelAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CHAPTER_CHARS)
    }
}

impl NovelAssembler {
    pub fn new(min_chapter_chars: usize) -> Self {
        Self { min_chapter_chars }
    }

    pub fn min_chapter_chars(&self) -> usize {
        self.min_chapter_chars
    }

    /// Keeps chapters whose text length exceeds the threshold, in their original order.
    pub fn filter_chapters(&self, chapters: Vec<Chapter>) -> Vec<Chapter> {
        chapters
            .into_iter()
            .filter(|chapter| chapter.text_length() > self.min_chapter_chars)
            .collect()
    }

    /// Infers title and author from the first chapter.
    ///
    /// The first line is the title unless it is a `---`/`===` separator, in
    /// which case `thread_subject` is used. The author is taken from the
    /// first remaining line of the form `作者：<name>`.
    pub fn infer_info(first: &Chapter, thread_subject: Option<&str>) -> NovelInfo {
        let lines = first.text_contents();

        let (title, rest) = match lines.split_first() {
            Some((head, rest)) if !SEPARATOR_LINE.is_match(head) => (Some(head.clone()), rest),
            _ => (
                thread_subject
                    .map(str::trim)
                    .filter(|subject| !subject.is_empty())
                    .map(String::from),
                lines.as_slice(),
            ),
        };

        let author = rest
            .iter()
            .filter(|line| line.contains("作者"))
            .find_map(|line| AUTHOR_LINE.captures(line).map(|captures| captures[1].to_string()));

        NovelInfo { title, author }
    }

    /// Marks the first chapter's opening run as the title and every other
    /// chapter's opening run as a chapter heading.
    pub fn tag_headers(chapters: &mut [Chapter]) {
        for (index, chapter) in chapters.iter_mut().enumerate() {
            let header_type = if index == 0 { HeaderType::Title } else { HeaderType::Chapter };
            chapter.set_header_type(header_type);
        }
    }

    /// Runs all passes over the crawl's chapter list.
    pub fn assemble(&self, chapters: Vec<Chapter>, thread_subject: Option<&str>) -> Novel {
        let mut chapters = self.filter_chapters(chapters);

        let info = match chapters.first() {
            Some(first) => Self::infer_info(first, thread_subject),
            None => NovelInfo {
                title: thread_subject
                    .map(str::trim)
                    .filter(|subject| !subject.is_empty())
                    .map(String::from),
                author: None,
            },
        };

        Self::tag_headers(&mut chapters);

        tracing::info!(
            chapters = chapters.len(),
            title = info.title.as_deref().unwrap_or("-"),
            author = info.author.as_deref().unwrap_or("-"),
            "assembled novel"
        );

        Novel { title: info.title, author: info.author, chapters, source_url: None }
    }
}
