use serde::Serialize;

use crate::novel::{Chapter, Novel};
use crate::{NovelError, Result};

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<&'a str>,
    /// Total characters across all chapters
    pub characters: usize,
    pub chapters: Vec<JsonChapter<'a>>,
}

/// One chapter, with its logical lines alongside the raw elements
#[derive(Debug, Clone, Serialize)]
pub struct JsonChapter<'a> {
    pub index: usize,
    #[serde(flatten)]
    pub chapter: &'a Chapter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<String>>,
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Add each chapter's logical text lines
    pub include_lines: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Convert a novel to JSON
pub fn convert_to_json(novel: &Novel, config: &JsonConfig) -> Result<String> {
    let chapters = novel
        .chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| JsonChapter {
            index: i + 1,
            chapter,
            lines: if config.include_lines { Some(chapter.text_contents()) } else { None },
        })
        .collect();

    let output = JsonOutput {
        title: novel.title.as_deref(),
        author: novel.author.as_deref(),
        source_url: novel.source_url.as_deref(),
        characters: novel.text_length(),
        chapters,
    };

    let json = if config.pretty { serde_json::to_string_pretty(&output) } else { serde_json::to_string(&output) };
    json.map_err(|e| NovelError::WriteError(e.into()))
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, novel: &Novel) -> Result<String> {
        convert_to_json(novel, &self.config)
    }
}
