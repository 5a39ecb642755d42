//! Generators turning a finished [`Novel`] into an output document.

pub mod json;
pub mod markdown;
pub mod text;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub use json::{JsonConfig, JsonFormatter, convert_to_json};
pub use markdown::{MarkdownConfig, MarkdownFormatter, convert_to_markdown};
pub use text::{TextConfig, TextFormatter, convert_to_text};

use crate::novel::Novel;
use crate::{NovelError, Result};

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text, one chapter after another.
    #[default]
    Text,
    /// Markdown with headings for tagged lines.
    Markdown,
    /// JSON dump of the novel structure.
    Json,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = NovelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(NovelError::ConfigError(format!(
                "Invalid format: {}. Valid options: txt, markdown, json",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "txt",
            Self::Markdown => "markdown",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Render `novel` with each generator's default options.
pub fn render(novel: &Novel, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(convert_to_text(novel, &TextConfig::default())),
        OutputFormat::Markdown => Ok(convert_to_markdown(novel, &MarkdownConfig::default())),
        OutputFormat::Json => convert_to_json(novel, &JsonConfig { pretty: true, ..Default::default() }),
    }
}

/// File name for `novel` rendered as `format`: the title plus the format's extension.
///
/// Characters that are not allowed in file names on common platforms are
/// replaced with `_`.
pub fn default_file_name(novel: &Novel, format: OutputFormat) -> String {
    let stem: String = novel
        .title_or_default()
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() { "untitled" } else { stem };
    format!("{}.{}", stem, format.extension())
}

/// Render `novel` and write it to `writer`.
///
/// # Errors
///
/// Returns [`NovelError::WriteError`] when writing fails.
pub fn write_novel<W: Write>(novel: &Novel, format: OutputFormat, mut writer: W) -> Result<()> {
    let rendered = render(novel, format)?;
    writer.write_all(rendered.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("MD".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!("epub".parse::<OutputFormat>(), Err(NovelError::ConfigError(_))));
    }

    #[test]
    fn test_render_does_not_touch_novel() {
        let novel = Novel { title: Some("t".to_string()), ..Default::default() };
        let before = novel.clone();
        for format in [OutputFormat::Text, OutputFormat::Markdown, OutputFormat::Json] {
            render(&novel, format).unwrap();
        }
        assert_eq!(novel, before);
    }

    #[test]
    fn test_default_file_name() {
        let novel = Novel { title: Some("Sample Title".to_string()), ..Default::default() };
        assert_eq!(default_file_name(&novel, OutputFormat::Text), "Sample Title.txt");
        assert_eq!(default_file_name(&novel, OutputFormat::Markdown), "Sample Title.md");
        assert_eq!(default_file_name(&novel, OutputFormat::Json), "Sample Title.json");
    }

    #[test]
    fn test_default_file_name_sanitizes_title() {
        let novel = Novel { title: Some("第一卷/第二章: 约定?".to_string()), ..Default::default() };
        assert_eq!(default_file_name(&novel, OutputFormat::Text), "第一卷_第二章_ 约定_.txt");
        assert_eq!(default_file_name(&Novel::default(), OutputFormat::Json), "untitled.json");
        let dots = Novel { title: Some("..".to_string()), ..Default::default() };
        assert_eq!(default_file_name(&dots, OutputFormat::Text), "untitled.txt");
    }

    #[test]
    fn test_write_novel_to_file() {
        let novel = Novel {
            chapters: vec![crate::novel::Chapter::from_contents(vec![crate::novel::ContentElement::text("正文")])],
            ..Default::default()
        };
        let file = tempfile::NamedTempFile::new().unwrap();

        write_novel(&novel, OutputFormat::Text, file.as_file()).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "正文");
    }
}
