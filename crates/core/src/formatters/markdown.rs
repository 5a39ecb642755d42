use crate::novel::{Chapter, ContentElement, HeaderType, Novel};

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with title, author and source
    pub include_frontmatter: bool,
    /// Strip images from output
    pub strip_images: bool,
}

/// Markdown formatter for a finished novel
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, novel: &Novel) -> String {
        convert_to_markdown(novel, &self.config)
    }
}

/// Render a novel as Markdown.
///
/// Each logical line becomes a paragraph. A chapter tagged with a header
/// type has its first line rendered as `#` (title) or `##` (chapter).
pub fn convert_to_markdown(novel: &Novel, config: &MarkdownConfig) -> String {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(novel));
        output.push('\n');
    }

    let chapters: Vec<String> = novel
        .chapters
        .iter()
        .map(|chapter| chapter_to_markdown(chapter, config))
        .filter(|chapter| !chapter.is_empty())
        .collect();
    output.push_str(&chapters.join("\n\n"));

    if !output.is_empty() {
        output.push('\n');
    }
    output
}

fn chapter_to_markdown(chapter: &Chapter, config: &MarkdownConfig) -> String {
    let lines = markdown_lines(chapter, config);

    let prefix = match chapter.header_type() {
        Some(HeaderType::Title) => Some("# "),
        Some(HeaderType::Chapter) => Some("## "),
        None => None,
    };

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| match prefix {
            Some(prefix) if i == 0 => format!("{}{}", prefix, line),
            _ => line,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Lines of a chapter with inline Markdown applied, trimmed, empties dropped.
fn markdown_lines(chapter: &Chapter, config: &MarkdownConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for element in chapter.contents() {
        match element {
            ContentElement::Text { content } => current.push_str(&escape_markdown(content)),
            ContentElement::LineBreak => push_line(&mut current, &mut lines),
            ContentElement::Image { url } => {
                if !config.strip_images {
                    current.push_str(&format!("![]({})", url));
                }
            }
            ContentElement::Link { url, label } => {
                let label = if label.is_empty() { url.as_str() } else { label.as_str() };
                current.push_str(&format!("[{}]({})", escape_markdown(label), url));
            }
        }
    }
    push_line(&mut current, &mut lines);

    lines
}

fn push_line(current: &mut String, lines: &mut Vec<String>) {
    let line = current.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
    current.clear();
}

/// Escape characters that would otherwise start Markdown syntax inside prose
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '[' | ']' | '`' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Generate TOML frontmatter from novel metadata
fn generate_frontmatter(novel: &Novel) -> String {
    let mut frontmatter = String::from("+++");

    frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(novel.title_or_default())));

    if let Some(author) = &novel.author {
        frontmatter.push_str(&format!("\nauthor = {}", toml_escape_string(author)));
    }

    if let Some(source) = &novel.source_url {
        frontmatter.push_str(&format!("\nsource = {}", toml_escape_string(source)));
    }

    frontmatter.push_str(&format!("\nchapters = {}", novel.chapters.len()));
    frontmatter.push_str(&format!("\ncharacters = {}", novel.text_length()));

    frontmatter.push_str("\n+++\n");

    frontmatter
}

/// Quote a string as a TOML basic string
fn toml_escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(contents: Vec<ContentElement>, header_type: HeaderType) -> Chapter {
        let mut chapter = Chapter::from_contents(contents);
        chapter.set_header_type(header_type);
        chapter
    }

    fn sample_novel() -> Novel {
        Novel {
            title: Some("Sample Title".to_string()),
            author: Some("Jane Doe".to_string()),
            chapters: vec![
                tagged(
                    vec![
                        ContentElement::text("Sample Title"),
                        ContentElement::LineBreak,
                        ContentElement::text("  第一段 "),
                        ContentElement::LineBreak,
                        ContentElement::LineBreak,
                        ContentElement::image("https://host/img/1.png"),
                    ],
                    HeaderType::Title,
                ),
                tagged(
                    vec![
                        ContentElement::text("第一章"),
                        ContentElement::LineBreak,
                        ContentElement::text("see "),
                        ContentElement::link("https://host/x", "here"),
                    ],
                    HeaderType::Chapter,
                ),
            ],
            source_url: Some("https://host/thread-1-1-1.html".to_string()),
        }
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let markdown = convert_to_markdown(&sample_novel(), &MarkdownConfig::default());
        assert_eq!(
            markdown,
            "# Sample Title\n\n第一段\n\n![](https://host/img/1.png)\n\n## 第一章\n\nsee [here](https://host/x)\n"
        );
    }

    #[test]
    fn test_strip_images() {
        let config = MarkdownConfig { strip_images: true, ..Default::default() };
        let markdown = convert_to_markdown(&sample_novel(), &config);
        assert!(!markdown.contains("img/1.png"));
        assert!(markdown.contains("第一段"));
    }

    #[test]
    fn test_untagged_chapter_has_no_heading() {
        let novel = Novel { chapters: vec![Chapter::from_contents(vec![ContentElement::text("plain")])], ..Default::default() };
        assert_eq!(convert_to_markdown(&novel, &MarkdownConfig::default()), "plain\n");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_markdown("*强调* [x] #1"), "\\*强调\\* \\[x\\] \\#1");
    }

    #[test]
    fn test_frontmatter() {
        let config = MarkdownConfig { include_frontmatter: true, ..Default::default() };
        let markdown = MarkdownFormatter::new(config).convert(&sample_novel());
        assert!(markdown.starts_with("+++\ntitle = \"Sample Title\"\nauthor = \"Jane Doe\""));
        assert!(markdown.contains("source = \"https://host/thread-1-1-1.html\""));
        assert!(markdown.contains("chapters = 2"));
    }

    #[test]
    fn test_toml_escape() {
        assert_eq!(toml_escape_string("a \"b\"\n"), "\"a \\\"b\\\"\\n\"");
    }
}
