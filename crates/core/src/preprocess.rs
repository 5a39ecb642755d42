//! Pre-extraction cleanup of a post's content subtree.
//!
//! Noise elements are pruned and image/link targets rewritten to absolute
//! URLs with `lol_html` before the subtree is visited. Pruning happens here,
//! not during the walk, so a removed element never leaks partial children.

use url::Url;

use crate::{NovelError, Result};

/// Configuration for post cleanup.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Elements removed together with their content.
    pub removal_selectors: Vec<String>,
    /// Attribute holding an image's real source, rewritten alongside `src`.
    pub image_source_attr: Option<String>,
    /// Base URL for converting relative URLs. `None` leaves URLs untouched.
    pub base_url: Option<Url>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            removal_selectors: ["style", "script", ".pstatus", ".quote", ".tip"]
                .into_iter()
                .map(String::from)
                .collect(),
            image_source_attr: Some("file".to_string()),
            base_url: None,
        }
    }
}

impl PreprocessConfig {
    /// Checks that every removal selector is one `lol_html` can match.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::HtmlParseError`] naming the first bad selector.
    pub fn validate(&self) -> Result<()> {
        self.removal_selectors.iter().try_for_each(|selector| validate_selector(selector))
    }
}

pub(crate) fn validate_selector(selector: &str) -> Result<()> {
    selector
        .parse::<lol_html::Selector>()
        .map(|_| ())
        .map_err(|e| NovelError::HtmlParseError(format!("Invalid selector '{}': {}", selector, e)))
}

/// Prunes the removal set, then absolutizes URLs.
pub fn preprocess_post(html: &str, config: &PreprocessConfig) -> Result<String> {
    let mut processed = remove_noise(html, &config.removal_selectors)?;

    if let Some(base_url) = &config.base_url {
        processed = convert_relative_urls(&processed, base_url, config.image_source_attr.as_deref())?;
    }

    Ok(processed)
}

/// Remove every element matching one of `selectors`, content included.
fn remove_noise(html: &str, selectors: &[String]) -> Result<String> {
    if selectors.is_empty() {
        return Ok(html.to_string());
    }

    let mut handlers = Vec::with_capacity(selectors.len());
    for selector in selectors {
        validate_selector(selector)?;
        handlers.push(lol_html::element!(selector, |el| {
            el.remove();
            Ok(())
        }));
    }

    rewrite(html, lol_html::Settings { element_content_handlers: handlers, ..Default::default() })
}

/// Convert relative image and link URLs to absolute URLs.
///
/// Values that cannot be joined are left as they are; the visitor reports
/// them when it reaches them.
pub fn convert_relative_urls(html: &str, base_url: &Url, image_source_attr: Option<&str>) -> Result<String> {
    let settings = lol_html::Settings {
        element_content_handlers: vec![
            lol_html::element!("a[href]", |el| {
                if let Some(href) = el.get_attribute("href")
                    && let Ok(absolute) = base_url.join(&href)
                {
                    el.set_attribute("href", absolute.as_str()).ok();
                }
                Ok(())
            }),
            lol_html::element!("img", |el| {
                let mut attributes = vec!["src"];
                attributes.extend(image_source_attr);
                for name in attributes {
                    if let Some(value) = el.get_attribute(name)
                        && let Ok(absolute) = base_url.join(&value)
                    {
                        el.set_attribute(name, absolute.as_str()).ok();
                    }
                }
                Ok(())
            }),
        ],
        ..Default::default()
    };

    rewrite(html, settings)
}

fn rewrite(html: &str, settings: lol_html::Settings<'_, '_>) -> Result<String> {
    let mut output = String::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(settings, |c: &[u8]| {
        output.push_str(&String::from_utf8_lossy(c));
    });

    rewriter
        .write(html.as_bytes())
        .map_err(|e| NovelError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| NovelError::HtmlParseError(e.to_string()))?;

    Ok(output)
}
