//! Multi-page thread crawling.
//!
//! A crawl runs in three phases:
//!
//! 1. Fetch page 1 and read the page count and thread subject from it.
//! 2. Fetch pages 2..=N concurrently. Each response is checked for the
//!    forum's error banner as it arrives; the first failure aborts the rest.
//! 3. Once every page is in, extract chapters page by page in page order.
//!
//! Fetches may complete in any order. Chapter order depends only on page
//! index and on post order within a page.
//!
//! # Example
//!
//! ```rust,no_run
//! use novelthread_core::{CrawlConfig, crawl_novel};
//!
//! # async fn run() -> novelthread_core::Result<()> {
//! let config = CrawlConfig::builder("https://www.lightnovel.cn/thread-12345-1-1.html")
//!     .floor("1-20")
//!     .max_concurrency(4)
//!     .build()?;
//! let novel = crawl_novel(config).await?;
//! println!("{} chapters", novel.chapters.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::assemble::{DEFAULT_MIN_CHAPTER_CHARS, NovelAssembler};
use crate::fetch::{FetchConfig, Transport};
use crate::layout::ForumLayout;
use crate::novel::{Chapter, ContentElement, Novel};
use crate::parse::{Document, Element};
use crate::preprocess::{PreprocessConfig, preprocess_post, validate_selector};
use crate::range::{FloorRange, parse_floor};
use crate::thread_url::ThreadUrl;
use crate::visitor::DocumentVisitor;
use crate::{NovelError, Result};

/// Configuration for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Thread to crawl; any page of it may be given.
    pub source_url: ThreadUrl,
    /// Floors to keep. `None` keeps every post.
    pub floor_range: Option<FloorRange>,
    /// Chapters must have more characters than this to be kept.
    pub min_chapter_chars: usize,
    /// Upper bound on simultaneous page fetches. `None` fetches all pages at once.
    pub max_concurrency: Option<usize>,
    pub layout: ForumLayout,
    pub fetch: FetchConfig,
}

impl CrawlConfig {
    /// Creates a builder for crawling `url`.
    pub fn builder(url: impl Into<String>) -> CrawlConfigBuilder {
        CrawlConfigBuilder::new(url)
    }

    /// Config with defaults for an already parsed thread URL.
    pub fn new(source_url: ThreadUrl) -> Self {
        Self {
            source_url,
            floor_range: None,
            min_chapter_chars: DEFAULT_MIN_CHAPTER_CHARS,
            max_concurrency: None,
            layout: ForumLayout::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Builder for [`CrawlConfig`].
///
/// The URL and floor spec are kept as text until [`CrawlConfigBuilder::build`],
/// which parses and validates them.
#[derive(Debug, Clone)]
pub struct CrawlConfigBuilder {
    url: String,
    floor: Option<String>,
    floor_range: Option<FloorRange>,
    min_chapter_chars: usize,
    max_concurrency: Option<usize>,
    layout: ForumLayout,
    fetch: FetchConfig,
}

impl CrawlConfigBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            floor: None,
            floor_range: None,
            min_chapter_chars: DEFAULT_MIN_CHAPTER_CHARS,
            max_concurrency: None,
            layout: ForumLayout::default(),
            fetch: FetchConfig::default(),
        }
    }

    /// Sets the floor spec, e.g. `"1,3-5,10-"`.
    pub fn floor(mut self, spec: impl Into<String>) -> Self {
        self.floor = Some(spec.into());
        self.floor_range = None;
        self
    }

    /// Sets an already parsed floor range.
    pub fn floor_range(mut self, range: FloorRange) -> Self {
        self.floor_range = Some(range);
        self.floor = None;
        self
    }

    /// Sets the minimum chapter length in characters.
    pub fn min_chapter_chars(mut self, value: usize) -> Self {
        self.min_chapter_chars = value;
        self
    }

    /// Bounds the number of simultaneous page fetches.
    pub fn max_concurrency(mut self, value: usize) -> Self {
        self.max_concurrency = Some(value);
        self
    }

    /// Sets the session cookie.
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.fetch.cookie = Some(cookie.into());
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.fetch.timeout = secs;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.fetch.user_agent = user_agent.into();
        self
    }

    /// Bypasses proxies configured through the environment.
    pub fn no_proxy(mut self, no_proxy: bool) -> Self {
        self.fetch.no_proxy = no_proxy;
        self
    }

    pub fn layout(mut self, layout: ForumLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Builds the config.
    ///
    /// # Errors
    ///
    /// - [`NovelError::MalformedUrl`] if the URL is not a thread URL
    /// - [`NovelError::InvalidRangeSpec`] if the floor spec does not parse
    /// - [`NovelError::ConfigError`] if `max_concurrency` is zero
    /// - [`NovelError::HtmlParseError`] if a removal selector is invalid
    pub fn build(self) -> Result<CrawlConfig> {
        let source_url = ThreadUrl::parse(&self.url)?;

        let floor_range = match (self.floor, self.floor_range) {
            (Some(spec), _) => Some(FloorRange::parse(&spec)?),
            (None, range) => range,
        };

        if self.max_concurrency == Some(0) {
            return Err(NovelError::ConfigError("max_concurrency must be at least 1".to_string()));
        }

        PreprocessConfig { removal_selectors: self.layout.removal_selectors.clone(), ..Default::default() }
            .validate()?;

        Ok(CrawlConfig {
            source_url,
            floor_range,
            min_chapter_chars: self.min_chapter_chars,
            max_concurrency: self.max_concurrency,
            layout: self.layout,
            fetch: self.fetch,
        })
    }
}

/// Chapters in reading order plus the page-level facts gathered on the way.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutput {
    pub chapters: Vec<Chapter>,
    /// Thread subject from page 1, used as a title fallback.
    pub thread_subject: Option<String>,
    pub page_count: u32,
}

/// One parsed thread page.
pub struct ForumPage {
    page_index: u32,
    url: Url,
    document: Document,
}

impl ForumPage {
    pub fn parse(page_index: u32, url: Url, html: &str) -> Result<Self> {
        let document = Document::parse_with_url(html, url.clone())?;
        Ok(Self { page_index, url, document })
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Fails with [`NovelError::ForumErrorPage`] when the page shows the error banner.
    pub fn check_error_banner(&self, layout: &ForumLayout) -> Result<()> {
        match self.document.select_first(&layout.error_banner_selector)? {
            Some(banner) => Err(NovelError::ForumErrorPage {
                url: self.url.to_string(),
                message: collapse_whitespace(&banner.text()),
            }),
            None => Ok(()),
        }
    }

    /// Thread subject shown above the post list.
    pub fn thread_subject(&self, layout: &ForumLayout) -> Result<Option<String>> {
        Ok(self
            .document
            .select_first(&layout.subject_selector)?
            .map(|subject| collapse_whitespace(&subject.text()))
            .filter(|subject| !subject.is_empty()))
    }

    /// Total number of pages in the thread.
    ///
    /// Uses the "last page" link when present. Otherwise the entry just
    /// before the trailing "next" control names the highest page. A page
    /// without pagination is the only page.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::PaginationParseError`] when the widget does not
    /// end with the "next" control or a link's page index cannot be read.
    pub fn page_count(&self, layout: &ForumLayout) -> Result<u32> {
        if let Some(last) = self.document.select_first(&layout.last_page_selector)? {
            return self.linked_page_index(last);
        }

        let entries = self.document.select(&layout.pagination_selector)?;
        match entries.as_slice() {
            [] => Ok(1),
            [.., last] if !last.has_class(&layout.next_page_class) => Err(NovelError::PaginationParseError(format!(
                "last pagination entry on {} is not the next-page control",
                self.url
            ))),
            [_] => Ok(1),
            [.., highest, _] => self.linked_page_index(*highest),
        }
    }

    fn linked_page_index(&self, link: Element<'_>) -> Result<u32> {
        let href = link
            .attr("href")
            .ok_or_else(|| NovelError::PaginationParseError(format!("pagination link on {} has no href", self.url)))?;

        self.url
            .join(href)
            .ok()
            .and_then(|url| ThreadUrl::from_url(url).ok())
            .map(|thread_url| thread_url.page_index())
            .ok_or_else(|| NovelError::PaginationParseError(format!("cannot read page index from '{}'", href)))
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Crawls a thread through a [`Transport`].
pub struct ThreadCrawler<T> {
    transport: Arc<T>,
    config: CrawlConfig,
}

impl<T: Transport> ThreadCrawler<T> {
    pub fn new(transport: T, config: CrawlConfig) -> Self {
        Self::with_shared(Arc::new(transport), config)
    }

    /// Uses a transport that is also held elsewhere.
    pub fn with_shared(transport: Arc<T>, config: CrawlConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Fetches every page of the thread and extracts chapters in reading order.
    ///
    /// # Errors
    ///
    /// Any fetch, error-page, pagination, floor or URL error ends the crawl;
    /// no partial result is returned.
    pub async fn crawl(&self) -> Result<CrawlOutput> {
        let layout = &self.config.layout;
        let source = &self.config.source_url;

        match &self.config.floor_range {
            Some(range) => tracing::info!(thread = source.thread_id(), floors = %range, "crawling thread"),
            None => tracing::info!(thread = source.thread_id(), floors = "*", "crawling thread"),
        }

        let first_url = source.page_url(1);
        let first_html = self.transport.fetch(&first_url).await?;
        let (page_count, thread_subject) = inspect_first_page(&first_url, &first_html, layout)?;
        tracing::info!(pages = page_count, "discovered page count");

        let rest_urls: Vec<Url> = (2..=page_count).map(|page| source.page_url(page)).collect();
        let rest_html = self.fetch_all(&rest_urls).await?;

        let pages = std::iter::once((first_url, first_html)).chain(rest_urls.into_iter().zip(rest_html));
        let mut chapters = Vec::new();
        for (index, (url, html)) in pages.enumerate() {
            let page = ForumPage::parse(index as u32 + 1, url, &html)?;
            let extracted = self.extract_page(&page)?;
            tracing::debug!(page = page.page_index(), chapters = extracted.len(), "extracted page");
            chapters.extend(extracted);
        }

        tracing::info!(chapters = chapters.len(), "crawl finished");
        Ok(CrawlOutput { chapters, thread_subject, page_count })
    }

    /// Crawls and assembles the thread into a [`Novel`].
    pub async fn crawl_novel(&self) -> Result<Novel> {
        let output = self.crawl().await?;
        let assembler = NovelAssembler::new(self.config.min_chapter_chars);
        let mut novel = assembler.assemble(output.chapters, output.thread_subject.as_deref());
        novel.source_url = Some(self.config.source_url.to_string());
        Ok(novel)
    }

    /// Fetches `urls` concurrently and returns their bodies in input order.
    async fn fetch_all(&self, urls: &[Url]) -> Result<Vec<String>> {
        let semaphore = self.config.max_concurrency.map(|limit| Arc::new(Semaphore::new(limit)));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().cloned().enumerate() {
            let transport = Arc::clone(&self.transport);
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => {
                            let reason = e.to_string();
                            return (index, Err(NovelError::FetchError { url: url.to_string(), reason }));
                        }
                    },
                    None => None,
                };
                let result = transport.fetch(&url).await;
                (index, result.map(|html| (url, html)))
            });
        }

        let mut slots: Vec<Option<String>> = vec![None; urls.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, result) =
                joined.map_err(|e| NovelError::FetchError { url: String::new(), reason: e.to_string() })?;
            // Returning early drops the JoinSet, which aborts every fetch still in flight.
            let (url, html) = result?;
            if let Some(message) = scan_error_banner(&html, &self.config.layout)? {
                return Err(NovelError::ForumErrorPage { url: url.to_string(), message });
            }
            tracing::debug!(page = index + 2, "fetched page");
            slots[index] = Some(html);
        }

        slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| {
                slot.ok_or_else(|| NovelError::FetchError { url: url.to_string(), reason: "page was not fetched".into() })
            })
            .collect()
    }

    /// Extracts one chapter per qualifying post on `page`, in post order.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::FloorParseError`] when a floor range is set and a
    /// post's floor marker is missing or malformed, and
    /// [`NovelError::HtmlParseError`] when a selected post has no content body.
    pub fn extract_page(&self, page: &ForumPage) -> Result<Vec<Chapter>> {
        let layout = &self.config.layout;
        let preprocess = PreprocessConfig {
            removal_selectors: layout.removal_selectors.clone(),
            image_source_attr: Some(layout.image_source_attr.clone()),
            base_url: Some(page.url().clone()),
        };
        let visitor = DocumentVisitor::for_layout(layout, Some(page.url().clone()));

        let mut chapters = Vec::new();
        for post in page.document().select(&layout.post_selector)? {
            if let Some(range) = self.config.floor_range.as_ref().filter(|range| !range.is_unbounded()) {
                let floor = post_floor(post, layout)?;
                if !range.includes(floor) {
                    continue;
                }
            }

            let Some(body) = post.select_first(&layout.content_selector)? else {
                return Err(NovelError::HtmlParseError(format!(
                    "post '{}' on {} has no content body",
                    post.id().unwrap_or_default(),
                    page.url()
                )));
            };

            let cleaned = preprocess_post(&body.inner_html(), &preprocess)?;
            let fragment = Document::parse_fragment(&cleaned, Some(page.url().clone()));

            let mut chapter = Chapter::new();
            if let Some(header) = post_header(post, layout)? {
                chapter.push(ContentElement::text(header));
                chapter.push(ContentElement::LineBreak);
            }
            chapter.extend(visitor.visit(fragment.root())?);
            chapters.push(chapter);
        }

        Ok(chapters)
    }
}

/// Crawls the configured thread over HTTP and assembles the novel.
#[cfg(feature = "fetch")]
pub async fn crawl_novel(config: CrawlConfig) -> Result<Novel> {
    let transport = crate::fetch::HttpTransport::new(&config.fetch)?;
    ThreadCrawler::new(transport, config).crawl_novel().await
}

fn inspect_first_page(url: &Url, html: &str, layout: &ForumLayout) -> Result<(u32, Option<String>)> {
    let page = ForumPage::parse(1, url.clone(), html)?;
    page.check_error_banner(layout)?;
    Ok((page.page_count(layout)?, page.thread_subject(layout)?))
}

/// Text of the error banner in `html`, if there is one.
///
/// Streams the page through `lol_html` without building a DOM; the page is
/// parsed into a tree only once, during extraction.
fn scan_error_banner(html: &str, layout: &ForumLayout) -> Result<Option<String>> {
    let selector = layout.error_banner_selector.as_str();
    validate_selector(selector)?;

    let mut found = false;
    let mut message = String::new();
    let settings = lol_html::Settings {
        element_content_handlers: vec![
            lol_html::element!(selector, |_| {
                found = true;
                Ok(())
            }),
            lol_html::text!(selector, |chunk| {
                message.push_str(chunk.as_str());
                Ok(())
            }),
        ],
        ..Default::default()
    };

    let mut rewriter = lol_html::HtmlRewriter::new(settings, |_: &[u8]| {});
    rewriter
        .write(html.as_bytes())
        .map_err(|e| NovelError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| NovelError::HtmlParseError(e.to_string()))?;

    Ok(found.then(|| collapse_whitespace(&message)))
}

/// Floor number of `post`, read from its floor marker.
fn post_floor(post: Element<'_>, layout: &ForumLayout) -> Result<u32> {
    let post_id = post.id().unwrap_or_default();
    let selector = layout
        .floor_selector(post_id)
        .ok_or_else(|| NovelError::FloorParseError(format!("post id '{}' has no post number", post_id)))?;
    let marker = post
        .select_first(&selector)?
        .ok_or_else(|| NovelError::FloorParseError(format!("post '{}' has no floor marker", post_id)))?;
    parse_floor(&marker.text())
}

/// The post's own heading, when it is the header container's first element.
fn post_header(post: Element<'_>, layout: &ForumLayout) -> Result<Option<String>> {
    let Some(container) = post.select_first(&layout.header_container_selector)? else {
        return Ok(None);
    };
    Ok(container
        .first_element_child()
        .filter(|first| first.tag_name() == layout.header_tag)
        .map(|header| header.text().trim().to_string())
        .filter(|text| !text.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> ForumPage {
        ForumPage::parse(1, Url::parse("https://host/thread-42-1-1.html").unwrap(), html).unwrap()
    }

    fn post(id: &str, floor: u32, body: &str) -> String {
        format!(
            r#"<div class="plhin" id="pid{id}"><table><tr><td class="plc"><div class="pi"><strong><a id="postnum{id}"><em>{floor}</em>楼</a></strong></div><div class="pct"><div class="pcb"><div class="t_f">{body}</div></div></div></td></tr></table></div>"#
        )
    }

    fn thread_page(posts: &[String]) -> String {
        format!(r#"<html><body><div id="postlist">{}</div></body></html>"#, posts.concat())
    }

    fn crawler(config: CrawlConfig) -> ThreadCrawler<NoTransport> {
        ThreadCrawler::new(NoTransport, config)
    }

    struct NoTransport;

    impl Transport for NoTransport {
        async fn fetch(&self, url: &Url) -> Result<String> {
            Err(NovelError::FetchError { url: url.to_string(), reason: "offline".into() })
        }
    }

    #[test]
    fn test_builder_defaults() {
        let config = CrawlConfig::builder("https://host/thread-42-3-1.html").build().unwrap();
        assert_eq!(config.source_url.thread_id(), "42");
        assert!(config.floor_range.is_none());
        assert_eq!(config.min_chapter_chars, 100);
        assert_eq!(config.max_concurrency, None);
        assert_eq!(config.fetch.timeout, 30);
    }

    #[test]
    fn test_builder_options() {
        let config = CrawlConfig::builder("https://host/forum.php?mod=viewthread&tid=42")
            .floor("1, 3-5")
            .min_chapter_chars(10)
            .max_concurrency(2)
            .cookie("a=b")
            .timeout(5)
            .no_proxy(true)
            .build()
            .unwrap();
        let range = config.floor_range.unwrap();
        assert!(range.includes(4));
        assert!(!range.includes(2));
        assert_eq!(config.min_chapter_chars, 10);
        assert_eq!(config.max_concurrency, Some(2));
        assert_eq!(config.fetch.cookie.as_deref(), Some("a=b"));
        assert_eq!(config.fetch.timeout, 5);
        assert!(config.fetch.no_proxy);
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        assert!(matches!(CrawlConfig::builder("https://host/index.html").build(), Err(NovelError::MalformedUrl(_))));
        assert!(matches!(
            CrawlConfig::builder("https://host/thread-1-1-1.html").floor("5-3").build(),
            Err(NovelError::InvalidRangeSpec { .. })
        ));
        assert!(matches!(
            CrawlConfig::builder("https://host/thread-1-1-1.html").max_concurrency(0).build(),
            Err(NovelError::ConfigError(_))
        ));
    }

    #[test]
    fn test_page_count_from_last_link() {
        let html = r#"<div class="pgt"><div class="pg"><a href="thread-42-2-1.html">2</a><a href="thread-42-17-1.html" class="last">... 17</a><a href="thread-42-2-1.html" class="nxt">下一页</a></div></div>"#;
        assert_eq!(page(html).page_count(&ForumLayout::default()).unwrap(), 17);
    }

    #[test]
    fn test_page_count_from_entry_before_next() {
        let html = r#"<div class="pgt"><div class="pg"><strong>1</strong><a href="thread-42-2-1.html">2</a><a href="thread-42-3-1.html">3</a><a href="thread-42-2-1.html" class="nxt">下一页</a></div></div>"#;
        assert_eq!(page(html).page_count(&ForumLayout::default()).unwrap(), 3);
    }

    #[test]
    fn test_page_count_query_style_links() {
        let html = r#"<div class="pgt"><div class="pg"><a href="forum.php?mod=viewthread&amp;tid=42&amp;page=2">2</a><a href="forum.php?mod=viewthread&amp;tid=42&amp;page=2" class="nxt">下一页</a></div></div>"#;
        assert_eq!(page(html).page_count(&ForumLayout::default()).unwrap(), 2);
    }

    #[test]
    fn test_page_count_without_pagination() {
        assert_eq!(page("<div id=\"postlist\"></div>").page_count(&ForumLayout::default()).unwrap(), 1);
        let only_next = r#"<div class="pgt"><div class="pg"><a href="thread-42-2-1.html" class="nxt">下一页</a></div></div>"#;
        assert_eq!(page(only_next).page_count(&ForumLayout::default()).unwrap(), 1);
    }

    #[test]
    fn test_page_count_without_next_control() {
        let html = r#"<div class="pgt"><div class="pg"><a href="thread-42-2-1.html">2</a><a href="thread-42-3-1.html">3</a></div></div>"#;
        assert!(matches!(
            page(html).page_count(&ForumLayout::default()),
            Err(NovelError::PaginationParseError(_))
        ));
    }

    #[test]
    fn test_page_count_unparseable_href() {
        let html = r#"<a class="last" href="/space-uid-1.html">9</a>"#;
        assert!(matches!(
            page(html).page_count(&ForumLayout::default()),
            Err(NovelError::PaginationParseError(_))
        ));
    }

    #[test]
    fn test_error_banner() {
        let html = r#"<div id="messagetext" class="alert_error"><p>抱歉，指定的主题不存在或已被删除或正在被审核</p></div>"#;
        match page(html).check_error_banner(&ForumLayout::default()) {
            Err(NovelError::ForumErrorPage { url, message }) => {
                assert_eq!(url, "https://host/thread-42-1-1.html");
                assert!(message.contains("指定的主题不存在"));
            }
            other => panic!("expected ForumErrorPage, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_error_banner_matches_dom_check() {
        let html = r#"<html><body><div id="messagetext" class="alert_error"><p>抱歉，指定的主题
            不存在或已被删除</p></div></body></html>"#;
        let layout = ForumLayout::default();

        let scanned = scan_error_banner(html, &layout).unwrap();
        assert_eq!(scanned.as_deref(), Some("抱歉，指定的主题 不存在或已被删除"));
        match page(html).check_error_banner(&layout) {
            Err(NovelError::ForumErrorPage { message, .. }) => assert_eq!(Some(message), scanned),
            other => panic!("expected ForumErrorPage, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_error_banner_absent() {
        let html = thread_page(&[post("1", 1, "正文")]);
        assert_eq!(scan_error_banner(&html, &ForumLayout::default()).unwrap(), None);
    }

    #[test]
    fn test_scan_error_banner_invalid_selector() {
        let layout = ForumLayout { error_banner_selector: "[[bad".to_string(), ..Default::default() };
        assert!(matches!(scan_error_banner("<p></p>", &layout), Err(NovelError::HtmlParseError(_))));
    }

    #[test]
    fn test_thread_subject() {
        let html = r#"<h1 class="ts"><span id="thread_subject"> 【轻小说】 Sample </span></h1>"#;
        assert_eq!(page(html).thread_subject(&ForumLayout::default()).unwrap().as_deref(), Some("【轻小说】 Sample"));
        assert_eq!(page("<p></p>").thread_subject(&ForumLayout::default()).unwrap(), None);
    }

    #[test]
    fn test_extract_page_in_post_order() {
        let html = thread_page(&[post("1", 1, "第一章<br>正文"), post("2", 2, "第二章")]);
        let config = CrawlConfig::builder("https://host/thread-42-1-1.html").build().unwrap();
        let chapters = crawler(config).extract_page(&page(&html)).unwrap();

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].text_contents(), vec!["第一章", "正文"]);
        assert_eq!(chapters[1].text_contents(), vec!["第二章"]);
    }

    #[test]
    fn test_extract_page_filters_floors() {
        let html = thread_page(&[post("10", 2, "a"), post("11", 7, "b"), post("12", 8, "c")]);
        let config = CrawlConfig::builder("https://host/thread-42-1-1.html").floor("3-5,8-").build().unwrap();
        let chapters = crawler(config).extract_page(&page(&html)).unwrap();

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].text_contents(), vec!["c"]);
    }

    #[test]
    fn test_extract_page_unbounded_range_skips_floor_parsing() {
        let html = thread_page(&[post("10", 2, "a").replace("楼", "F")]);
        let config =
            CrawlConfig::builder("https://host/thread-42-1-1.html").floor_range(FloorRange::all()).build().unwrap();
        let chapters = crawler(config).extract_page(&page(&html)).unwrap();

        assert_eq!(chapters.len(), 1);
    }

    #[test]
    fn test_extract_page_malformed_floor() {
        let html = thread_page(&[post("10", 2, "a").replace("楼", "F")]);
        let config = CrawlConfig::builder("https://host/thread-42-1-1.html").floor("1-").build().unwrap();
        assert!(matches!(
            crawler(config).extract_page(&page(&html)),
            Err(NovelError::FloorParseError(_))
        ));
    }

    const LOCKED_POST: &str = r#"<div class="plhin" id="pid5"><div class="pi"><a id="postnum5"><em>1</em>楼</a></div><div class="pct"><div class="locked">提示: 作者被禁止或删除 内容自动屏蔽</div></div></div>"#;

    #[test]
    fn test_extract_page_post_without_body_is_fatal() {
        let html = thread_page(&[LOCKED_POST.to_string(), post("6", 2, "kept")]);
        let config = CrawlConfig::builder("https://host/thread-42-1-1.html").build().unwrap();

        match crawler(config).extract_page(&page(&html)) {
            Err(NovelError::HtmlParseError(message)) => {
                assert!(message.contains("pid5"));
                assert!(message.contains("https://host/thread-42-1-1.html"));
            }
            other => panic!("expected HtmlParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_page_floor_filter_runs_before_body_lookup() {
        let html = thread_page(&[LOCKED_POST.to_string(), post("6", 2, "kept")]);
        let config = CrawlConfig::builder("https://host/thread-42-1-1.html").floor("2-").build().unwrap();
        let chapters = crawler(config).extract_page(&page(&html)).unwrap();

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].text_contents(), vec!["kept"]);
    }

    #[test]
    fn test_extract_page_prepends_post_header() {
        let html = r#"<html><body><div id="postlist"><div class="plhin" id="pid1"><div class="pct"><div class="pcb"><h2>第三卷</h2><div class="t_f">正文</div></div></div></div></div></body></html>"#;
        let config = CrawlConfig::builder("https://host/thread-42-1-1.html").build().unwrap();
        let chapters = crawler(config).extract_page(&page(html)).unwrap();

        assert_eq!(
            chapters[0].contents(),
            &[ContentElement::text("第三卷"), ContentElement::LineBreak, ContentElement::text("正文")]
        );
    }

    #[test]
    fn test_extract_page_resolves_images_and_prunes_noise() {
        let body = r#"<div class="quote"><blockquote>引用</blockquote></div><ignore_js_op><img src="static/none.gif" file="img/1.png"></ignore_js_op>"#;
        let html = thread_page(&[post("1", 1, body)]);
        let config = CrawlConfig::builder("https://host/thread-42-1-1.html").build().unwrap();
        let chapters = crawler(config).extract_page(&page(&html)).unwrap();

        assert_eq!(chapters[0].contents(), &[ContentElement::image("https://host/img/1.png")]);
    }
}
