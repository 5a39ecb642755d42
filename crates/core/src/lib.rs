//! Extract serialized novels from forum threads.
//!
//! A thread is fetched page by page, each post's content is walked into a
//! flat list of [`ContentElement`]s, and the resulting chapters are filtered
//! and given a title and author by the [`NovelAssembler`]. Generators in
//! [`formatters`] render the finished [`Novel`].
//!
//! ```rust,no_run
//! use novelthread_core::{CrawlConfig, OutputFormat, crawl_novel, render};
//!
//! # async fn run() -> novelthread_core::Result<()> {
//! let config = CrawlConfig::builder("https://www.lightnovel.cn/thread-12345-1-1.html").build()?;
//! let novel = crawl_novel(config).await?;
//! println!("{}", render(&novel, OutputFormat::Text)?);
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod layout;
pub mod novel;
pub mod parse;
pub mod preprocess;
pub mod range;
pub mod thread_url;
pub mod visitor;

pub use assemble::{NovelAssembler, NovelInfo};
#[cfg(feature = "fetch")]
pub use crawler::crawl_novel;
pub use crawler::{CrawlConfig, CrawlConfigBuilder, CrawlOutput, ForumPage, ThreadCrawler};
pub use error::{NovelError, Result};
#[cfg(feature = "fetch")]
pub use fetch::HttpTransport;
pub use fetch::{FetchConfig, Transport};
pub use formatters::{JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter, TextConfig, TextFormatter};
pub use formatters::{
    OutputFormat, convert_to_json, convert_to_markdown, convert_to_text, default_file_name, render, write_novel,
};
pub use layout::ForumLayout;
pub use novel::{Chapter, ContentElement, HeaderType, Novel};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_post;
pub use range::{FloorRange, Interval, parse_floor};
pub use thread_url::{ThreadUrl, UrlStyle};
pub use visitor::{DocumentVisitor, VisitRule};
