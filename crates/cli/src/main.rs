mod echo;
mod logging;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use novelthread_core::{CrawlConfig, OutputFormat, crawl_novel, default_file_name, render};
use owo_colors::OwoColorize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Download a novel serialized in a forum thread
#[derive(Parser, Debug)]
#[command(name = "novelthread")]
#[command(author = "novelthread contributors")]
#[command(version)]
#[command(about = "Extract serialized novels from forum threads", long_about = None)]
struct Args {
    /// Thread URL (thread-<id>-<page>-1.html or forum.php?tid=<id>)
    #[arg(value_name = "URL")]
    url: String,

    /// Output file, or a directory to write "<title>.<ext>" into (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (txt, markdown, json)
    #[arg(short, long, default_value = "txt", value_name = "FORMAT")]
    format: OutputFormat,

    /// Floors to keep, e.g. "1,3-5,10-"
    #[arg(long, value_name = "SPEC")]
    floor: Option<String>,

    /// Cookie header sent with every request
    #[arg(long, value_name = "COOKIE")]
    cookie: Option<String>,

    /// Chapters with this many characters or fewer are dropped
    #[arg(long, default_value = "100", value_name = "NUM")]
    min_chars: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Ignore HTTP proxies set in the environment
    #[arg(long)]
    no_proxy: bool,

    /// Maximum number of pages fetched at once (default: all)
    #[arg(long, value_name = "NUM")]
    concurrency: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn crawl_config(&self) -> novelthread_core::Result<CrawlConfig> {
        let mut builder = CrawlConfig::builder(self.url.as_str())
            .min_chapter_chars(self.min_chars)
            .timeout(self.timeout)
            .no_proxy(self.no_proxy);

        if let Some(floor) = &self.floor {
            builder = builder.floor(floor.as_str());
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.cookie(cookie.as_str());
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        if let Some(concurrency) = self.concurrency {
            builder = builder.max_concurrency(concurrency);
        }

        builder.build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let config = args.crawl_config().context("Invalid arguments")?;

    if args.verbose {
        echo::print_step(1, 3, &format!("Crawling {}", config.source_url.to_string().bright_white().underline()));
        if let Some(range) = &config.floor_range {
            eprintln!("  {} {}", "Floors:".dimmed(), range.to_string().bright_white());
        }
        eprintln!();
    }

    let novel = crawl_novel(config).await.context("Failed to crawl thread")?;

    if novel.chapters.is_empty() {
        echo::print_warning("No chapter passed the length filter");
    }

    if args.verbose {
        echo::print_novel_summary(&novel);
        echo::print_step(2, 3, &format!("Rendering {}", args.format));
    }

    let output = render(&novel, args.format).context("Failed to render novel")?;
    tracing::debug!(format = %args.format, bytes = output.len(), "rendered novel");

    if args.verbose {
        echo::print_step(3, 3, "Writing output");
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(output.len()).bright_white());
        eprintln!();
    }

    match args.output {
        Some(path) => {
            let path = if path.is_dir() { path.join(default_file_name(&novel, args.format)) } else { path };
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
