use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("novelthread")
        .version(env!("CARGO_PKG_VERSION"))
        .author("novelthread contributors")
        .about("Extract serialized novels from forum threads")
        .arg(clap::arg!(<URL> "Thread URL (thread-<id>-<page>-1.html or forum.php?tid=<id>)"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file, or a directory to write <title>.<ext> into (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (txt, markdown, json)")
                .value_name("FORMAT")
                .default_value("txt")
                .value_parser(["txt", "text", "markdown", "md", "json"]),
        )
        .arg(clap::arg!(--floor <SPEC> "Floors to keep, e.g. \"1,3-5,10-\"").value_name("SPEC"))
        .arg(clap::arg!(--cookie <COOKIE> "Cookie header sent with every request").value_name("COOKIE"))
        .arg(
            clap::arg!(--"min-chars" <NUM> "Chapters with this many characters or fewer are dropped")
                .default_value("100"),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--"no-proxy" "Ignore HTTP proxies set in the environment"))
        .arg(clap::arg!(--concurrency <NUM> "Maximum number of pages fetched at once (default: all)"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "novelthread", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "novelthread", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "novelthread", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "novelthread", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
