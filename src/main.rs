//! abbrev - convert between HTML with inline markup and an attributed text model.
//!
//! # Usage
//!
//! ```bash
//! abbrev upcast page.html
//! abbrev downcast --pretty model.json
//! abbrev check --strict --rule definition=dfn:title page.html
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use abbrev::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use abbrev::document::Document;
use abbrev::perf;

/// Convert between HTML inline markup and an attributed text model
#[derive(Parser, Debug)]
#[command(name = "abbrev", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Fail on elements no rule recognizes instead of flattening them
    #[arg(long, global = true)]
    strict: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log timing of each conversion pass
    #[arg(long, global = true)]
    perf: bool,

    /// Additional conversion rule (repeatable)
    #[arg(long = "rule", value_name = "NAME=ELEMENT:PARAM", global = true)]
    rules: Vec<String>,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read an HTML fragment and print the document model as JSON
    Upcast {
        /// HTML file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Read a JSON document model and print it as HTML
    Downcast {
        /// JSON file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Check that an HTML fragment survives model → HTML → model
    Check {
        /// HTML file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn init_logging(flags: &ConfigFlags) -> Result<()> {
    let mut filter =
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if flags.perf {
        filter = filter.add_directive("perf=info".parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        strict: cli.strict,
        pretty: cli.pretty,
        perf: cli.perf,
        rules: cli.rules.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(&effective)?;
    perf::set_enabled(effective.perf);

    let engine = effective.engine()?;

    match cli.command {
        Command::Upcast { file } => {
            let markup = read_input(&file)?;
            let document = engine
                .load_html(&markup)
                .with_context(|| format!("Failed to upcast {}", file.display()))?;
            let json = if effective.pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };
            println!("{json}");
        }
        Command::Downcast { file } => {
            let json = read_input(&file)?;
            let document: Document = serde_json::from_str(&json)
                .with_context(|| format!("Invalid document model in {}", file.display()))?;
            let html = engine
                .render_html(&document)
                .with_context(|| format!("Failed to downcast {}", file.display()))?;
            println!("{html}");
        }
        Command::Check { file } => {
            let markup = read_input(&file)?;
            let document = engine.load_html(&markup)?;
            let rendered = engine.render_html(&document)?;
            let reloaded = engine.load_html(&rendered)?;
            if reloaded != document {
                anyhow::bail!(
                    "{} does not round-trip:\n  loaded:   {}\n  reloaded: {}",
                    file.display(),
                    serde_json::to_string(&document)?,
                    serde_json::to_string(&reloaded)?
                );
            }
            let attributed = document
                .runs()
                .iter()
                .filter(|run| !run.attributes().is_empty())
                .count();
            println!(
                "ok: {} runs, {attributed} attributed",
                document.runs().len()
            );
        }
    }

    Ok(())
}
