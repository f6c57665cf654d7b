//! heal-locator CLI
//!
//! Resolves broken selectors against saved snapshots or live pages, captures
//! snapshots for offline use, and inspects the persisted selector cache.

use anyhow::Context;
use clap::{Parser, Subcommand};
use heal_locator::locator::MappingCache;
use heal_locator::{ActionVerb, BrowserSession, DomTree, HealConfig, HealLog, HealRun, LaunchOptions, PageActions,
                   Resolver};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "heal-locator")]
#[command(version)]
#[command(about = "Self-healing element locator for browser UI tests", long_about = None)]
struct Cli {
    /// JSON config file (threshold, boost, timeouts, healing verbs, metric)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Selector cache document (default: locator_cache.json)
    #[arg(long, global = true, value_name = "FILE")]
    cache: Option<PathBuf>,

    /// Selector registry document (default: selector_registry.json)
    #[arg(long, global = true, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H', global = true)]
    headed: bool,

    /// Enable info-level logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a selector against a saved snapshot
    Resolve {
        /// Snapshot document written by `snapshot`
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,

        /// Original (possibly broken) selector
        #[arg(long)]
        selector: String,

        /// Acceptance threshold override
        #[arg(long)]
        threshold: Option<u32>,
    },

    /// Capture a live page into a snapshot document
    Snapshot {
        #[arg(long)]
        url: String,

        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Run one intercepted action against a live page
    Check {
        #[arg(long)]
        url: String,

        #[arg(long)]
        selector: String,

        #[arg(long, value_enum, default_value = "visibility")]
        verb: ActionVerb,

        /// Value for fill / select-option
        #[arg(long, default_value = "")]
        value: String,
    },

    /// List the persisted selector mappings
    Cache,
}

impl Cli {
    fn heal_config(&self) -> anyhow::Result<HealConfig> {
        let mut config = match &self.config {
            Some(path) => HealConfig::from_json_file(path)?,
            None => HealConfig::default(),
        };

        if let Some(cache) = &self.cache {
            config = config.cache_path(cache);
        }
        if let Some(registry) = &self.registry {
            config = config.registry_path(registry);
        }

        Ok(config)
    }

    fn launch(&self) -> anyhow::Result<BrowserSession> {
        let session = BrowserSession::launch(LaunchOptions::new().headless(!self.headed))?;
        Ok(session)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = cli.heal_config()?;

    match &cli.command {
        Command::Resolve { snapshot, selector, threshold } => {
            let doc = DomTree::load(snapshot)?;
            let mut resolver = Resolver::new(config);
            let threshold = threshold.unwrap_or(resolver.threshold());
            let mut log = HealLog::new();

            let handle = resolver.resolve(&doc, selector, threshold, &mut log)?;
            println!("{}", handle.selector());
            eprintln!("Resolved via {}", handle.phase);
            eprintln!("{}", log);
        }
        Command::Snapshot { url, out } => {
            let session = cli.launch()?;
            session.navigate(url)?;
            session.wait_for_navigation()?;

            let doc = session.capture()?;
            session.close()?;
            doc.save(out)?;
            eprintln!("Captured {} elements from {} into {}", doc.count_elements(), url, out.display());
        }
        Command::Check { url, selector, verb, value } => {
            let mut session = cli.launch()?;
            session.navigate(url)?;
            session.wait_for_navigation()?;

            let mut run = HealRun::new(config);
            let outcome = {
                let mut page = run.page(&mut session);
                match verb {
                    ActionVerb::Fill => page.fill(selector, value, None).map(|_| "filled".to_string()),
                    ActionVerb::SelectOption => {
                        page.select_option(selector, value, None).map(|_| "selected".to_string())
                    }
                    ActionVerb::Visibility => page.is_visible(selector, None).map(|v| format!("visible: {}", v)),
                    ActionVerb::Click => page.click(selector, None).map(|_| "clicked".to_string()),
                }
            };

            session.close()?;
            let log = run.finish();
            eprintln!("{}", log);
            println!("{}", outcome.with_context(|| format!("{} on '{}'", verb.as_str(), selector))?);
        }
        Command::Cache => {
            let path = config.cache_path.as_path();
            let entries = MappingCache::read_document(path)?;

            if entries.is_empty() {
                println!("{}: no cached selectors", path.display());
            }
            for (original, healed) in &entries {
                println!("{:<25} → {}", original, healed);
            }
        }
    }

    Ok(())
}
