//! # heal-locator
//!
//! A self-healing element locator for browser-driven UI tests over the Chrome
//! DevTools Protocol (CDP).
//!
//! When a selector stops matching (an id was renamed, a name changed), the
//! locator inspects the live page, picks the most similar control, replays the
//! action against it and remembers the mapping in `locator_cache.json`, so the
//! next run goes straight to the healed selector.
//!
//! ## Features
//!
//! - **Tiered resolution**: cache, then id/name similarity, then `data-testid`,
//!   then fuzzy content matching over form controls
//! - **Pluggable scoring**: partial-ratio similarity by default, with an
//!   optional registry boost for controls whose classification is known
//! - **Transparent interception**: [`HealingPage`] wraps any [`PageActions`]
//!   driver and only steps in when an action times out
//! - **Run summary**: every heal is logged once per run and summarised at teardown
//!
//! ## Usage
//!
//! ```rust,no_run
//! use heal_locator::{BrowserSession, HealConfig, HealRun, LaunchOptions, PageActions};
//!
//! # fn main() -> heal_locator::Result<()> {
//! let mut session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("http://127.0.0.1:5000/add")?;
//!
//! let mut run = HealRun::new(HealConfig::default());
//! {
//!     let mut page = run.page(&mut session);
//!     page.fill("#amount", "42", None)?;
//!     page.select_option("[name=\"category\"]", "Food", None)?;
//! }
//!
//! println!("{}", run.finish());
//! # Ok(())
//! # }
//! ```
//!
//! ### Offline resolution
//!
//! Snapshots can be saved and resolved without a browser:
//!
//! ```rust,no_run
//! use heal_locator::{DomTree, HealConfig, HealLog, Resolver};
//!
//! # fn main() -> heal_locator::Result<()> {
//! let snapshot = DomTree::load("add_page.json")?;
//! let mut resolver = Resolver::new(HealConfig::default());
//! let mut log = HealLog::new();
//!
//! let handle = resolver.resolve(&snapshot, "#amount", 60, &mut log)?;
//! println!("{} → {}", handle.original, handle.selector());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`locator`]: descriptor parsing, scoring, cache, registry and the resolver
//! - [`actions`]: the action interface, healing decorator and run orchestrator
//! - [`dom`]: page snapshots and the document query adapter
//! - [`browser`]: Chrome session management implementing [`PageActions`]
//! - [`error`]: Error types and result aliases

pub mod actions;
pub mod browser;
pub mod dom;
pub mod error;
pub mod locator;

pub use actions::{ActionVerb, HealRun, HealingPage, PageActions, should_heal};
pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use dom::{DocumentQuery, DomTree, ElementNode, TagFilter};
pub use error::{LocatorError, Result};
pub use locator::{
    HealConfig, HealEvent, HealLog, MappingCache, Registry, RegistryEntry, ResolutionPhase, ResolvedHandle, Resolver,
};
