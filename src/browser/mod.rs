//! Browser session management over the Chrome DevTools Protocol
//!
//! [`BrowserSession`] is the concrete [`PageActions`](crate::actions::PageActions)
//! driver: it launches or attaches to Chrome, navigates, captures page
//! snapshots and performs selector-addressed actions with bounded waits.

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, DEFAULT_ELEMENT_TIMEOUT, LaunchOptions};
pub use session::BrowserSession;
