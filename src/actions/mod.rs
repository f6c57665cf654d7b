//! Page actions and the healing decorator
//!
//! [`PageActions`] is the driver-facing surface tests call into. The browser
//! session implements it directly; [`HealingPage`] wraps any implementation so
//! that a timed-out action is resolved and replayed transparently.

pub mod healing;
pub mod run;

pub use healing::{HEAL_TAGS, HealingPage, should_heal};
pub use run::HealRun;

use crate::dom::DomTree;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interactive action kinds that can be routed through healing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ActionVerb {
    /// Type a value into a control
    Fill,
    /// Choose an option of a select control
    SelectOption,
    /// Query whether an element is visible
    Visibility,
    /// Click an element
    Click,
}

impl ActionVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionVerb::Fill => "fill",
            ActionVerb::SelectOption => "select_option",
            ActionVerb::Visibility => "visibility",
            ActionVerb::Click => "click",
        }
    }
}

/// Selector-addressed actions of an automation driver.
///
/// `timeout` bounds how long the driver waits for the selector to appear;
/// `None` means the driver's own default. A selector that never appears must
/// surface as [`LocatorError::ActionTimeout`](crate::LocatorError::ActionTimeout).
pub trait PageActions {
    fn fill(&mut self, selector: &str, value: &str, timeout: Option<Duration>) -> Result<()>;

    fn select_option(&mut self, selector: &str, value: &str, timeout: Option<Duration>) -> Result<()>;

    fn is_visible(&mut self, selector: &str, timeout: Option<Duration>) -> Result<bool>;

    fn click(&mut self, selector: &str, timeout: Option<Duration>) -> Result<()>;

    /// Capture the current page for resolution
    fn snapshot(&mut self) -> Result<DomTree>;
}

impl<P: PageActions + ?Sized> PageActions for &mut P {
    fn fill(&mut self, selector: &str, value: &str, timeout: Option<Duration>) -> Result<()> {
        (**self).fill(selector, value, timeout)
    }

    fn select_option(&mut self, selector: &str, value: &str, timeout: Option<Duration>) -> Result<()> {
        (**self).select_option(selector, value, timeout)
    }

    fn is_visible(&mut self, selector: &str, timeout: Option<Duration>) -> Result<bool> {
        (**self).is_visible(selector, timeout)
    }

    fn click(&mut self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        (**self).click(selector, timeout)
    }

    fn snapshot(&mut self) -> Result<DomTree> {
        (**self).snapshot()
    }
}
