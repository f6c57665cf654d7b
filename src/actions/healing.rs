use crate::actions::{ActionVerb, PageActions};
use crate::dom::DomTree;
use crate::error::Result;
use crate::locator::{HealLog, Resolver, SelectorDescriptor};
use std::time::Duration;

/// Leading tag tokens that make an opaque selector eligible for healing
pub const HEAL_TAGS: [&str; 4] = ["input", "textarea", "select", "button"];

/// Whether a timed-out `selector` is worth resolving: id- or name-shaped
/// selectors always are, others only when they lead with a control tag.
pub fn should_heal(selector: &str) -> bool {
    let descriptor = SelectorDescriptor::parse(selector);
    descriptor.is_attribute_based()
        || descriptor
            .tag_hint
            .as_deref()
            .is_some_and(|tag| HEAL_TAGS.contains(&tag))
}

/// Decorator over a [`PageActions`] driver that heals timed-out selectors.
///
/// Each action is first tried with the configured short timeout. On an
/// `ActionTimeout` for a healing verb whose selector passes [`should_heal`],
/// the page is resolved against the current snapshot and the action is
/// replayed on the resolved selector with the caller's timeout. Any other
/// failure is returned as-is.
pub struct HealingPage<'r, P> {
    inner: P,
    resolver: &'r mut Resolver,
    log: &'r mut HealLog,
}

impl<'r, P: PageActions> HealingPage<'r, P> {
    pub fn new(inner: P, resolver: &'r mut Resolver, log: &'r mut HealLog) -> Self {
        Self { inner, resolver, log }
    }

    /// The wrapped driver
    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    fn attempt<T, F>(&mut self, verb: ActionVerb, selector: &str, timeout: Option<Duration>, mut op: F) -> Result<T>
    where
        F: FnMut(&mut P, &str, Option<Duration>) -> Result<T>,
    {
        let bound = self.resolver.config().action_timeout_duration();

        let err = match op(&mut self.inner, selector, Some(bound)) {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_timeout() || !self.resolver.config().heals(verb) || !should_heal(selector) {
            return Err(err);
        }

        log::debug!("{} on '{}' timed out; resolving", verb.as_str(), selector);

        let threshold = self.resolver.threshold();
        let inner = &mut self.inner;
        let handle = self
            .resolver
            .resolve_with(selector, threshold, self.log, || inner.snapshot())?;

        op(&mut self.inner, handle.selector(), timeout)
    }
}

impl<P: PageActions> PageActions for HealingPage<'_, P> {
    fn fill(&mut self, selector: &str, value: &str, timeout: Option<Duration>) -> Result<()> {
        self.attempt(ActionVerb::Fill, selector, timeout, |page, sel, t| page.fill(sel, value, t))
    }

    fn select_option(&mut self, selector: &str, value: &str, timeout: Option<Duration>) -> Result<()> {
        self.attempt(ActionVerb::SelectOption, selector, timeout, |page, sel, t| {
            page.select_option(sel, value, t)
        })
    }

    fn is_visible(&mut self, selector: &str, timeout: Option<Duration>) -> Result<bool> {
        self.attempt(ActionVerb::Visibility, selector, timeout, |page, sel, t| page.is_visible(sel, t))
    }

    fn click(&mut self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        self.attempt(ActionVerb::Click, selector, timeout, |page, sel, t| page.click(sel, t))
    }

    fn snapshot(&mut self) -> Result<DomTree> {
        self.inner.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;
    use crate::error::LocatorError;
    use crate::locator::HealConfig;

    #[test]
    fn test_should_heal_attribute_selectors() {
        assert!(should_heal("#amount"));
        assert!(should_heal("[name=\"amount\"]"));
        assert!(should_heal("div#wrapper"));
    }

    #[test]
    fn test_should_heal_control_tags() {
        assert!(should_heal("input.amount"));
        assert!(should_heal("TEXTAREA.notes"));
        assert!(should_heal("select"));
        assert!(should_heal("button.primary"));
    }

    #[test]
    fn test_should_not_heal_other_shapes() {
        assert!(!should_heal("div.card > span"));
        assert!(!should_heal("a.nav-link"));
        assert!(!should_heal(".floating"));
        assert!(!should_heal("*"));
    }

    /// Driver whose only control is `#amt`; every other selector times out
    struct OneControlPage {
        calls: Vec<(String, Option<Duration>)>,
    }

    impl OneControlPage {
        fn act(&mut self, selector: &str, timeout: Option<Duration>) -> Result<()> {
            self.calls.push((selector.to_string(), timeout));
            if selector == "#amt" {
                Ok(())
            } else {
                Err(LocatorError::ActionTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.map_or(0, |t| t.as_millis() as u64),
                })
            }
        }
    }

    impl PageActions for OneControlPage {
        fn fill(&mut self, selector: &str, _value: &str, timeout: Option<Duration>) -> Result<()> {
            self.act(selector, timeout)
        }

        fn select_option(&mut self, selector: &str, _value: &str, timeout: Option<Duration>) -> Result<()> {
            self.act(selector, timeout)
        }

        fn is_visible(&mut self, selector: &str, timeout: Option<Duration>) -> Result<bool> {
            self.act(selector, timeout).map(|_| true)
        }

        fn click(&mut self, selector: &str, timeout: Option<Duration>) -> Result<()> {
            self.act(selector, timeout)
        }

        fn snapshot(&mut self) -> Result<DomTree> {
            Ok(DomTree::new(
                ElementNode::new("body")
                    .with_children(vec![ElementNode::new("input").with_attribute("id", "amt")]),
            ))
        }
    }

    #[test]
    fn test_fill_heals_and_replays() {
        let dir = tempfile::tempdir().unwrap();
        let config = HealConfig::new()
            .cache_path(dir.path().join("locator_cache.json"))
            .without_registry()
            .action_timeout(Duration::from_millis(250));
        let mut resolver = Resolver::new(config);
        let mut log = HealLog::new();

        let mut page = HealingPage::new(
            OneControlPage { calls: Vec::new() },
            &mut resolver,
            &mut log,
        );
        page.fill("#amount", "42", None).unwrap();

        let calls = &page.inner().calls;
        assert_eq!(
            calls,
            &vec![
                ("#amount".to_string(), Some(Duration::from_millis(250))),
                ("#amt".to_string(), None),
            ]
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_click_timeout_propagates_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = HealConfig::new()
            .cache_path(dir.path().join("locator_cache.json"))
            .without_registry();
        let mut resolver = Resolver::new(config);
        let mut log = HealLog::new();

        let mut page = HealingPage::new(
            OneControlPage { calls: Vec::new() },
            &mut resolver,
            &mut log,
        );
        let err = page.click("#amount", None).unwrap_err();

        assert!(matches!(err, LocatorError::ActionTimeout { timeout_ms: 2000, .. }));
        assert_eq!(page.inner().calls.len(), 1);
        assert!(log.is_empty());
    }
}
