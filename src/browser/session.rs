use crate::{actions::{ActionVerb, PageActions},
            browser::config::{ConnectionOptions, LaunchOptions},
            dom::{self, DomTree},
            error::{LocatorError, Result}};
use headless_chrome::{Browser, Element, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

const FILL_JS: &str = r#"
    function(value) {
        this.focus();
        this.value = value;
        this.dispatchEvent(new Event('input', { bubbles: true }));
        this.dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    }
"#;

const SELECT_JS: &str = r#"
    function(value) {
        const option = Array.from(this.options || []).find(
            (o) => o.value === value || o.label === value || o.text.trim() === value
        );
        if (!option) {
            return false;
        }
        this.value = option.value;
        this.dispatchEvent(new Event('input', { bubbles: true }));
        this.dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    }
"#;

const VISIBLE_JS: &str = r#"
    function() {
        const style = window.getComputedStyle(this);
        const rect = this.getBoundingClientRect();
        return style.display !== 'none'
            && style.visibility !== 'hidden'
            && rect.width > 0
            && rect.height > 0;
    }
"#;

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Element wait used when an action carries no timeout of its own
    element_timeout: Duration,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // A test run can sit idle between actions far longer than the 30s default
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| LocatorError::LaunchFailed(e.to_string()))?;

        browser.new_tab().map_err(|e| LocatorError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, element_timeout: options.element_timeout })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url).map_err(|e| LocatorError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser, element_timeout: Duration::from_millis(options.timeout) })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| LocatorError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // Visible and focused is the strongest signal; visible alone is the fallback
        for check in ["document.visibilityState === 'visible' && document.hasFocus()", "document.visibilityState === 'visible'"] {
            for tab in &tabs {
                match tab.evaluate(check, false) {
                    Ok(remote_object) => {
                        if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                    Err(e) => {
                        log::debug!("Failed to check tab status: {}", e);
                    }
                }
            }
        }

        // Headless tabs may report neither; fall back to the first tab
        tabs.into_iter()
            .next()
            .ok_or_else(|| LocatorError::TabOperationFailed("No active tab found".to_string()))
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate to a URL using the active tab
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .map_err(|e| LocatorError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab()?
            .wait_until_navigated()
            .map_err(|e| LocatorError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Capture the active tab as a resolvable snapshot
    pub fn capture(&self) -> Result<DomTree> {
        dom::extract_dom(&self.tab()?)
    }

    /// Wait up to `timeout` for `selector`, then run `action` on the element.
    ///
    /// A selector that never appears is an `ActionTimeout`; a failure inside
    /// `action` is an `ActionFailed`.
    fn with_element<T, F>(&self, verb: ActionVerb, selector: &str, timeout: Option<Duration>, action: F) -> Result<T>
    where
        F: FnOnce(&Element<'_>) -> anyhow::Result<T>,
    {
        let tab = self.tab()?;
        let wait = timeout.unwrap_or(self.element_timeout);

        let element = tab.wait_for_element_with_custom_timeout(selector, wait).map_err(|e| {
            log::debug!("Waiting for '{}' failed: {}", selector, e);
            LocatorError::ActionTimeout { selector: selector.to_string(), timeout_ms: wait.as_millis() as u64 }
        })?;

        action(&element).map_err(|e| LocatorError::ActionFailed {
            action: verb.as_str().to_string(),
            selector: selector.to_string(),
            reason: e.to_string(),
        })
    }

    /// Close every tab. The Chrome process itself exits when the session is dropped.
    pub fn close(&self) -> Result<()> {
        for tab in self.get_tabs()? {
            tab.close(false)
                .map_err(|e| LocatorError::TabOperationFailed(format!("Failed to close tab: {}", e)))?;
        }
        Ok(())
    }
}

fn returned_true(object: headless_chrome::protocol::cdp::Runtime::RemoteObject) -> bool {
    object.value.and_then(|v| v.as_bool()).unwrap_or(false)
}

impl PageActions for BrowserSession {
    fn fill(&mut self, selector: &str, value: &str, timeout: Option<Duration>) -> Result<()> {
        self.with_element(ActionVerb::Fill, selector, timeout, |element| {
            element.call_js_fn(FILL_JS, vec![serde_json::json!(value)], false)?;
            Ok(())
        })
    }

    fn select_option(&mut self, selector: &str, value: &str, timeout: Option<Duration>) -> Result<()> {
        self.with_element(ActionVerb::SelectOption, selector, timeout, |element| {
            let selected = element.call_js_fn(SELECT_JS, vec![serde_json::json!(value)], false)?;
            if !returned_true(selected) {
                anyhow::bail!("no option matching '{}'", value);
            }
            Ok(())
        })
    }

    fn is_visible(&mut self, selector: &str, timeout: Option<Duration>) -> Result<bool> {
        self.with_element(ActionVerb::Visibility, selector, timeout, |element| {
            let visible = element.call_js_fn(VISIBLE_JS, vec![], false)?;
            Ok(returned_true(visible))
        })
    }

    fn click(&mut self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        self.with_element(ActionVerb::Click, selector, timeout, |element| {
            element.click()?;
            Ok(())
        })
    }

    fn snapshot(&mut self) -> Result<DomTree> {
        self.capture()
    }
}
