use crate::actions::{HealingPage, PageActions};
use crate::locator::{HealConfig, HealLog, Resolver};

/// Run-scoped healing context.
///
/// Owns the resolver (and through it the mapping cache) together with the
/// heal log for one test run. Pages wrapped via [`page`](Self::page) share
/// both; [`finish`](Self::finish) renders the summary at teardown.
pub struct HealRun {
    resolver: Resolver,
    log: HealLog,
}

impl HealRun {
    pub fn new(config: HealConfig) -> Self {
        Self::with_resolver(Resolver::new(config))
    }

    pub fn with_resolver(resolver: Resolver) -> Self {
        Self {
            resolver,
            log: HealLog::new(),
        }
    }

    /// Wrap a driver so its actions heal through this run
    pub fn page<P: PageActions>(&mut self, inner: P) -> HealingPage<'_, P> {
        HealingPage::new(inner, &mut self.resolver, &mut self.log)
    }

    pub fn resolver(&mut self) -> &mut Resolver {
        &mut self.resolver
    }

    pub fn log(&self) -> &HealLog {
        &self.log
    }

    /// End the run, logging the heal summary and handing back the log
    pub fn finish(self) -> HealLog {
        log::info!("{}", self.log);
        self.log
    }
}

impl Default for HealRun {
    fn default() -> Self {
        Self::new(HealConfig::default())
    }
}
