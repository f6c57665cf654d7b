use crate::actions::ActionVerb;
use crate::error::{LocatorError, Result};
use crate::locator::cache::DEFAULT_CACHE_PATH;
use crate::locator::registry::DEFAULT_REGISTRY_PATH;
use crate::locator::scorer::MetricKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tuning for resolution and action interception
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealConfig {
    /// Minimum score a candidate needs to be accepted (default: 60)
    pub threshold: u32,

    /// Added to a candidate's score when its classification matches the registry (default: 10)
    pub registry_boost: u32,

    /// Bound on the direct action attempt before healing kicks in (default: 2000)
    pub action_timeout_ms: u64,

    /// Persisted mapping document
    pub cache_path: PathBuf,

    /// Optional offline registry; absence disables the boost
    pub registry_path: Option<PathBuf>,

    /// Verbs whose timeouts are routed through the resolver
    pub healing_verbs: Vec<ActionVerb>,

    /// Similarity strategy used by the candidate scorer
    pub metric: MetricKind,
}

impl Default for HealConfig {
    fn default() -> Self {
        Self {
            threshold: 60,
            registry_boost: 10,
            action_timeout_ms: 2000,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            registry_path: Some(PathBuf::from(DEFAULT_REGISTRY_PATH)),
            healing_verbs: vec![
                ActionVerb::Fill,
                ActionVerb::SelectOption,
                ActionVerb::Visibility,
            ],
            metric: MetricKind::default(),
        }
    }
}

impl HealConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON config document; omitted fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LocatorError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| LocatorError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.action_timeout_ms == 0 {
            return Err(LocatorError::Config("action_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn registry_boost(mut self, boost: u32) -> Self {
        self.registry_boost = boost;
        self
    }

    pub fn action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    pub fn registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = Some(path.into());
        self
    }

    pub fn without_registry(mut self) -> Self {
        self.registry_path = None;
        self
    }

    pub fn healing_verbs(mut self, verbs: Vec<ActionVerb>) -> Self {
        self.healing_verbs = verbs;
        self
    }

    /// Opt clicks in or out of healing
    pub fn heal_clicks(mut self, enabled: bool) -> Self {
        self.healing_verbs.retain(|v| *v != ActionVerb::Click);
        if enabled {
            self.healing_verbs.push(ActionVerb::Click);
        }
        self
    }

    pub fn metric(mut self, metric: MetricKind) -> Self {
        self.metric = metric;
        self
    }

    /// Whether a timeout on `verb` should trigger resolution
    pub fn heals(&self, verb: ActionVerb) -> bool {
        self.healing_verbs.contains(&verb)
    }

    pub fn action_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }
}
