//! Healing resolution: maps a broken selector to its most likely replacement.
//!
//! Phases run in order and stop at the first one whose best candidate clears
//! the threshold:
//!
//! 1. cache lookup (no document scan)
//! 2. id / name attribute match, for id- and name-shaped selectors
//! 3. `data-testid` fallback
//! 4. fuzzy content match over form controls, with the registry boost
//!
//! Ties keep the earliest candidate in document order. Only scanned heals
//! touch the cache and the heal log.

use crate::dom::{DocumentQuery, ElementNode, TagFilter};
use crate::error::{LocatorError, Result};
use crate::locator::cache::MappingCache;
use crate::locator::classifier::classify;
use crate::locator::config::HealConfig;
use crate::locator::descriptor::{DescriptorKind, SelectorDescriptor};
use crate::locator::events::{HealEvent, HealLog};
use crate::locator::registry::Registry;
use crate::locator::scorer::{CandidateScorer, SimilarityMetric};
use serde::Serialize;
use std::fmt;

/// Tags considered by the fuzzy content pass
pub const FUZZY_TAGS: [&str; 3] = ["input", "textarea", "select"];

/// Stable test-identifier attribute used by the fallback pass
pub const TEST_ID_ATTRIBUTE: &str = "data-testid";

/// Phase that produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPhase {
    CacheLookup,
    IdNameMatch,
    TestIdFallback,
    FuzzyContentMatch,
}

impl fmt::Display for ResolutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionPhase::CacheLookup => "cache lookup",
            ResolutionPhase::IdNameMatch => "id/name match",
            ResolutionPhase::TestIdFallback => "test-id fallback",
            ResolutionPhase::FuzzyContentMatch => "fuzzy content match",
        };
        f.write_str(name)
    }
}

/// Working selector for a broken original
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedHandle {
    pub original: String,
    pub selector: String,
    pub phase: ResolutionPhase,
    /// Winning score; `None` for cache hits
    pub score: Option<u32>,
}

impl ResolvedHandle {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Whether this resolution came from a document scan rather than the cache
    pub fn was_healed(&self) -> bool {
        self.phase != ResolutionPhase::CacheLookup
    }
}

/// Best candidate of a phase; `selector` is `None` when the element cannot be addressed
struct Winner {
    selector: Option<String>,
    score: u32,
}

fn best_of<'a, I>(scored: I) -> Option<(&'a ElementNode, u32)>
where
    I: IntoIterator<Item = (&'a ElementNode, u32)>,
{
    let mut best: Option<(&'a ElementNode, u32)> = None;
    for (element, score) in scored {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((element, score));
        }
    }
    best
}

/// Escape `value` for use as a CSS identifier after `#` or `.`
fn css_ident(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, ch) in value.chars().enumerate() {
        let leading_digit = ch.is_ascii_digit() && (i == 0 || (i == 1 && value.starts_with('-')));
        if leading_digit || ch.is_control() {
            escaped.push_str(&format!("\\{:x} ", ch as u32));
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            escaped.push(ch);
        } else {
            escaped.push('\\');
            escaped.push(ch);
        }
    }
    if escaped == "-" {
        escaped.insert(0, '\\');
    }
    escaped
}

/// `[attribute="value"]` with the value quoted as a CSS string
fn attribute_selector(attribute: &str, value: &str) -> String {
    let mut quoted = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            ch if ch.is_control() => quoted.push_str(&format!("\\{:x} ", ch as u32)),
            ch => quoted.push(ch),
        }
    }
    format!("[{}=\"{}\"]", attribute, quoted)
}

/// Tiered selector resolver owning the mapping cache and reference registry
pub struct Resolver {
    config: HealConfig,
    cache: MappingCache,
    registry: Registry,
    scorer: CandidateScorer,
}

impl Resolver {
    /// Build a resolver from `config`, binding its cache file and loading the registry if present
    pub fn new(config: HealConfig) -> Self {
        let cache = MappingCache::open(config.cache_path.clone());
        let registry = config
            .registry_path
            .as_ref()
            .map(Registry::load_or_empty)
            .unwrap_or_default();
        let scorer = CandidateScorer::new(config.metric.build(), config.registry_boost);
        log::debug!(
            "Resolver using {} metric, threshold {}, {} registry entries",
            scorer.metric_name(),
            config.threshold,
            registry.len()
        );

        Self {
            config,
            cache,
            registry,
            scorer,
        }
    }

    /// Replace the registry loaded from the config
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Swap in a custom similarity strategy
    pub fn with_metric(mut self, metric: Box<dyn SimilarityMetric>) -> Self {
        self.scorer = CandidateScorer::new(metric, self.config.registry_boost);
        self
    }

    pub fn config(&self) -> &HealConfig {
        &self.config
    }

    /// Default acceptance threshold from the config
    pub fn threshold(&self) -> u32 {
        self.config.threshold
    }

    pub fn cache(&mut self) -> &mut MappingCache {
        &mut self.cache
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve `original` against an already captured document
    pub fn resolve<Q>(
        &mut self,
        doc: &Q,
        original: &str,
        threshold: u32,
        log: &mut HealLog,
    ) -> Result<ResolvedHandle>
    where
        Q: DocumentQuery + ?Sized,
    {
        self.resolve_with(original, threshold, log, || Ok(doc))
    }

    /// Resolve `original`, capturing the document only if the cache misses
    pub fn resolve_with<Q, F>(
        &mut self,
        original: &str,
        threshold: u32,
        log: &mut HealLog,
        snapshot: F,
    ) -> Result<ResolvedHandle>
    where
        Q: DocumentQuery,
        F: FnOnce() -> Result<Q>,
    {
        if let Some(cached) = self.cache.lookup(original) {
            log::debug!("Cache hit for '{}' → '{}'", original, cached);
            return Ok(ResolvedHandle {
                original: original.to_string(),
                selector: cached,
                phase: ResolutionPhase::CacheLookup,
                score: None,
            });
        }

        let doc = snapshot()?;
        let descriptor = SelectorDescriptor::parse(original);
        let mut best_seen = 0;

        let phases = [
            ResolutionPhase::IdNameMatch,
            ResolutionPhase::TestIdFallback,
            ResolutionPhase::FuzzyContentMatch,
        ];

        for phase in phases {
            let winner = match phase {
                ResolutionPhase::IdNameMatch => self.match_id_or_name(&doc, &descriptor),
                ResolutionPhase::TestIdFallback => self.match_test_id(&doc, &descriptor),
                ResolutionPhase::FuzzyContentMatch => self.match_content(&doc, &descriptor, original),
                ResolutionPhase::CacheLookup => None,
            };

            let Some(winner) = winner else {
                log::debug!("{}: no candidates for '{}'", phase, original);
                continue;
            };

            log::debug!("{}: best score {} for '{}'", phase, winner.score, original);
            best_seen = best_seen.max(winner.score);

            if winner.score < threshold {
                continue;
            }

            match winner.selector {
                Some(selector) => return self.commit(original, selector, phase, winner.score, log),
                None => log::debug!(
                    "{}: best candidate for '{}' has neither id nor class; rejected",
                    phase,
                    original
                ),
            }
        }

        Err(LocatorError::NoMatchFound {
            selector: original.to_string(),
            best_score: best_seen,
        })
    }

    fn match_id_or_name<Q>(&self, doc: &Q, descriptor: &SelectorDescriptor) -> Option<Winner>
    where
        Q: DocumentQuery + ?Sized,
    {
        let attribute = match descriptor.kind {
            DescriptorKind::Id => "id",
            DescriptorKind::Name => "name",
            DescriptorKind::Opaque => return None,
        };

        let elements = doc.find_all(TagFilter::All);
        let scored = elements.into_iter().filter_map(|el| {
            let value = el.get_attribute(attribute)?;
            Some((el, self.scorer.score(&descriptor.value, value)))
        });

        let (element, score) = best_of(scored)?;
        let value = element.get_attribute(attribute).unwrap_or_default();
        let selector = match descriptor.kind {
            DescriptorKind::Id => format!("#{}", css_ident(value)),
            _ => attribute_selector("name", value),
        };

        Some(Winner {
            selector: Some(selector),
            score,
        })
    }

    fn match_test_id<Q>(&self, doc: &Q, descriptor: &SelectorDescriptor) -> Option<Winner>
    where
        Q: DocumentQuery + ?Sized,
    {
        let elements = doc.find_all(TagFilter::All);
        let scored = elements.into_iter().filter_map(|el| {
            let value = el.test_id()?;
            Some((el, self.scorer.score(&descriptor.key, value)))
        });

        let (element, score) = best_of(scored)?;
        let value = element.test_id().unwrap_or_default();

        Some(Winner {
            selector: Some(attribute_selector(TEST_ID_ATTRIBUTE, value)),
            score,
        })
    }

    fn match_content<Q>(
        &self,
        doc: &Q,
        descriptor: &SelectorDescriptor,
        original: &str,
    ) -> Option<Winner>
    where
        Q: DocumentQuery + ?Sized,
    {
        if descriptor.key.is_empty() {
            return None;
        }

        let route = doc.route();
        let known_class = self.registry.classification_for(route.as_deref(), original);

        let elements = doc.find_all(TagFilter::Only(&FUZZY_TAGS));
        let scored = elements.into_iter().map(|el| {
            let candidate_key = el.id().or_else(|| el.name()).or_else(|| el.text()).unwrap_or("");
            let score = self.scorer.score_with_registry(
                &descriptor.key,
                candidate_key,
                &classify(el),
                known_class,
            );
            (el, score)
        });

        let (element, score) = best_of(scored)?;
        log::debug!("Best content candidate: {}", element.to_simple_string());

        let tag = element.tag_name.to_ascii_lowercase();
        let selector = element
            .id()
            .map(|id| format!("{}#{}", tag, css_ident(id)))
            .or_else(|| element.first_class().map(|class| format!("{}.{}", tag, css_ident(class))));

        Some(Winner { selector, score })
    }

    fn commit(
        &mut self,
        original: &str,
        selector: String,
        phase: ResolutionPhase,
        score: u32,
        log: &mut HealLog,
    ) -> Result<ResolvedHandle> {
        self.cache.upsert(original, &selector)?;
        log.record(HealEvent::new(original, selector.clone(), score));

        Ok(ResolvedHandle {
            original: original.to_string(),
            selector,
            phase,
            score: Some(score),
        })
    }
}
