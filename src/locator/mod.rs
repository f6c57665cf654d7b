//! Selector healing module
//!
//! Everything needed to turn a broken selector into a working one:
//! - SelectorDescriptor: id / name / opaque view of the original selector
//! - classify: control classification used by the registry boost
//! - CandidateScorer: pluggable similarity metric plus boost
//! - Registry: offline route → known controls map
//! - MappingCache: persisted original → healed selector document
//! - HealLog: run-scoped record of heals
//! - Resolver: the tiered resolution state machine

pub mod cache;
pub mod classifier;
pub mod config;
pub mod descriptor;
pub mod events;
pub mod registry;
pub mod resolver;
pub mod scorer;

pub use cache::{DEFAULT_CACHE_PATH, MappingCache};
pub use classifier::classify;
pub use config::HealConfig;
pub use descriptor::{DescriptorKind, SelectorDescriptor, normalize_key};
pub use events::{HealEvent, HealLog};
pub use registry::{DEFAULT_REGISTRY_PATH, Registry, RegistryEntry};
pub use resolver::{FUZZY_TAGS, ResolutionPhase, ResolvedHandle, Resolver};
pub use scorer::{CandidateScorer, LevenshteinRatio, MetricKind, PartialRatio, SimilarityMetric};
