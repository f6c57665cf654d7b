use crate::locator::descriptor::normalize_key;
use serde::{Deserialize, Serialize};

/// String-similarity strategy behind the candidate scorer.
///
/// Inputs are already normalized (word characters only, lowercase);
/// the result is on a 0.0..=100.0 scale.
pub trait SimilarityMetric: Send + Sync {
    fn similarity(&self, target: &str, candidate: &str) -> f64;

    fn name(&self) -> &'static str;
}

/// Best alignment of the shorter key against any window of the longer one.
///
/// Windows slide fully across the longer key and also in and out at its
/// edges, so a prefix or suffix overlap still scores. Each window is compared
/// with an insert/delete ratio: `2 * lcs / (len_a + len_b)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartialRatio;

impl SimilarityMetric for PartialRatio {
    fn similarity(&self, target: &str, candidate: &str) -> f64 {
        let a: Vec<char> = target.chars().collect();
        let b: Vec<char> = candidate.chars().collect();
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let (needle, hay) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        let (n, m) = (needle.len(), hay.len());
        let mut best = 0.0f64;

        for end in 1..n {
            best = best.max(indel_ratio(&needle, &hay[..end]));
        }
        for start in 0..=(m - n) {
            best = best.max(indel_ratio(&needle, &hay[start..start + n]));
            if best >= 100.0 {
                return 100.0;
            }
        }
        for start in (m - n + 1)..m {
            best = best.max(indel_ratio(&needle, &hay[start..]));
        }

        best
    }

    fn name(&self) -> &'static str {
        "partial_ratio"
    }
}

/// Whole-string normalized Levenshtein similarity
#[derive(Debug, Default, Clone, Copy)]
pub struct LevenshteinRatio;

impl SimilarityMetric for LevenshteinRatio {
    fn similarity(&self, target: &str, candidate: &str) -> f64 {
        if target.is_empty() || candidate.is_empty() {
            return 0.0;
        }
        strsim::normalized_levenshtein(target, candidate) * 100.0
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Selectable similarity metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MetricKind {
    #[default]
    PartialRatio,
    Levenshtein,
}

impl MetricKind {
    pub fn build(self) -> Box<dyn SimilarityMetric> {
        match self {
            MetricKind::PartialRatio => Box::new(PartialRatio),
            MetricKind::Levenshtein => Box::new(LevenshteinRatio),
        }
    }
}

/// Scores candidate keys against a target key on an integer scale
pub struct CandidateScorer {
    metric: Box<dyn SimilarityMetric>,
    registry_boost: u32,
}

impl CandidateScorer {
    pub fn new(metric: Box<dyn SimilarityMetric>, registry_boost: u32) -> Self {
        Self {
            metric,
            registry_boost,
        }
    }

    pub fn metric_name(&self) -> &'static str {
        self.metric.name()
    }

    /// Similarity of two raw keys, 0..=100. Keys are normalized first; an empty
    /// key on either side scores 0.
    pub fn score(&self, target_key: &str, candidate_key: &str) -> u32 {
        let target = normalize_key(target_key).to_lowercase();
        let candidate = normalize_key(candidate_key).to_lowercase();
        if target.is_empty() || candidate.is_empty() {
            return 0;
        }

        self.metric
            .similarity(&target, &candidate)
            .round()
            .clamp(0.0, 100.0) as u32
    }

    /// [`score`](Self::score) plus the registry boost when the registry's
    /// recorded classification equals the candidate's own. May exceed 100.
    pub fn score_with_registry(
        &self,
        target_key: &str,
        candidate_key: &str,
        candidate_class: &str,
        known_class: Option<&str>,
    ) -> u32 {
        let base = self.score(target_key, candidate_key);
        if known_class == Some(candidate_class) {
            base + self.registry_boost
        } else {
            base
        }
    }
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::new(Box::new(PartialRatio), 10)
    }
}
