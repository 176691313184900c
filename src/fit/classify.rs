//! Name-based growth family classification.
//!
//! Benchmark series are named after the algorithm that produced them
//! (`Bubble`, `Quick`, `Insertion Almost Sorted`, ...). The family is decided
//! once, at load time, from substrings of that name.

use tracing::debug;

use crate::domain::{FitConfig, GrowthFamily};

/// Keyword sets used to tag and filter series by name.
#[derive(Debug, Clone)]
pub struct Classifier {
    log_keywords: Vec<String>,
    exclude_markers: Vec<String>,
}

impl Classifier {
    pub fn new(log_keywords: Vec<String>, exclude_markers: Vec<String>) -> Self {
        // Empty keywords would match every name.
        let clean = |v: Vec<String>| v.into_iter().filter(|k| !k.is_empty()).collect();
        Self {
            log_keywords: clean(log_keywords),
            exclude_markers: clean(exclude_markers),
        }
    }

    pub fn from_config(config: &FitConfig) -> Self {
        Self::new(config.log_keywords.clone(), config.exclude_markers.clone())
    }

    /// `LogLinear` if the name contains any log keyword, else `Quadratic`.
    pub fn classify(&self, name: &str) -> GrowthFamily {
        let family = if self.log_keywords.iter().any(|k| name.contains(k.as_str())) {
            GrowthFamily::LogLinear
        } else {
            GrowthFamily::Quadratic
        };
        debug!(series = name, family = family.display_name(), "classified series");
        family
    }

    /// Whether the series should be skipped entirely.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_markers.iter().any(|m| name.contains(m.as_str()))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&FitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_names_are_log_linear() {
        let c = Classifier::default();
        for name in ["Quick", "Better Quick", "Std", "QuickSort2", "Std Almost Sorted"] {
            assert_eq!(c.classify(name), GrowthFamily::LogLinear, "{name}");
        }
    }

    #[test]
    fn other_names_are_quadratic() {
        let c = Classifier::default();
        for name in ["Bubble", "Selection", "Insertion", "quick", "std", "Merge"] {
            assert_eq!(c.classify(name), GrowthFamily::Quadratic, "{name}");
        }
    }

    #[test]
    fn exclusion_marker_matches_substring() {
        let c = Classifier::default();
        assert!(c.is_excluded("Bubble Almost Sorted"));
        assert!(!c.is_excluded("Bubble"));
    }

    #[test]
    fn empty_keywords_are_ignored() {
        let c = Classifier::new(vec![String::new()], vec![String::new()]);
        assert_eq!(c.classify("Quick"), GrowthFamily::Quadratic);
        assert!(!c.is_excluded("Quick"));
    }
}
