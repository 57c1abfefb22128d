//! Stage keeping variants with potentially functional effect classes.

use std::collections::BTreeSet;

use super::{FilterResult, FilterType};
use crate::seqvars::{ds::VariantEffect, evaluation::VariantEvaluation};

/// Effect classes removed by default.
pub const DEFAULT_OFF_TARGET_EFFECTS: [VariantEffect; 3] = [
    VariantEffect::Intergenic,
    VariantEffect::Upstream,
    VariantEffect::Downstream,
];

/// Fails variants whose effect class is considered off-target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFilter {
    /// Effect classes that fail the stage.
    off_target_effects: BTreeSet<VariantEffect>,
}

impl Default for TargetFilter {
    fn default() -> Self {
        Self::new(DEFAULT_OFF_TARGET_EFFECTS)
    }
}

impl TargetFilter {
    /// Create a new `TargetFilter` with the given off-target effects.
    pub fn new<I>(off_target_effects: I) -> Self
    where
        I: IntoIterator<Item = VariantEffect>,
    {
        Self {
            off_target_effects: off_target_effects.into_iter().collect(),
        }
    }

    /// Evaluate the stage; the score is `1.0` on pass and `0.0` on fail.
    pub fn evaluate(&self, evaluation: &VariantEvaluation) -> FilterResult {
        let passed = !self.off_target_effects.contains(&evaluation.effect());
        tracing::trace!(
            "target filter on {} with effect {}: {}",
            evaluation.variant(),
            evaluation.effect(),
            passed
        );
        FilterResult::with_outcome(FilterType::Target, passed, if passed { 1.0 } else { 0.0 })
    }
}
