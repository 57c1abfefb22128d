//! Stage on the variant call quality.

use super::{FilterResult, FilterType};
use crate::seqvars::{error::ConfigError, evaluation::VariantEvaluation};

/// Passes variants with a call quality of at least `min_quality`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityFilter {
    /// Minimal Phred-scaled call quality.
    min_quality: f64,
}

impl QualityFilter {
    /// Create a new `QualityFilter`.
    ///
    /// # Errors
    ///
    /// If `min_quality` is negative or not a number.
    pub fn new(min_quality: f64) -> Result<Self, ConfigError> {
        if min_quality.is_nan() || min_quality < 0.0 {
            return Err(ConfigError::NegativeQuality(min_quality));
        }
        Ok(Self { min_quality })
    }

    /// Evaluate the stage; the score is `1.0` on pass and `0.0` on fail.
    pub fn evaluate(&self, evaluation: &VariantEvaluation) -> FilterResult {
        if evaluation.quality() >= self.min_quality {
            FilterResult::pass(FilterType::Quality, 1.0)
        } else {
            FilterResult::fail(FilterType::Quality, 0.0)
        }
    }
}
