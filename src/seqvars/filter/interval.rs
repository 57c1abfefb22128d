//! Stage restricting variants to genomic intervals.

use super::{FilterResult, FilterType};
use crate::seqvars::{
    data::intervals::{contains_position, parse_region, Interval},
    error::ConfigError,
    evaluation::VariantEvaluation,
};

/// Passes variants whose position lies within one of the configured intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalFilter {
    /// The intervals, 0-based half-open.
    intervals: Vec<Interval>,
}

impl IntervalFilter {
    /// Create from `CHROM:START-END` region strings (1-based, inclusive).
    ///
    /// # Errors
    ///
    /// If no region is given or a region cannot be parsed.
    pub fn new<I, S>(regions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let intervals = regions
            .into_iter()
            .map(|region| {
                parse_region(region.as_ref()).map_err(|e| {
                    ConfigError::InvalidInterval(region.as_ref().to_string(), e.to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if intervals.is_empty() {
            return Err(ConfigError::NoIntervals);
        }
        Ok(Self { intervals })
    }

    /// Evaluate the stage; the score is `1.0` on pass and `0.0` on fail.
    pub fn evaluate(&self, evaluation: &VariantEvaluation) -> FilterResult {
        let variant = evaluation.variant();
        let passed = self
            .intervals
            .iter()
            .any(|interval| contains_position(interval, &variant.chrom, variant.pos));
        FilterResult::with_outcome(FilterType::Interval, passed, if passed { 1.0 } else { 0.0 })
    }
}
