//! Filter stages and the pipeline running them.
//!
//! The set of stages is closed; each stage kind has its own module with an
//! `evaluate` function and [`Filter::run`] dispatches over them.

pub mod engine;
pub mod frequency;
pub mod interval;
pub mod pathogenicity;
pub mod quality;
pub mod target;

use super::{config::FilterConfig, error::ConfigError, evaluation::VariantEvaluation};

/// Kind of a filter stage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterType {
    /// Keep functional effect classes only.
    Target,
    /// Minimal call quality.
    Quality,
    /// Rarity in reference populations.
    Frequency,
    /// Predicted pathogenicity.
    Pathogenicity,
    /// Genomic intervals.
    Interval,
}

/// Outcome of a filter stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FilterStatus {
    /// The variant passed.
    Pass,
    /// The variant failed.
    Fail,
}

/// Result of running one stage on one variant.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct FilterResult {
    /// The stage.
    pub filter_type: FilterType,
    /// Pass or fail.
    pub status: FilterStatus,
    /// Score computed by the stage.
    pub score: f64,
}

impl FilterResult {
    /// A passing result.
    pub fn pass(filter_type: FilterType, score: f64) -> Self {
        Self {
            filter_type,
            status: FilterStatus::Pass,
            score,
        }
    }

    /// A failing result.
    pub fn fail(filter_type: FilterType, score: f64) -> Self {
        Self {
            filter_type,
            status: FilterStatus::Fail,
            score,
        }
    }

    /// Construct from a boolean outcome.
    pub fn with_outcome(filter_type: FilterType, passed: bool, score: f64) -> Self {
        if passed {
            Self::pass(filter_type, score)
        } else {
            Self::fail(filter_type, score)
        }
    }

    /// Whether the stage passed.
    pub fn passed(&self) -> bool {
        self.status == FilterStatus::Pass
    }
}

/// A configured, validated filter stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// See [`target::TargetFilter`].
    Target(target::TargetFilter),
    /// See [`quality::QualityFilter`].
    Quality(quality::QualityFilter),
    /// See [`frequency::FrequencyFilter`].
    Frequency(frequency::FrequencyFilter),
    /// See [`pathogenicity::PathogenicityFilter`].
    Pathogenicity(pathogenicity::PathogenicityFilter),
    /// See [`interval::IntervalFilter`].
    Interval(interval::IntervalFilter),
}

impl Filter {
    /// Build and validate a stage from its configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is invalid.
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigError> {
        Ok(match config {
            FilterConfig::Target { off_target_effects } => {
                Filter::Target(target::TargetFilter::new(off_target_effects.iter().copied()))
            }
            FilterConfig::Quality { min_quality } => {
                Filter::Quality(quality::QualityFilter::new(*min_quality)?)
            }
            FilterConfig::Frequency {
                max_frequency,
                strict,
            } => Filter::Frequency(frequency::FrequencyFilter::new(*max_frequency, *strict)?),
            FilterConfig::Pathogenicity {
                include_pathogenic,
                min_score,
            } => Filter::Pathogenicity(pathogenicity::PathogenicityFilter::new(
                *include_pathogenic,
                *min_score,
            )?),
            FilterConfig::Interval { intervals } => {
                Filter::Interval(interval::IntervalFilter::new(intervals)?)
            }
        })
    }

    /// The kind of this stage.
    pub fn filter_type(&self) -> FilterType {
        match self {
            Filter::Target(_) => FilterType::Target,
            Filter::Quality(_) => FilterType::Quality,
            Filter::Frequency(_) => FilterType::Frequency,
            Filter::Pathogenicity(_) => FilterType::Pathogenicity,
            Filter::Interval(_) => FilterType::Interval,
        }
    }

    /// Run the stage on `evaluation`, whose evidence must already be attached.
    pub fn run(&self, evaluation: &VariantEvaluation) -> FilterResult {
        match self {
            Filter::Target(filter) => filter.evaluate(evaluation),
            Filter::Quality(filter) => filter.evaluate(evaluation),
            Filter::Frequency(filter) => filter.evaluate(evaluation),
            Filter::Pathogenicity(filter) => filter.evaluate(evaluation),
            Filter::Interval(filter) => filter.evaluate(evaluation),
        }
    }
}
