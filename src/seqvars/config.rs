//! Analysis configuration, read from TOML.
//!
//! ```toml
//! run_mode = "pass_only"
//! mode_of_inheritance = "autosomal_recessive"
//! rank_based_rescoring = false
//!
//! [[filters]]
//! type = "quality"
//! min_quality = 20.0
//!
//! [[filters]]
//! type = "frequency"
//! max_frequency = 1.0
//!
//! [retry]
//! max_retries = 3
//! ```

use std::{collections::BTreeSet, path::Path, time::Duration};

use super::{
    ds::VariantEffect,
    error::ConfigError,
    filter::{target::DEFAULT_OFF_TARGET_EFFECTS, Filter},
    inheritance::ModeOfInheritance,
};

/// Whether failing variants are evaluated by the remaining stages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Run all stages on all variants and report failing variants as well.
    Full,
    /// Stop at the first failing stage and keep passing variants only.
    #[default]
    PassOnly,
}

/// Configuration of one filter stage.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Remove variants with off-target effect classes.
    Target {
        /// Effect classes to remove.
        #[serde(default = "default_off_target_effects")]
        off_target_effects: Vec<VariantEffect>,
    },
    /// Remove low-quality calls.
    Quality {
        /// Minimal call quality.
        #[serde(default = "default_min_quality")]
        min_quality: f64,
    },
    /// Remove common variants.
    Frequency {
        /// Maximal population frequency in percent.
        #[serde(default = "default_max_frequency")]
        max_frequency: f64,
        /// Remove all variants known to any reference database.
        #[serde(default)]
        strict: bool,
    },
    /// Remove variants predicted to be benign.
    Pathogenicity {
        /// Keep all variants, only record scores.
        #[serde(default)]
        include_pathogenic: bool,
        /// Minimal fused pathogenicity score.
        #[serde(default = "default_min_pathogenicity")]
        min_score: f64,
    },
    /// Keep variants within the given regions only.
    Interval {
        /// Regions as `CHROM:START-END`.
        intervals: Vec<String>,
    },
}

fn default_off_target_effects() -> Vec<VariantEffect> {
    DEFAULT_OFF_TARGET_EFFECTS.to_vec()
}

fn default_min_quality() -> f64 {
    20.0
}

fn default_max_frequency() -> f64 {
    2.0
}

fn default_min_pathogenicity() -> f64 {
    0.5
}

fn default_filters() -> Vec<FilterConfig> {
    vec![
        FilterConfig::Target {
            off_target_effects: default_off_target_effects(),
        },
        FilterConfig::Frequency {
            max_frequency: default_max_frequency(),
            strict: false,
        },
        FilterConfig::Pathogenicity {
            include_pathogenic: false,
            min_score: default_min_pathogenicity(),
        },
    ]
}

/// Retry behaviour for transient lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct RetryConfig {
    /// Maximal number of retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds, doubled on each further retry.
    #[serde(default)]
    pub base_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: 0,
        }
    }
}

impl RetryConfig {
    /// Delay before the 1-based retry `attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// Configuration of one analysis.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// How the filter pipeline treats failing variants.
    #[serde(default)]
    pub run_mode: RunMode,
    /// Mode of inheritance to score genes under.
    #[serde(default)]
    pub mode_of_inheritance: ModeOfInheritance,
    /// Replace priority scores by their rank-based rescaling.
    #[serde(default)]
    pub rank_based_rescoring: bool,
    /// Ordered filter stages.
    #[serde(default = "default_filters")]
    pub filters: Vec<FilterConfig>,
    /// Retry behaviour of evidence lookups.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_mode: RunMode::default(),
            mode_of_inheritance: ModeOfInheritance::default(),
            rank_based_rescoring: false,
            filters: default_filters(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        tracing::debug!("loading configuration from {:?}", path.as_ref());
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("problem reading {:?}: {}", path.as_ref(), e))?;
        Self::from_toml(&text)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// If the string is not a valid configuration.
    pub fn from_toml(text: &str) -> Result<Self, anyhow::Error> {
        toml::from_str(text).map_err(|e| anyhow::anyhow!("problem parsing configuration: {}", e))
    }

    /// Build the validated filter stages in configured order.
    ///
    /// # Errors
    ///
    /// If any stage configuration is invalid or a stage type occurs twice.
    pub fn build_filters(&self) -> Result<Vec<Filter>, ConfigError> {
        let mut seen = BTreeSet::new();
        self.filters
            .iter()
            .map(|config| {
                let filter = Filter::from_config(config)?;
                if !seen.insert(filter.filter_type()) {
                    return Err(ConfigError::DuplicateStage(filter.filter_type().to_string()));
                }
                Ok(filter)
            })
            .collect()
    }
}
