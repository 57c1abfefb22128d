//! Running the configured filter stages over all variants.

use rayon::prelude::*;

use super::Filter;
use crate::seqvars::{
    analysis::ErroredVariant,
    config::{Config, RetryConfig, RunMode},
    data::EvidenceLookup,
    error::{ConfigError, LookupError},
    evaluation::VariantEvaluation,
};

/// Runs the ordered filter stages on variants.
#[derive(Debug, Clone)]
pub struct FilterRunner {
    /// Whether to stop at the first failing stage.
    run_mode: RunMode,
    /// The stages in execution order.
    filters: Vec<Filter>,
    /// Retry behaviour for evidence lookups.
    retry: RetryConfig,
}

impl FilterRunner {
    /// Create a new `FilterRunner` from already validated stages.
    pub fn new(run_mode: RunMode, filters: Vec<Filter>, retry: RetryConfig) -> Self {
        Self {
            run_mode,
            filters,
            retry,
        }
    }

    /// Create from `config`, validating all stages.
    ///
    /// # Errors
    ///
    /// If any stage configuration is invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.run_mode,
            config.build_filters()?,
            config.retry.clone(),
        ))
    }

    /// The run mode.
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    /// The configured stages in execution order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Call `f` until it succeeds, fails permanently or the retries are exhausted.
    fn with_retry<T, F>(
        &self,
        what: &str,
        evaluation: &VariantEvaluation,
        f: F,
    ) -> Result<T, LookupError>
    where
        F: Fn() -> Result<T, LookupError>,
    {
        let mut attempt = 0;
        loop {
            match f() {
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::debug!(
                        "{} lookup for {} failed ({}), retrying in {:?} ({}/{})",
                        what,
                        evaluation.variant(),
                        e,
                        delay,
                        attempt,
                        self.retry.max_retries
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
                result => return result,
            }
        }
    }

    /// Attach evidence to `evaluation` and run the stages on it.
    ///
    /// # Errors
    ///
    /// If an evidence lookup fails permanently or keeps failing transiently.
    pub fn evaluate(
        &self,
        mut evaluation: VariantEvaluation,
        lookup: &dyn EvidenceLookup,
    ) -> Result<VariantEvaluation, LookupError> {
        let frequencies = self.with_retry("frequency", &evaluation, || {
            lookup.frequencies_for(evaluation.variant())
        })?;
        let pathogenicity = self.with_retry("pathogenicity", &evaluation, || {
            lookup.pathogenicity_for(evaluation.variant())
        })?;
        evaluation.set_frequency_data(frequencies);
        evaluation.set_pathogenicity_data(pathogenicity);

        for filter in &self.filters {
            let result = filter.run(&evaluation);
            evaluation.add_filter_result(result);
            if !result.passed() && self.run_mode == RunMode::PassOnly {
                tracing::trace!(
                    "{} failed {}, skipping remaining stages",
                    evaluation.variant(),
                    result.filter_type
                );
                break;
            }
        }
        evaluation.update_filter_score();

        Ok(evaluation)
    }

    /// Run the stages on all `evaluations` in parallel, keeping the input order.
    ///
    /// Variants whose evidence cannot be looked up are returned as errored.
    pub fn run(
        &self,
        evaluations: Vec<VariantEvaluation>,
        lookup: &dyn EvidenceLookup,
    ) -> Vec<Result<VariantEvaluation, ErroredVariant>> {
        tracing::debug!(
            "running {} filter stages on {} variants ({:?})",
            self.filters.len(),
            evaluations.len(),
            self.run_mode
        );
        evaluations
            .into_par_iter()
            .map(|evaluation| {
                let variant = evaluation.variant().clone();
                self.evaluate(evaluation, lookup).map_err(|e| {
                    tracing::warn!("evidence lookup for {} failed: {}", &variant, e);
                    ErroredVariant::new(variant, e.to_string())
                })
            })
            .collect()
    }
}
