//! Stage on the predicted pathogenicity of a variant.

use super::{FilterResult, FilterType};
use crate::seqvars::{error::ConfigError, evaluation::VariantEvaluation};

/// Passes variants predicted to be pathogenic.
///
/// The score is the fused pathogenicity: the most pathogenic prediction if any
/// is available, otherwise the default of the variant's effect class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathogenicityFilter {
    /// Pass all variants and only record the score.
    include_pathogenic: bool,
    /// The fused score must exceed this value to pass.
    min_score: f64,
}

impl PathogenicityFilter {
    /// Create a new `PathogenicityFilter`.
    ///
    /// # Errors
    ///
    /// If `min_score` is not within `[0, 1]`.
    pub fn new(include_pathogenic: bool, min_score: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&min_score) {
            return Err(ConfigError::PathogenicityOutOfRange(min_score));
        }
        Ok(Self {
            include_pathogenic,
            min_score,
        })
    }

    /// Evaluate the stage.
    pub fn evaluate(&self, evaluation: &VariantEvaluation) -> FilterResult {
        let score = evaluation.fused_pathogenicity();
        let passed = self.include_pathogenic || score > self.min_score;
        tracing::trace!(
            "pathogenicity filter on {}: score={} passed={}",
            evaluation.variant(),
            score,
            passed
        );
        FilterResult::with_outcome(FilterType::Pathogenicity, passed, score)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::seqvars::{
        annotation::Annotation,
        data::pathogenicity::{PathogenicityData, PathogenicityScore, PathogenicitySource},
        ds::{CallRecord, VariantEffect},
    };

    fn evaluation(effect: VariantEffect, scores: Vec<PathogenicityScore>) -> VariantEvaluation {
        let mut evaluation = VariantEvaluation::new(
            CallRecord::default(),
            Some(Annotation {
                gene_symbol: "RBM8A".into(),
                effect,
            }),
        );
        evaluation.set_pathogenicity_data(scores.into_iter().collect::<PathogenicityData>());
        evaluation
    }

    #[rstest::rstest]
    #[case(VariantEffect::Missense, vec![], 0.6, true)]
    #[case(VariantEffect::Synonymous, vec![], 0.1, false)]
    #[case(VariantEffect::Intergenic, vec![], 0.0, false)]
    #[case(
        VariantEffect::StopGained,
        vec![PathogenicityScore::new(PathogenicitySource::Polyphen, 0.2)],
        0.2,
        false
    )]
    #[case(
        VariantEffect::Synonymous,
        vec![PathogenicityScore::new(PathogenicitySource::Sift, 0.0)],
        1.0,
        true
    )]
    fn evaluate(
        #[case] effect: VariantEffect,
        #[case] scores: Vec<PathogenicityScore>,
        #[case] expected_score: f64,
        #[case] passes: bool,
    ) -> Result<(), anyhow::Error> {
        let filter = PathogenicityFilter::new(false, 0.5)?;
        let result = filter.evaluate(&evaluation(effect, scores));

        assert_eq!(result.score, expected_score);
        assert_eq!(result.passed(), passes);

        Ok(())
    }

    #[test]
    fn include_pathogenic_passes_all() -> Result<(), anyhow::Error> {
        let filter = PathogenicityFilter::new(true, 0.5)?;
        let result = filter.evaluate(&evaluation(VariantEffect::Intergenic, vec![]));
        assert!(result.passed());
        assert_eq!(result.score, 0.0);

        Ok(())
    }

    #[test]
    fn score_must_exceed_minimum() -> Result<(), anyhow::Error> {
        let filter = PathogenicityFilter::new(false, 0.6)?;
        assert!(!filter
            .evaluate(&evaluation(VariantEffect::Missense, vec![]))
            .passed());

        Ok(())
    }
}
