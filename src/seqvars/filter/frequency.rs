//! Stage on the population frequency of a variant.

use super::{FilterResult, FilterType};
use crate::seqvars::{error::ConfigError, evaluation::VariantEvaluation};

/// Passes rare variants.
///
/// In threshold mode, a variant passes if its maximal population frequency is
/// below `max_frequency` (percent).  In strict mode, a variant passes only if it
/// is not represented in any reference database, not even by an identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyFilter {
    /// Frequency ceiling in percent.
    max_frequency: f64,
    /// Whether to require absence from all reference databases.
    strict: bool,
}

impl FrequencyFilter {
    /// Create a new `FrequencyFilter`.
    ///
    /// # Errors
    ///
    /// If `max_frequency` is not within `[0, 100]`.
    pub fn new(max_frequency: f64, strict: bool) -> Result<Self, ConfigError> {
        if !(0.0..=100.0).contains(&max_frequency) {
            return Err(ConfigError::FrequencyOutOfRange(max_frequency));
        }
        Ok(Self {
            max_frequency,
            strict,
        })
    }

    /// Evaluate the stage; the score is the rarity score of the frequency data.
    pub fn evaluate(&self, evaluation: &VariantEvaluation) -> FilterResult {
        let data = evaluation.frequency_data();
        let passed = if self.strict {
            !data.is_represented_in_database()
        } else {
            data.max_frequency() < self.max_frequency
        };
        tracing::trace!(
            "frequency filter on {}: max_frequency={} passed={}",
            evaluation.variant(),
            data.max_frequency(),
            passed
        );
        FilterResult::with_outcome(FilterType::Frequency, passed, data.score())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::seqvars::{
        data::frequency::{Frequency, FrequencyData, FrequencySource},
        ds::CallRecord,
    };

    fn evaluation(rs_id: Option<&str>, frequencies: Vec<Frequency>) -> VariantEvaluation {
        let mut evaluation = VariantEvaluation::new(CallRecord::default(), None);
        evaluation.set_frequency_data(FrequencyData::new(rs_id.map(String::from), frequencies));
        evaluation
    }

    #[rstest::rstest]
    #[case(vec![], true)]
    #[case(vec![Frequency::new(FrequencySource::GnomadENfe, 0.5)], true)]
    #[case(vec![Frequency::new(FrequencySource::GnomadENfe, 1.0)], false)]
    #[case(vec![
        Frequency::new(FrequencySource::GnomadENfe, 0.01),
        Frequency::new(FrequencySource::EspAa, 3.0),
    ], false)]
    fn threshold_mode(
        #[case] frequencies: Vec<Frequency>,
        #[case] passes: bool,
    ) -> Result<(), anyhow::Error> {
        let filter = FrequencyFilter::new(1.0, false)?;
        let evaluation = evaluation(None, frequencies);

        let result = filter.evaluate(&evaluation);
        assert_eq!(result.passed(), passes);
        assert_eq!(result.score, evaluation.frequency_data().score());

        Ok(())
    }

    #[rstest::rstest]
    #[case(None, vec![], true)]
    #[case(Some("rs1"), vec![], false)]
    #[case(None, vec![Frequency::new(FrequencySource::Topmed, 0.0001)], false)]
    fn strict_mode(
        #[case] rs_id: Option<&str>,
        #[case] frequencies: Vec<Frequency>,
        #[case] passes: bool,
    ) -> Result<(), anyhow::Error> {
        let filter = FrequencyFilter::new(1.0, true)?;
        assert_eq!(filter.evaluate(&evaluation(rs_id, frequencies)).passed(), passes);

        Ok(())
    }

    #[test]
    fn pass_scores_rarity() -> Result<(), anyhow::Error> {
        let filter = FrequencyFilter::new(2.0, false)?;
        let result = filter.evaluate(&evaluation(
            None,
            vec![Frequency::new(FrequencySource::Uk10k, 0.1)],
        ));
        assert!(result.passed());
        assert!((result.score - 0.8504372).abs() < 1e-6);

        Ok(())
    }
}
