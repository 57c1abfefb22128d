//! Reference data for sequence variants.

pub mod frequency;
pub mod intervals;
pub mod io;
pub mod pathogenicity;

use self::{frequency::FrequencyData, pathogenicity::PathogenicityData};
use super::{ds::SequenceVariant, error::LookupError};

/// Lookup of frequency and pathogenicity evidence for a variant.
///
/// Absent evidence is returned as an empty container, never as an error.
pub trait EvidenceLookup: Send + Sync {
    /// Population frequencies of `variant`.
    ///
    /// # Errors
    ///
    /// `LookupError::Transient` if the lookup may be repeated, `LookupError::Failed` otherwise.
    fn frequencies_for(&self, variant: &SequenceVariant) -> Result<FrequencyData, LookupError>;

    /// Pathogenicity predictions for `variant`.
    ///
    /// # Errors
    ///
    /// `LookupError::Transient` if the lookup may be repeated, `LookupError::Failed` otherwise.
    fn pathogenicity_for(
        &self,
        variant: &SequenceVariant,
    ) -> Result<PathogenicityData, LookupError>;
}
