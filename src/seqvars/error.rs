//! Error types at the seams of the ranking engine.

/// Invalid filter or analysis configuration, detected before any variant is processed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The minimal call quality must not be negative.
    #[error("quality threshold must not be negative, got {0}")]
    NegativeQuality(f64),
    /// The maximal frequency must be a percentage.
    #[error("maximal frequency must be in [0, 100] percent, got {0}")]
    FrequencyOutOfRange(f64),
    /// The minimal pathogenicity must be within `[0, 1]`.
    #[error("minimal pathogenicity score must be in [0, 1], got {0}")]
    PathogenicityOutOfRange(f64),
    /// The interval stage needs at least one interval.
    #[error("interval filter requires at least one interval")]
    NoIntervals,
    /// An interval could not be parsed.
    #[error("invalid interval {0:?}: {1}")]
    InvalidInterval(String, String),
    /// The same stage type was configured twice.
    #[error("filter stage {0} configured more than once")]
    DuplicateStage(String),
}

/// Failure of the external annotation service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// No transcript overlaps the variant position.
    #[error("no annotation available for {0}")]
    Unavailable(String),
    /// The annotation service failed.
    #[error("annotation of {0} failed: {1}")]
    Failed(String, String),
}

/// Failure of an evidence lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Transient failure, the lookup may be repeated.
    #[error("transient lookup failure: {0}")]
    Transient(String),
    /// Permanent failure.
    #[error("lookup failed: {0}")]
    Failed(String),
}

impl LookupError {
    /// Whether repeating the lookup may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Transient(_))
    }
}

/// Structural problem with the pedigree; fatal for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PedigreeError {
    /// The pedigree has no members.
    #[error("pedigree is empty")]
    Empty,
    /// An individual is listed twice.
    #[error("duplicate individual {0:?} in pedigree")]
    DuplicateIndividual(String),
    /// A parent is referenced that is not a member of the pedigree.
    #[error("parent {1:?} of {0:?} is not in the pedigree")]
    UnknownParent(String, String),
    /// An individual is listed as its own parent.
    #[error("individual {0:?} is its own parent")]
    SelfParent(String),
    /// A father is not male or a mother is not female.
    #[error("parent {1:?} of {0:?} has inconsistent sex")]
    ParentSexMismatch(String, String),
    /// Nobody in the pedigree is affected.
    #[error("pedigree has no affected individual")]
    NoAffected,
    /// Genotype calls exist for a sample that is not in the pedigree.
    #[error("sample {0:?} has genotype calls but is not in the pedigree")]
    UnknownSample(String),
    /// The inheritance service failed.
    #[error("inheritance check failed: {0}")]
    CheckFailed(String),
}
