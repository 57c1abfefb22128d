//! Interface to the external annotation service.

use super::{
    ds::{SequenceVariant, VariantEffect},
    error::AnnotationError,
};

/// Gene-level annotation of one variant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Annotation {
    /// Gene symbol of the affected gene.
    pub gene_symbol: String,
    /// Most severe effect class.
    pub effect: VariantEffect,
}

/// Annotation of raw variants with gene symbol and effect class.
pub trait Annotator: Send + Sync {
    /// Annotate `variant`.
    ///
    /// # Errors
    ///
    /// `AnnotationError::Unavailable` if no transcript overlaps the variant,
    /// `AnnotationError::Failed` if the service could not be queried.
    fn annotate(&self, variant: &SequenceVariant) -> Result<Annotation, AnnotationError>;
}
