//! Interface to the external phenotype-based gene prioritisation.

/// Method that produced a priority score.
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
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PriorityType {
    /// Phenotype similarity across human, mouse and fish models.
    CrossSpeciesPhenotype,
    /// Random walk over a protein interaction network.
    NetworkDiffusion,
    /// Phenotype similarity to human diseases only.
    HumanPhenotype,
    /// Any other gene-level prior, e.g. known disease association.
    DiseaseAssociation,
}

/// Score of one gene by one prioritisation method.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PriorityResult {
    /// The method.
    pub method: PriorityType,
    /// Score in `[0, 1]`.
    pub score: f64,
}

impl PriorityResult {
    /// Construct a new `PriorityResult`.
    pub fn new(method: PriorityType, score: f64) -> Self {
        Self { method, score }
    }
}

/// Gene prioritisation by phenotype similarity.
pub trait PriorityService: Send + Sync {
    /// All priority scores available for the gene with `gene_symbol`.
    ///
    /// Genes not scored by any method yield an empty list.
    fn score_for(&self, gene_symbol: &str) -> Vec<PriorityResult>;
}
