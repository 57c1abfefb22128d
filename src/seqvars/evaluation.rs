//! Evidence-annotated variants as produced by the filter pipeline.

use std::collections::BTreeMap;

use super::{
    annotation::Annotation,
    data::{frequency::FrequencyData, pathogenicity::PathogenicityData},
    ds::{CallRecord, Genotype, SequenceVariant, VariantEffect},
    filter::{FilterResult, FilterStatus, FilterType},
};

/// One annotated variant together with its evidence and filter history.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VariantEvaluation {
    /// The variant.
    #[serde(flatten)]
    variant: SequenceVariant,
    /// Call quality.
    quality: f64,
    /// Genotype call per sample.
    genotypes: BTreeMap<String, Genotype>,
    /// Gene symbol, `None` if no annotation is available.
    gene_symbol: Option<String>,
    /// Variant effect class.
    effect: VariantEffect,
    /// Result of each executed filter stage, in execution order.
    filter_results: Vec<FilterResult>,
    /// Pathogenicity predictions.
    pathogenicity_data: PathogenicityData,
    /// Population frequencies.
    frequency_data: FrequencyData,
    /// Variant-level score, set after all stages have run.
    filter_score: f64,
}

impl VariantEvaluation {
    /// Create from a raw call and its annotation, if any.
    pub fn new(record: CallRecord, annotation: Option<Annotation>) -> Self {
        let (gene_symbol, effect) = match annotation {
            Some(Annotation {
                gene_symbol,
                effect,
            }) => (Some(gene_symbol), effect),
            None => (None, VariantEffect::Unknown),
        };
        Self {
            variant: record.variant,
            quality: record.quality,
            genotypes: record.genotypes,
            gene_symbol,
            effect,
            filter_results: Vec::new(),
            pathogenicity_data: PathogenicityData::default(),
            frequency_data: FrequencyData::default(),
            filter_score: 0.0,
        }
    }

    /// The variant.
    pub fn variant(&self) -> &SequenceVariant {
        &self.variant
    }

    /// Call quality.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Genotype calls per sample.
    pub fn genotypes(&self) -> &BTreeMap<String, Genotype> {
        &self.genotypes
    }

    /// Genotype of `sample`; samples without call are treated as no-call.
    pub fn genotype(&self, sample: &str) -> Genotype {
        self.genotypes.get(sample).copied().unwrap_or_default()
    }

    /// Gene symbol, if annotated.
    pub fn gene_symbol(&self) -> Option<&str> {
        self.gene_symbol.as_deref()
    }

    /// Variant effect class.
    pub fn effect(&self) -> VariantEffect {
        self.effect
    }

    /// Executed filter results, in execution order.
    pub fn filter_results(&self) -> &[FilterResult] {
        &self.filter_results
    }

    /// Result of the given stage, if it was executed.
    pub fn filter_result(&self, filter_type: FilterType) -> Option<&FilterResult> {
        self.filter_results
            .iter()
            .find(|r| r.filter_type == filter_type)
    }

    /// Whether every executed stage passed.
    pub fn passed_filters(&self) -> bool {
        self.filter_results
            .iter()
            .all(|r| r.status == FilterStatus::Pass)
    }

    /// Pathogenicity predictions.
    pub fn pathogenicity_data(&self) -> &PathogenicityData {
        &self.pathogenicity_data
    }

    /// Population frequencies.
    pub fn frequency_data(&self) -> &FrequencyData {
        &self.frequency_data
    }

    /// Variant-level score.
    pub fn filter_score(&self) -> f64 {
        self.filter_score
    }

    /// Pathogenicity folded from predictions, falling back to the effect class
    /// default when there is no prediction.
    pub fn fused_pathogenicity(&self) -> f64 {
        if self.pathogenicity_data.is_empty() {
            self.effect.default_pathogenicity()
        } else {
            self.pathogenicity_data.score()
        }
    }

    pub(crate) fn set_pathogenicity_data(&mut self, data: PathogenicityData) {
        self.pathogenicity_data = data;
    }

    pub(crate) fn set_frequency_data(&mut self, data: FrequencyData) {
        self.frequency_data = data;
    }

    pub(crate) fn add_filter_result(&mut self, result: FilterResult) {
        self.filter_results.push(result);
    }

    /// Derive `filter_score` from the recorded stage results.
    ///
    /// The pathogenicity stage score takes precedence over the frequency stage
    /// score; without either, the fused pathogenicity of the evidence is used.
    pub(crate) fn update_filter_score(&mut self) {
        let pathogenicity = self.filter_result(FilterType::Pathogenicity);
        let frequency = self.filter_result(FilterType::Frequency);
        self.filter_score = match (pathogenicity, frequency) {
            (Some(result), _) => result.score,
            (None, Some(result)) => result.score,
            (None, None) => self.fused_pathogenicity(),
        };
    }

    #[cfg(test)]
    pub(crate) fn set_filter_score(&mut self, score: f64) {
        self.filter_score = score;
    }
}
