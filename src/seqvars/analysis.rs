//! End-to-end analysis from raw calls to the ranked gene list.

use std::collections::BTreeMap;

use rayon::prelude::*;

use super::{
    annotation::Annotator,
    config::{Config, RunMode},
    data::EvidenceLookup,
    ds::{CallRecord, SequenceVariant},
    error::{AnnotationError, ConfigError, PedigreeError},
    evaluation::VariantEvaluation,
    filter::engine::FilterRunner,
    inheritance::InheritanceAdapter,
    prioritisation::PriorityService,
    scoring::{Gene, GeneScorer},
};

/// A variant excluded because an external service failed on it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ErroredVariant {
    /// The variant.
    #[serde(flatten)]
    pub variant: SequenceVariant,
    /// Description of the failure.
    pub error: String,
}

impl ErroredVariant {
    /// Construct a new `ErroredVariant`.
    pub fn new(variant: SequenceVariant, error: String) -> Self {
        Self { variant, error }
    }
}

/// Result of one analysis.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AnalysisResults {
    /// Genes ranked by descending combined score.
    pub genes: Vec<Gene>,
    /// Filtered variants not part of a ranked gene: variants without gene
    /// annotation, variants of genes without any passing variant and, when
    /// running in pass-only mode, all failing variants.
    pub unassigned: Vec<VariantEvaluation>,
    /// Variants excluded because of annotation or lookup failures.
    pub errored: Vec<ErroredVariant>,
}

/// One configured analysis run over a set of calls.
pub struct Analysis<'a> {
    /// The filter pipeline.
    runner: FilterRunner,
    /// The gene scorer.
    scorer: GeneScorer,
    /// Annotation service.
    annotator: &'a dyn Annotator,
    /// Frequency and pathogenicity lookup.
    lookup: &'a dyn EvidenceLookup,
    /// Phenotype-based gene prioritisation.
    priorities: &'a dyn PriorityService,
    /// Pedigree-based inheritance check.
    inheritance: &'a InheritanceAdapter,
}

impl<'a> Analysis<'a> {
    /// Create a new `Analysis`, validating the configuration.
    ///
    /// # Errors
    ///
    /// If the filter configuration is invalid.
    pub fn new(
        config: &Config,
        annotator: &'a dyn Annotator,
        lookup: &'a dyn EvidenceLookup,
        priorities: &'a dyn PriorityService,
        inheritance: &'a InheritanceAdapter,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            runner: FilterRunner::from_config(config)?,
            scorer: GeneScorer::new(config.mode_of_inheritance, config.rank_based_rescoring),
            annotator,
            lookup,
            priorities,
            inheritance,
        })
    }

    /// Annotate `record`; variants without annotation are kept without gene.
    fn annotate(&self, record: CallRecord) -> Result<VariantEvaluation, ErroredVariant> {
        match self.annotator.annotate(&record.variant) {
            Ok(annotation) => Ok(VariantEvaluation::new(record, Some(annotation))),
            Err(AnnotationError::Unavailable(_)) => {
                tracing::trace!("no annotation for {}", &record.variant);
                Ok(VariantEvaluation::new(record, None))
            }
            Err(e) => {
                tracing::warn!("{}", &e);
                Err(ErroredVariant::new(record.variant, e.to_string()))
            }
        }
    }

    /// Run the analysis on `records`.
    ///
    /// # Errors
    ///
    /// If a sample is missing from the pedigree or the inheritance check fails.
    pub fn run(&self, records: Vec<CallRecord>) -> Result<AnalysisResults, PedigreeError> {
        tracing::info!("analysing {} variants", records.len());
        let mut errored = Vec::new();

        let annotated = records
            .into_par_iter()
            .map(|record| self.annotate(record))
            .collect::<Vec<_>>();
        let mut evaluations = Vec::with_capacity(annotated.len());
        for result in annotated {
            match result {
                Ok(evaluation) => evaluations.push(evaluation),
                Err(variant) => errored.push(variant),
            }
        }
        self.inheritance.check_samples(&evaluations)?;

        let mut by_gene = BTreeMap::<String, Vec<VariantEvaluation>>::new();
        let mut unassigned = Vec::new();
        for result in self.runner.run(evaluations, self.lookup) {
            let evaluation = match result {
                Ok(evaluation) => evaluation,
                Err(variant) => {
                    errored.push(variant);
                    continue;
                }
            };
            let keep = evaluation.passed_filters() || self.runner.run_mode() == RunMode::Full;
            match evaluation.gene_symbol().map(str::to_string) {
                Some(symbol) if keep => by_gene.entry(symbol).or_default().push(evaluation),
                _ => unassigned.push(evaluation),
            }
        }
        let (by_gene, without_passing): (Vec<_>, Vec<_>) = by_gene
            .into_iter()
            .partition(|(_, variants)| variants.iter().any(|v| v.passed_filters()));
        unassigned.extend(
            without_passing
                .into_iter()
                .flat_map(|(_, variants)| variants),
        );
        tracing::info!(
            "{} genes, {} unassigned and {} errored variants after filtering",
            by_gene.len(),
            unassigned.len(),
            errored.len()
        );

        let genes = by_gene
            .into_par_iter()
            .map(|(symbol, variants)| {
                let passing = variants
                    .iter()
                    .filter(|v| v.passed_filters())
                    .collect::<Vec<_>>();
                let compatibility = self.inheritance.compatible_modes(&passing)?;
                let priority_results = self.priorities.score_for(&symbol);
                Ok::<_, PedigreeError>(Gene::new(
                    symbol,
                    variants,
                    compatibility,
                    priority_results,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AnalysisResults {
            genes: self.scorer.score(genes),
            unassigned,
            errored,
        })
    }
}
