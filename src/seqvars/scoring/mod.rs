//! Gene-level aggregation of variant and priority evidence.

pub mod combined;
pub mod rank;

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use super::{
    evaluation::VariantEvaluation,
    inheritance::{Compatibility, ModeOfInheritance},
    prioritisation::{PriorityResult, PriorityType},
};

/// A candidate gene with its variants and scores.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Gene {
    /// Gene symbol.
    symbol: String,
    /// Variants in the gene, in input order.
    variant_evaluations: Vec<VariantEvaluation>,
    /// Compatibility of the passing variants with the modes of inheritance.
    compatibility: Compatibility,
    /// Priority score per method.
    priority_results: BTreeMap<PriorityType, f64>,
    /// Aggregated filter score of the passing variants.
    filter_score: f64,
    /// Product of the priority scores, possibly rank-rescaled.
    priority_score: f64,
    /// Fused score used for ranking.
    combined_score: f64,
}

impl Gene {
    /// Create a new unscored `Gene`.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Gene symbol.
    /// * `variant_evaluations` - Filtered variants of the gene.
    /// * `compatibility` - Result of the inheritance check on the passing variants,
    ///   in the order of `passing_variants`.
    /// * `priority_results` - Priority scores of the gene; a later result of the
    ///   same method replaces an earlier one.
    pub fn new(
        symbol: String,
        variant_evaluations: Vec<VariantEvaluation>,
        compatibility: Compatibility,
        priority_results: Vec<PriorityResult>,
    ) -> Self {
        Self {
            symbol,
            variant_evaluations,
            compatibility,
            priority_results: priority_results
                .into_iter()
                .map(|result| (result.method, result.score))
                .collect(),
            filter_score: 0.0,
            priority_score: 1.0,
            combined_score: 0.0,
        }
    }

    /// Gene symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All variants of the gene with their filter history.
    pub fn variant_evaluations(&self) -> &[VariantEvaluation] {
        &self.variant_evaluations
    }

    /// Variants that passed all stages.
    pub fn passing_variants(&self) -> impl Iterator<Item = &VariantEvaluation> + '_ {
        self.variant_evaluations
            .iter()
            .filter(|v| v.passed_filters())
    }

    /// Compatibility with the modes of inheritance.
    pub fn compatibility(&self) -> &Compatibility {
        &self.compatibility
    }

    /// Priority score per method.
    pub fn priority_results(&self) -> &BTreeMap<PriorityType, f64> {
        &self.priority_results
    }

    /// Aggregated filter score.
    pub fn filter_score(&self) -> f64 {
        self.filter_score
    }

    /// Priority score.
    pub fn priority_score(&self) -> f64 {
        self.priority_score
    }

    /// Combined score.
    pub fn combined_score(&self) -> f64 {
        self.combined_score
    }
}

/// Scores and ranks genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneScorer {
    /// Mode of inheritance the analysis targets.
    mode_of_inheritance: ModeOfInheritance,
    /// Whether to rescale priority scores by rank.
    rank_based_rescoring: bool,
}

impl GeneScorer {
    /// Create a new `GeneScorer`.
    pub fn new(mode_of_inheritance: ModeOfInheritance, rank_based_rescoring: bool) -> Self {
        Self {
            mode_of_inheritance,
            rank_based_rescoring,
        }
    }

    /// The mode used for aggregating the filter score of `gene`.
    ///
    /// Falls back to `Any` if the gene is not compatible with the target mode.
    pub fn scoring_mode(&self, gene: &Gene) -> ModeOfInheritance {
        if gene
            .compatibility
            .is_compatible_with(self.mode_of_inheritance)
        {
            self.mode_of_inheritance
        } else {
            ModeOfInheritance::Any
        }
    }

    /// Aggregate the variant scores of the passing variants of `gene`.
    ///
    /// Under autosomal recessive inheritance, the scores of homozygous
    /// compatible variants count twice and the result is the mean of the two
    /// best scores.  Otherwise, the result is the best score.
    pub fn filter_score(&self, gene: &Gene) -> f64 {
        let passing = gene.passing_variants().collect::<Vec<_>>();
        if passing.is_empty() {
            return 0.0;
        }

        match self.scoring_mode(gene) {
            ModeOfInheritance::AutosomalRecessive => {
                let mut scores = passing
                    .iter()
                    .enumerate()
                    .flat_map(|(idx, v)| {
                        let times = if gene.compatibility.recessive_homozygous.contains(&idx) {
                            2
                        } else {
                            1
                        };
                        std::iter::repeat(v.filter_score()).take(times)
                    })
                    .collect::<Vec<_>>();
                scores.sort_by(|lhs, rhs| rhs.total_cmp(lhs));
                match scores.as_slice() {
                    [first, second, ..] => (first + second) / 2.0,
                    [single] => *single,
                    [] => 0.0,
                }
            }
            _ => passing
                .iter()
                .map(|v| v.filter_score())
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Prioritisation methods with a result for any of `genes`.
    pub fn methods_run(genes: &[Gene]) -> BTreeSet<PriorityType> {
        genes
            .iter()
            .flat_map(|gene| gene.priority_results.keys().copied())
            .collect()
    }

    /// Product of the scores of `gene` over the `methods` run.
    ///
    /// A method without result for the gene contributes `0.0`.  The product is
    /// `1.0` if no method was run.
    pub fn priority_score(gene: &Gene, methods: &BTreeSet<PriorityType>) -> f64 {
        methods
            .iter()
            .map(|method| gene.priority_results.get(method).copied().unwrap_or(0.0))
            .product()
    }

    /// Compute all scores and return the genes ranked by combined score.
    ///
    /// The combined score formula is selected once from the methods run and
    /// applied to every gene.  Ties are ordered by gene symbol.
    pub fn score(&self, mut genes: Vec<Gene>) -> Vec<Gene> {
        let methods = Self::methods_run(&genes);
        let formula = combined::formula_method(methods.iter().copied());
        tracing::debug!(
            "scoring {} genes (mode={}, rank_based_rescoring={}, methods={:?}, formula={:?})",
            genes.len(),
            self.mode_of_inheritance,
            self.rank_based_rescoring,
            &methods,
            formula
        );
        genes.par_iter_mut().for_each(|gene| {
            gene.filter_score = self.filter_score(gene);
            gene.priority_score = Self::priority_score(gene, &methods);
        });

        if self.rank_based_rescoring {
            let scores = genes.iter().map(|g| g.priority_score).collect::<Vec<_>>();
            for (gene, score) in genes.iter_mut().zip(rank::rescale(&scores)) {
                gene.priority_score = score;
            }
        }

        genes.par_iter_mut().for_each(|gene| {
            gene.combined_score =
                combined::combined_score(formula, gene.priority_score, gene.filter_score);
            tracing::trace!(
                "{}: filter={} priority={} combined={}",
                gene.symbol,
                gene.filter_score,
                gene.priority_score,
                gene.combined_score
            );
        });

        genes.sort_by(|lhs, rhs| {
            rhs.combined_score
                .total_cmp(&lhs.combined_score)
                .then_with(|| lhs.symbol.cmp(&rhs.symbol))
        });
        genes
    }
}
