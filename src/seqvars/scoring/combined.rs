//! Fusion of priority and filter score into the combined gene score.
//!
//! The logistic coefficients were fitted per prioritisation method and must be
//! kept as they are.

use crate::seqvars::prioritisation::PriorityType;

/// Methods with a fitted formula, in the order they are checked.
pub const FORMULA_PRECEDENCE: [PriorityType; 3] = [
    PriorityType::CrossSpeciesPhenotype,
    PriorityType::NetworkDiffusion,
    PriorityType::HumanPhenotype,
];

/// The logistic function `1 / (1 + e^-x)`.
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// The first method of `FORMULA_PRECEDENCE` contained in `methods`.
pub fn formula_method<I>(methods: I) -> Option<PriorityType>
where
    I: IntoIterator<Item = PriorityType>,
{
    let methods = methods.into_iter().collect::<Vec<_>>();
    FORMULA_PRECEDENCE
        .into_iter()
        .find(|method| methods.contains(method))
}

/// Combined score of a gene whose priority scores came from `method`.
///
/// # Arguments
///
/// * `method` - Method selecting the formula; `None` selects the mean.
/// * `priority_score` - Priority score of the gene.
/// * `filter_score` - Filter score of the gene.
pub fn combined_score(method: Option<PriorityType>, priority_score: f64, filter_score: f64) -> f64 {
    match method {
        Some(PriorityType::CrossSpeciesPhenotype) => {
            logistic(-13.28813 + 10.39451 * priority_score + 9.18381 * filter_score)
        }
        Some(PriorityType::NetworkDiffusion) => {
            logistic(-8.67972 + 219.40082 * priority_score + 8.54374 * filter_score)
        }
        Some(PriorityType::HumanPhenotype) => {
            logistic(-11.15659 + 13.21835 * priority_score + 4.08667 * filter_score)
        }
        Some(PriorityType::DiseaseAssociation) | None => (priority_score + filter_score) / 2.0,
    }
}
