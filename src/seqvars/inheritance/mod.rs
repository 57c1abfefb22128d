//! Modes of inheritance and the adapter over the pedigree-based compatibility check.

pub mod segregation;

use std::collections::{BTreeMap, BTreeSet};

use super::{error::PedigreeError, evaluation::VariantEvaluation};

/// Mode of inheritance.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Deserialize,
    serde::Serialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModeOfInheritance {
    /// Autosomal dominant.
    AutosomalDominant,
    /// Autosomal recessive.
    AutosomalRecessive,
    /// X-linked recessive.
    XLinkedRecessive,
    /// No particular mode.
    #[default]
    Any,
}

impl ModeOfInheritance {
    /// The concrete modes a checker can report.
    pub const CONCRETE: [ModeOfInheritance; 3] = [
        ModeOfInheritance::AutosomalDominant,
        ModeOfInheritance::AutosomalRecessive,
        ModeOfInheritance::XLinkedRecessive,
    ];
}

/// Sex of an individual.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Unknown.
    #[default]
    Unknown,
}

/// One member of the pedigree.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Individual {
    /// Sample name, as used for the genotype calls.
    pub id: String,
    /// Sample name of the father, if in the pedigree.
    #[serde(default)]
    pub father: Option<String>,
    /// Sample name of the mother, if in the pedigree.
    #[serde(default)]
    pub mother: Option<String>,
    /// Sex.
    #[serde(default)]
    pub sex: Sex,
    /// Whether the individual is affected.
    pub affected: bool,
}

/// The family structure of the analysed individuals.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct Pedigree {
    /// Members of the family.
    pub individuals: Vec<Individual>,
}

impl Pedigree {
    /// Pedigree consisting of a single affected individual.
    pub fn singleton(id: &str, sex: Sex) -> Self {
        Self {
            individuals: vec![Individual {
                id: id.to_string(),
                father: None,
                mother: None,
                sex,
                affected: true,
            }],
        }
    }

    /// Look up an individual by sample name.
    pub fn individual(&self, id: &str) -> Option<&Individual> {
        self.individuals.iter().find(|i| i.id == id)
    }

    /// Affected members.
    pub fn affected(&self) -> impl Iterator<Item = &Individual> + '_ {
        self.individuals.iter().filter(|i| i.affected)
    }

    /// Unaffected members.
    pub fn unaffected(&self) -> impl Iterator<Item = &Individual> + '_ {
        self.individuals.iter().filter(|i| !i.affected)
    }

    /// Check the structure of the pedigree.
    ///
    /// # Errors
    ///
    /// If the pedigree is empty, has duplicate or self-parenting members,
    /// refers to unknown parents, has parents of the wrong sex, or has no
    /// affected member.
    pub fn validate(&self) -> Result<(), PedigreeError> {
        if self.individuals.is_empty() {
            return Err(PedigreeError::Empty);
        }
        let mut by_id = BTreeMap::new();
        for individual in &self.individuals {
            if by_id.insert(individual.id.as_str(), individual).is_some() {
                return Err(PedigreeError::DuplicateIndividual(individual.id.clone()));
            }
        }
        for individual in &self.individuals {
            let parents = [
                (individual.father.as_deref(), Sex::Female),
                (individual.mother.as_deref(), Sex::Male),
            ];
            for (parent, wrong_sex) in parents {
                let Some(parent) = parent else {
                    continue;
                };
                if parent == individual.id {
                    return Err(PedigreeError::SelfParent(individual.id.clone()));
                }
                let parent_record = by_id.get(parent).ok_or_else(|| {
                    PedigreeError::UnknownParent(individual.id.clone(), parent.to_string())
                })?;
                if parent_record.sex == wrong_sex {
                    return Err(PedigreeError::ParentSexMismatch(
                        individual.id.clone(),
                        parent.to_string(),
                    ));
                }
            }
        }
        if self.affected().next().is_none() {
            return Err(PedigreeError::NoAffected);
        }
        Ok(())
    }
}

/// Result of checking a gene's variants against the pedigree.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Compatibility {
    /// Modes of inheritance compatible with the genotypes.
    pub modes: BTreeSet<ModeOfInheritance>,
    /// Indices of the checked variants whose genotypes are compatible with
    /// homozygous recessive inheritance.
    pub recessive_homozygous: BTreeSet<usize>,
}

impl Compatibility {
    /// Whether `mode` is compatible; `Any` is always compatible.
    pub fn is_compatible_with(&self, mode: ModeOfInheritance) -> bool {
        mode == ModeOfInheritance::Any || self.modes.contains(&mode)
    }
}

/// External pedigree-based compatibility test.
pub trait InheritanceChecker: Send + Sync {
    /// Check the genotypes of `variants` (all in the same gene) against `pedigree`.
    ///
    /// # Errors
    ///
    /// If the check cannot be performed.
    fn check(
        &self,
        pedigree: &Pedigree,
        variants: &[&VariantEvaluation],
    ) -> Result<Compatibility, PedigreeError>;
}

/// Adapts an `InheritanceChecker` to the modes the gene scorer works with.
pub struct InheritanceAdapter {
    /// The validated pedigree.
    pedigree: Pedigree,
    /// The compatibility test.
    checker: Box<dyn InheritanceChecker>,
}

impl std::fmt::Debug for InheritanceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InheritanceAdapter")
            .field("pedigree", &self.pedigree)
            .finish_non_exhaustive()
    }
}

impl InheritanceAdapter {
    /// Create a new adapter, validating `pedigree`.
    ///
    /// # Errors
    ///
    /// If the pedigree is structurally invalid.
    pub fn new(pedigree: Pedigree, checker: Box<dyn InheritanceChecker>) -> Result<Self, PedigreeError> {
        pedigree.validate()?;
        Ok(Self { pedigree, checker })
    }

    /// The validated pedigree.
    pub fn pedigree(&self) -> &Pedigree {
        &self.pedigree
    }

    /// Ensure that every sample with genotype calls is a pedigree member.
    ///
    /// # Errors
    ///
    /// `PedigreeError::UnknownSample` for the first sample not in the pedigree.
    pub fn check_samples<'a, I>(&self, evaluations: I) -> Result<(), PedigreeError>
    where
        I: IntoIterator<Item = &'a VariantEvaluation>,
    {
        for evaluation in evaluations {
            for sample in evaluation.genotypes().keys() {
                if self.pedigree.individual(sample).is_none() {
                    return Err(PedigreeError::UnknownSample(sample.clone()));
                }
            }
        }
        Ok(())
    }

    /// Return the concrete modes of inheritance compatible with `variants`.
    ///
    /// An empty variant list is compatible with no mode.
    ///
    /// # Errors
    ///
    /// Failures of the underlying checker are passed on.
    pub fn compatible_modes(
        &self,
        variants: &[&VariantEvaluation],
    ) -> Result<Compatibility, PedigreeError> {
        if variants.is_empty() {
            return Ok(Compatibility::default());
        }
        let Compatibility {
            modes,
            recessive_homozygous,
        } = self.checker.check(&self.pedigree, variants)?;
        Ok(Compatibility {
            modes: modes
                .into_iter()
                .filter(|mode| ModeOfInheritance::CONCRETE.contains(mode))
                .collect(),
            recessive_homozygous: recessive_homozygous
                .into_iter()
                .filter(|idx| *idx < variants.len())
                .collect(),
        })
    }
}

#[cfg(test)]
pub mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::seqvars::ds::{CallRecord, Genotype};

    /// Parent-child trio with an affected child.
    #[rstest::fixture]
    pub fn trio() -> Pedigree {
        Pedigree {
            individuals: vec![
                Individual {
                    id: "index".into(),
                    father: Some("father".into()),
                    mother: Some("mother".into()),
                    sex: Sex::Male,
                    affected: true,
                },
                Individual {
                    id: "father".into(),
                    father: None,
                    mother: None,
                    sex: Sex::Male,
                    affected: false,
                },
                Individual {
                    id: "mother".into(),
                    father: None,
                    mother: None,
                    sex: Sex::Female,
                    affected: false,
                },
            ],
        }
    }

    /// Checker reporting fixed modes.
    pub struct FixedChecker(pub Compatibility);

    impl InheritanceChecker for FixedChecker {
        fn check(
            &self,
            _pedigree: &Pedigree,
            _variants: &[&VariantEvaluation],
        ) -> Result<Compatibility, PedigreeError> {
            Ok(self.0.clone())
        }
    }

    #[rstest::rstest]
    fn validate_trio(trio: Pedigree) {
        assert_eq!(trio.validate(), Ok(()));
        assert_eq!(Pedigree::singleton("index", Sex::Female).validate(), Ok(()));
    }

    #[rstest::rstest]
    fn validate_errors(trio: Pedigree) {
        assert_eq!(Pedigree::default().validate(), Err(PedigreeError::Empty));

        let mut dup = trio.clone();
        dup.individuals.push(dup.individuals[1].clone());
        assert_eq!(
            dup.validate(),
            Err(PedigreeError::DuplicateIndividual("father".into()))
        );

        let mut unknown = trio.clone();
        unknown.individuals[0].father = Some("uncle".into());
        assert_eq!(
            unknown.validate(),
            Err(PedigreeError::UnknownParent("index".into(), "uncle".into()))
        );

        let mut swapped = trio.clone();
        swapped.individuals[0].father = Some("mother".into());
        assert_eq!(
            swapped.validate(),
            Err(PedigreeError::ParentSexMismatch("index".into(), "mother".into()))
        );

        let mut own = trio.clone();
        own.individuals[0].mother = Some("index".into());
        assert_eq!(own.validate(), Err(PedigreeError::SelfParent("index".into())));

        let mut unaffected = trio;
        unaffected.individuals[0].affected = false;
        assert_eq!(unaffected.validate(), Err(PedigreeError::NoAffected));
    }

    #[rstest::rstest]
    fn adapter_fails_fast(trio: Pedigree) {
        let mut broken = trio;
        broken.individuals.clear();
        let res = InheritanceAdapter::new(broken, Box::new(FixedChecker(Default::default())));
        assert!(matches!(res, Err(PedigreeError::Empty)));
    }

    #[rstest::rstest]
    fn adapter_narrows_modes(trio: Pedigree) -> Result<(), anyhow::Error> {
        let adapter = InheritanceAdapter::new(
            trio,
            Box::new(FixedChecker(Compatibility {
                modes: [
                    ModeOfInheritance::AutosomalRecessive,
                    ModeOfInheritance::Any,
                ]
                .into_iter()
                .collect(),
                recessive_homozygous: [0, 7].into_iter().collect(),
            })),
        )?;
        let evaluation = VariantEvaluation::new(CallRecord::default(), None);

        let res = adapter.compatible_modes(&[&evaluation])?;
        assert_eq!(
            res.modes,
            [ModeOfInheritance::AutosomalRecessive].into_iter().collect()
        );
        assert_eq!(res.recessive_homozygous, [0].into_iter().collect());
        assert!(res.is_compatible_with(ModeOfInheritance::Any));
        assert!(!res.is_compatible_with(ModeOfInheritance::AutosomalDominant));

        assert_eq!(adapter.compatible_modes(&[])?, Compatibility::default());

        Ok(())
    }

    #[rstest::rstest]
    fn adapter_checks_samples(trio: Pedigree) -> Result<(), anyhow::Error> {
        let adapter = InheritanceAdapter::new(trio, Box::new(FixedChecker(Default::default())))?;
        let known = VariantEvaluation::new(
            CallRecord {
                genotypes: [("index".to_string(), Genotype::Het)].into_iter().collect(),
                ..Default::default()
            },
            None,
        );
        let unknown = VariantEvaluation::new(
            CallRecord {
                genotypes: [("stranger".to_string(), Genotype::Het)].into_iter().collect(),
                ..Default::default()
            },
            None,
        );

        assert_eq!(adapter.check_samples([&known]), Ok(()));
        assert_eq!(
            adapter.check_samples([&known, &unknown]),
            Err(PedigreeError::UnknownSample("stranger".into()))
        );

        Ok(())
    }
}
