//! Genotype segregation check used when no external pedigree service is configured.
//!
//! No-calls never contradict a mode of inheritance.

use std::collections::BTreeSet;

use super::{Compatibility, InheritanceChecker, ModeOfInheritance, Pedigree, Sex};
use crate::seqvars::{error::PedigreeError, evaluation::VariantEvaluation};

/// Checks segregation of genotypes with the affection status in the pedigree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegregationChecker;

impl SegregationChecker {
    /// Autosomal variant, all affected carry it, no unaffected carries it.
    fn is_dominant(pedigree: &Pedigree, variant: &VariantEvaluation) -> bool {
        if variant.variant().is_chrom_x() {
            return false;
        }
        pedigree.individuals.iter().all(|individual| {
            match variant.genotype(&individual.id).carries_alt() {
                None => true,
                Some(carries) => carries == individual.affected,
            }
        })
    }

    /// Autosomal variant, all affected are homozygous alternative, no unaffected is.
    fn is_recessive_homozygous(pedigree: &Pedigree, variant: &VariantEvaluation) -> bool {
        if variant.variant().is_chrom_x() {
            return false;
        }
        pedigree.individuals.iter().all(|individual| {
            match variant.genotype(&individual.id).is_hom_alt() {
                None => true,
                Some(hom_alt) => hom_alt == individual.affected,
            }
        })
    }

    /// Autosomal variant, all affected are heterozygous, no unaffected is homozygous
    /// alternative.
    fn is_recessive_het_candidate(pedigree: &Pedigree, variant: &VariantEvaluation) -> bool {
        if variant.variant().is_chrom_x() {
            return false;
        }
        let affected_het = pedigree
            .affected()
            .all(|individual| variant.genotype(&individual.id).is_het() != Some(false));
        let unaffected_not_hom = pedigree
            .unaffected()
            .all(|individual| variant.genotype(&individual.id).is_hom_alt() != Some(true));
        affected_het && unaffected_not_hom
    }

    /// No unaffected individual carries both variants.
    fn is_compound_het_pair(
        pedigree: &Pedigree,
        lhs: &VariantEvaluation,
        rhs: &VariantEvaluation,
    ) -> bool {
        pedigree.unaffected().all(|individual| {
            let both = lhs.genotype(&individual.id).carries_alt() == Some(true)
                && rhs.genotype(&individual.id).carries_alt() == Some(true);
            !both
        })
    }

    /// X-chromosomal variant, affected are hom./hemizygous, no unaffected male carries it
    /// and no unaffected female is homozygous.
    fn is_x_recessive(pedigree: &Pedigree, variant: &VariantEvaluation) -> bool {
        if !variant.variant().is_chrom_x() {
            return false;
        }
        pedigree.individuals.iter().all(|individual| {
            let genotype = variant.genotype(&individual.id);
            if individual.affected {
                genotype.is_hom_alt() != Some(false)
            } else if individual.sex == Sex::Male {
                genotype.carries_alt() != Some(true)
            } else {
                genotype.is_hom_alt() != Some(true)
            }
        })
    }
}

impl InheritanceChecker for SegregationChecker {
    fn check(
        &self,
        pedigree: &Pedigree,
        variants: &[&VariantEvaluation],
    ) -> Result<Compatibility, PedigreeError> {
        let mut modes = BTreeSet::new();

        if variants.iter().any(|v| Self::is_dominant(pedigree, v)) {
            modes.insert(ModeOfInheritance::AutosomalDominant);
        }

        let recessive_homozygous = variants
            .iter()
            .enumerate()
            .filter(|(_, v)| Self::is_recessive_homozygous(pedigree, v))
            .map(|(idx, _)| idx)
            .collect::<BTreeSet<_>>();
        let het_candidates = variants
            .iter()
            .filter(|v| Self::is_recessive_het_candidate(pedigree, v))
            .collect::<Vec<_>>();
        let has_compound_het = het_candidates.iter().enumerate().any(|(i, lhs)| {
            het_candidates[i + 1..]
                .iter()
                .any(|rhs| Self::is_compound_het_pair(pedigree, lhs, rhs))
        });
        if !recessive_homozygous.is_empty() || has_compound_het {
            modes.insert(ModeOfInheritance::AutosomalRecessive);
        }

        if variants.iter().any(|v| Self::is_x_recessive(pedigree, v)) {
            modes.insert(ModeOfInheritance::XLinkedRecessive);
        }

        tracing::trace!(
            "segregation check of {} variants: {:?}",
            variants.len(),
            &modes
        );
        Ok(Compatibility {
            modes,
            recessive_homozygous,
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::seqvars::{
        ds::{CallRecord, Genotype, SequenceVariant},
        inheritance::test::trio,
    };

    fn variant(chrom: &str, index: &str, father: &str, mother: &str) -> VariantEvaluation {
        VariantEvaluation::new(
            CallRecord {
                variant: SequenceVariant::new(chrom, 1000, "A", "G"),
                quality: 50.0,
                genotypes: [("index", index), ("father", father), ("mother", mother)]
                    .into_iter()
                    .map(|(s, gt)| (s.to_string(), gt.parse::<Genotype>().expect("valid genotype")))
                    .collect(),
            },
            None,
        )
    }

    fn modes(items: &[ModeOfInheritance]) -> BTreeSet<ModeOfInheritance> {
        items.iter().copied().collect()
    }

    #[rstest::rstest]
    fn de_novo_is_dominant(trio: Pedigree) -> Result<(), anyhow::Error> {
        let v = variant("1", "0/1", "0/0", "0/0");
        let res = SegregationChecker.check(&trio, &[&v])?;
        assert_eq!(res.modes, modes(&[ModeOfInheritance::AutosomalDominant]));
        assert!(res.recessive_homozygous.is_empty());

        Ok(())
    }

    #[rstest::rstest]
    fn homozygous_recessive(trio: Pedigree) -> Result<(), anyhow::Error> {
        let v1 = variant("1", "0/1", "0/1", "0/0");
        let v2 = variant("1", "1/1", "0/1", "0/1");
        let res = SegregationChecker.check(&trio, &[&v1, &v2])?;
        assert_eq!(res.modes, modes(&[ModeOfInheritance::AutosomalRecessive]));
        assert_eq!(res.recessive_homozygous, [1].into_iter().collect());

        Ok(())
    }

    #[rstest::rstest]
    fn compound_heterozygous(trio: Pedigree) -> Result<(), anyhow::Error> {
        let paternal = variant("1", "0/1", "0/1", "0/0");
        let maternal = variant("1", "0/1", "0/0", "0/1");
        let res = SegregationChecker.check(&trio, &[&paternal, &maternal])?;
        assert_eq!(res.modes, modes(&[ModeOfInheritance::AutosomalRecessive]));
        assert!(res.recessive_homozygous.is_empty());

        // Both inherited from the father: not compound heterozygous.
        let paternal2 = variant("1", "0/1", "0/1", "0/0");
        let res = SegregationChecker.check(&trio, &[&paternal, &paternal2])?;
        assert_eq!(res.modes, modes(&[]));

        Ok(())
    }

    #[rstest::rstest]
    fn x_linked_recessive(trio: Pedigree) -> Result<(), anyhow::Error> {
        let v = variant("X", "1", "0", "0/1");
        let res = SegregationChecker.check(&trio, &[&v])?;
        assert_eq!(res.modes, modes(&[ModeOfInheritance::XLinkedRecessive]));
        assert!(res.recessive_homozygous.is_empty());

        Ok(())
    }

    #[rstest::rstest]
    #[case("X")]
    #[case("chrX")]
    fn x_chromosomal_variants_are_not_autosomal(
        trio: Pedigree,
        #[case] chrom: &str,
    ) -> Result<(), anyhow::Error> {
        let de_novo = variant(chrom, "0/1", "0/0", "0/0");
        let homozygous = variant(chrom, "1/1", "0/0", "0/1");
        let paternal = variant(chrom, "0/1", "0/1", "0/0");
        let maternal = variant(chrom, "0/1", "0/0", "0/1");
        let res = SegregationChecker.check(&trio, &[&de_novo, &homozygous, &paternal, &maternal])?;

        assert!(!res.modes.contains(&ModeOfInheritance::AutosomalDominant));
        assert!(!res.modes.contains(&ModeOfInheritance::AutosomalRecessive));
        assert!(res.recessive_homozygous.is_empty());

        Ok(())
    }

    #[rstest::rstest]
    fn no_calls_are_compatible(trio: Pedigree) -> Result<(), anyhow::Error> {
        let v = variant("1", "./.", "./.", "./.");
        let res = SegregationChecker.check(&trio, &[&v])?;
        assert_eq!(
            res.modes,
            modes(&[
                ModeOfInheritance::AutosomalDominant,
                ModeOfInheritance::AutosomalRecessive
            ])
        );

        Ok(())
    }
}
