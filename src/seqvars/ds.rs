//! Shared data structures for `seqvars`.

use std::collections::BTreeMap;

/// Representation of a sequence variant.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Deserialize, serde::Serialize,
)]
pub struct SequenceVariant {
    /// Chromosome.
    pub chrom: String,
    /// 1-based position.
    pub pos: u32,
    /// Reference allele.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Alternative allele.
    #[serde(rename = "alt")]
    pub alternative: String,
}

impl SequenceVariant {
    /// Construct a new `SequenceVariant`.
    pub fn new(chrom: &str, pos: u32, reference: &str, alternative: &str) -> Self {
        Self {
            chrom: chrom.to_string(),
            pos,
            reference: reference.to_string(),
            alternative: alternative.to_string(),
        }
    }

    /// Whether the variant is located on the X chromosome.
    pub fn is_chrom_x(&self) -> bool {
        matches!(self.chrom.as_str(), "X" | "chrX" | "23")
    }
}

impl std::str::FromStr for SequenceVariant {
    type Err = anyhow::Error;

    /// Parse from `CHROM:POS:REF:ALT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(':').collect::<Vec<_>>();
        if parts.len() != 4 {
            anyhow::bail!("invalid variant {:?}, expected CHROM:POS:REF:ALT", s);
        }
        let pos = parts[1]
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("invalid position in {:?}: {}", s, e))?;
        if pos == 0 {
            anyhow::bail!("position must be 1-based in {:?}", s);
        }
        Ok(Self::new(parts[0], pos, parts[2], parts[3]))
    }
}

impl std::fmt::Display for SequenceVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.chrom, self.pos, self.reference, self.alternative
        )
    }
}

/// Genotype call of one individual.
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
    serde_with::DeserializeFromStr,
    serde_with::SerializeDisplay,
)]
pub enum Genotype {
    /// No call.
    #[default]
    NoCall,
    /// Homozygous reference, `0/0`.
    HomRef,
    /// Heterozygous, `0/1`.
    Het,
    /// Homozygous alternative, `1/1`.
    HomAlt,
    /// Haploid reference call, `0`.
    HemiRef,
    /// Haploid alternative call, `1`.
    HemiAlt,
}

impl Genotype {
    /// Whether at least one alternative allele is called, `None` for no-calls.
    pub fn carries_alt(&self) -> Option<bool> {
        match self {
            Genotype::NoCall => None,
            Genotype::HomRef | Genotype::HemiRef => Some(false),
            Genotype::Het | Genotype::HomAlt | Genotype::HemiAlt => Some(true),
        }
    }

    /// Whether all called alleles are alternative, `None` for no-calls.
    pub fn is_hom_alt(&self) -> Option<bool> {
        match self {
            Genotype::NoCall => None,
            Genotype::HomAlt | Genotype::HemiAlt => Some(true),
            _ => Some(false),
        }
    }

    /// Whether the call is heterozygous, `None` for no-calls.
    pub fn is_het(&self) -> Option<bool> {
        match self {
            Genotype::NoCall => None,
            Genotype::Het => Some(true),
            _ => Some(false),
        }
    }
}

impl std::str::FromStr for Genotype {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alleles = s.split(['/', '|']).collect::<Vec<_>>();
        if alleles.iter().any(|a| *a == ".") {
            return Ok(Genotype::NoCall);
        }
        let is_alt = alleles
            .iter()
            .map(|a| match *a {
                "0" => Ok(false),
                a if !a.is_empty() && a.chars().all(|c| c.is_ascii_digit()) => Ok(true),
                _ => Err(anyhow::anyhow!("invalid allele {:?} in genotype {:?}", a, s)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        match is_alt.as_slice() {
            [false] => Ok(Genotype::HemiRef),
            [true] => Ok(Genotype::HemiAlt),
            [false, false] => Ok(Genotype::HomRef),
            [true, true] => Ok(Genotype::HomAlt),
            [_, _] => Ok(Genotype::Het),
            _ => anyhow::bail!("unsupported ploidy in genotype {:?}", s),
        }
    }
}

impl std::fmt::Display for Genotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Genotype::NoCall => "./.",
            Genotype::HomRef => "0/0",
            Genotype::Het => "0/1",
            Genotype::HomAlt => "1/1",
            Genotype::HemiRef => "0",
            Genotype::HemiAlt => "1",
        };
        write!(f, "{}", s)
    }
}

/// Variant effect class as reported by the annotation service.
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariantEffect {
    /// Missense variant.
    Missense,
    /// Frameshift insertion.
    FrameshiftInsertion,
    /// Frameshift deletion.
    FrameshiftDeletion,
    /// Frameshift block substitution.
    FrameshiftSubstitution,
    /// In-frame insertion.
    NonFrameshiftInsertion,
    /// In-frame deletion.
    NonFrameshiftDeletion,
    /// In-frame block substitution.
    NonFrameshiftSubstitution,
    /// Stop gain (nonsense).
    StopGained,
    /// Splice donor/acceptor variant.
    Splicing,
    /// Synonymous variant.
    Synonymous,
    /// Stop loss.
    StopLost,
    /// Start loss.
    StartLost,
    /// Intronic variant.
    Intronic,
    /// 5' UTR variant.
    FivePrimeUtr,
    /// 3' UTR variant.
    ThreePrimeUtr,
    /// Exonic variant in a non-coding transcript.
    NonCodingExon,
    /// Regulatory region variant.
    Regulatory,
    /// Upstream of a gene.
    Upstream,
    /// Downstream of a gene.
    Downstream,
    /// Intergenic variant.
    Intergenic,
    /// No annotation available.
    #[default]
    Unknown,
}

impl VariantEffect {
    /// Default pathogenicity for the effect class, used in the absence of predictions.
    pub fn default_pathogenicity(&self) -> f64 {
        match self {
            VariantEffect::Missense => 0.6,
            VariantEffect::FrameshiftInsertion
            | VariantEffect::FrameshiftDeletion
            | VariantEffect::FrameshiftSubstitution => 0.95,
            VariantEffect::NonFrameshiftInsertion
            | VariantEffect::NonFrameshiftDeletion
            | VariantEffect::NonFrameshiftSubstitution => 0.85,
            VariantEffect::StopGained => 0.95,
            VariantEffect::Splicing => 0.90,
            VariantEffect::Synonymous => 0.1,
            VariantEffect::StopLost => 0.7,
            VariantEffect::StartLost => 0.95,
            _ => 0.0,
        }
    }
}

/// One raw variant call with per-sample genotypes, as found in the case file.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct CallRecord {
    /// The called variant.
    #[serde(flatten)]
    pub variant: SequenceVariant,
    /// Call quality (Phred-scaled).
    #[serde(default)]
    pub quality: f64,
    /// Genotype call per sample name.
    #[serde(default)]
    pub genotypes: BTreeMap<String, Genotype>,
}
