//! Tab-separated reference tables and the facades serving lookups from them.

use std::{io::BufReader, path::Path};

use super::{
    frequency::{Frequency, FrequencyData, FrequencySource},
    pathogenicity::{PathogenicityData, PathogenicityScore, PathogenicitySource},
    EvidenceLookup,
};
use crate::seqvars::{
    annotation::{Annotation, Annotator},
    ds::{SequenceVariant, VariantEffect},
    error::{AnnotationError, LookupError},
    prioritisation::{PriorityResult, PriorityService, PriorityType},
};

/// One row of the annotation table.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AnnotationRecord {
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
    /// Gene symbol.
    pub gene_symbol: String,
    /// Most severe effect class.
    pub effect: VariantEffect,
}

/// One row of the frequency table.
///
/// Rows without `source` only register the dbSNP identifier.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct FrequencyRecord {
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
    /// dbSNP identifier.
    pub rs_id: Option<String>,
    /// Reference population.
    pub source: Option<FrequencySource>,
    /// Frequency in percent.
    pub frequency: Option<f64>,
}

/// One row of the pathogenicity table.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PathogenicityRecord {
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
    /// Predictor.
    pub source: PathogenicitySource,
    /// Raw predictor value.
    pub score: f64,
}

/// One row of the priority table.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PriorityRecord {
    /// Gene symbol.
    pub gene_symbol: String,
    /// Prioritisation method.
    pub method: PriorityType,
    /// Priority score.
    pub score: f64,
}

/// Load the records of a TSV file with header.
///
/// # Arguments
///
/// * `path` - Path to the TSV file.
///
/// # Returns
///
/// The records in file order.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn load_file<T, P>(path: P) -> Result<Vec<T>, anyhow::Error>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    tracing::debug!("loading {:?}", path.as_ref());
    let reader = std::fs::File::open(path.as_ref())
        .map_err(|e| anyhow::anyhow!("problem opening file {:?}: {}", path.as_ref(), e))
        .map(BufReader::new)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);
    let mut result = Vec::new();
    for record in csv_reader.deserialize() {
        let record = record.map_err(|e| anyhow::anyhow!("problem parsing record: {}", e))?;
        result.push(record);
    }

    Ok(result)
}

/// Facade struct serving annotations from the annotation table.
#[derive(Debug, Clone, Default)]
pub struct AnnotationTable {
    /// Annotation by variant.
    by_variant: rustc_hash::FxHashMap<SequenceVariant, Annotation>,
}

impl AnnotationTable {
    /// Load from file and construct.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        Ok(Self::new(load_file(path)?))
    }

    /// Construct from records; the last record of a variant wins.
    pub fn new(records: Vec<AnnotationRecord>) -> Self {
        let by_variant = records
            .into_iter()
            .map(|record| {
                (
                    SequenceVariant {
                        chrom: record.chrom,
                        pos: record.pos,
                        reference: record.reference,
                        alternative: record.alternative,
                    },
                    Annotation {
                        gene_symbol: record.gene_symbol,
                        effect: record.effect,
                    },
                )
            })
            .collect();
        Self { by_variant }
    }

    /// Number of annotated variants.
    pub fn len(&self) -> usize {
        self.by_variant.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.by_variant.is_empty()
    }
}

impl Annotator for AnnotationTable {
    fn annotate(&self, variant: &SequenceVariant) -> Result<Annotation, AnnotationError> {
        self.by_variant
            .get(variant)
            .cloned()
            .ok_or_else(|| AnnotationError::Unavailable(variant.to_string()))
    }
}

/// Facade struct serving frequencies and pathogenicity predictions.
#[derive(Debug, Clone, Default)]
pub struct EvidenceTable {
    /// Frequencies by variant.
    frequencies: rustc_hash::FxHashMap<SequenceVariant, FrequencyData>,
    /// Pathogenicity predictions by variant.
    pathogenicity: rustc_hash::FxHashMap<SequenceVariant, PathogenicityData>,
}

impl EvidenceTable {
    /// Load from the frequency and pathogenicity files and construct.
    ///
    /// # Errors
    ///
    /// If any file cannot be read or parsed.
    pub fn load<P, Q>(path_frequencies: P, path_pathogenicity: Q) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        Ok(Self::new(
            load_file(path_frequencies)?,
            load_file(path_pathogenicity)?,
        ))
    }

    /// Construct from records; within a variant, the last record of a source wins.
    pub fn new(
        frequency_records: Vec<FrequencyRecord>,
        pathogenicity_records: Vec<PathogenicityRecord>,
    ) -> Self {
        let mut frequencies = rustc_hash::FxHashMap::<SequenceVariant, FrequencyData>::default();
        for record in frequency_records {
            let data = frequencies
                .entry(SequenceVariant {
                    chrom: record.chrom,
                    pos: record.pos,
                    reference: record.reference,
                    alternative: record.alternative,
                })
                .or_default();
            if let Some(rs_id) = record.rs_id {
                data.set_rs_id(rs_id);
            }
            if let (Some(source), Some(frequency)) = (record.source, record.frequency) {
                data.add(Frequency::new(source, frequency));
            }
        }

        let mut pathogenicity =
            rustc_hash::FxHashMap::<SequenceVariant, PathogenicityData>::default();
        for record in pathogenicity_records {
            pathogenicity
                .entry(SequenceVariant {
                    chrom: record.chrom,
                    pos: record.pos,
                    reference: record.reference,
                    alternative: record.alternative,
                })
                .or_default()
                .add(PathogenicityScore::new(record.source, record.score));
        }

        Self {
            frequencies,
            pathogenicity,
        }
    }
}

impl EvidenceLookup for EvidenceTable {
    fn frequencies_for(&self, variant: &SequenceVariant) -> Result<FrequencyData, LookupError> {
        Ok(self.frequencies.get(variant).cloned().unwrap_or_default())
    }

    fn pathogenicity_for(
        &self,
        variant: &SequenceVariant,
    ) -> Result<PathogenicityData, LookupError> {
        Ok(self.pathogenicity.get(variant).cloned().unwrap_or_default())
    }
}

/// Facade struct serving gene priority scores.
#[derive(Debug, Clone, Default)]
pub struct PriorityTable {
    /// Priority results by gene symbol, in file order.
    by_gene: rustc_hash::FxHashMap<String, Vec<PriorityResult>>,
}

impl PriorityTable {
    /// Load from file and construct.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        Ok(Self::new(load_file(path)?))
    }

    /// Construct from records; a later record of the same gene and method replaces
    /// the earlier one.
    pub fn new(records: Vec<PriorityRecord>) -> Self {
        let mut by_gene = rustc_hash::FxHashMap::<String, Vec<PriorityResult>>::default();
        for record in records {
            let results = by_gene.entry(record.gene_symbol).or_default();
            let result = PriorityResult::new(record.method, record.score);
            match results.iter_mut().find(|r| r.method == record.method) {
                Some(existing) => *existing = result,
                None => results.push(result),
            }
        }
        Self { by_gene }
    }
}

impl PriorityService for PriorityTable {
    fn score_for(&self, gene_symbol: &str) -> Vec<PriorityResult> {
        self.by_gene.get(gene_symbol).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn load_annotations() -> Result<(), anyhow::Error> {
        let table = AnnotationTable::load("tests/data/seqvars/annotations.tsv")?;

        assert_eq!(table.len(), 7);
        assert_eq!(
            table.annotate(&SequenceVariant::new("10", 123_256_215, "T", "G"))?,
            Annotation {
                gene_symbol: "FGFR2".into(),
                effect: VariantEffect::Missense,
            }
        );
        assert_eq!(
            table.annotate(&SequenceVariant::new("1", 1, "A", "C")),
            Err(AnnotationError::Unavailable("1:1:A:C".into()))
        );

        Ok(())
    }

    #[test]
    fn load_evidence() -> Result<(), anyhow::Error> {
        let table = EvidenceTable::load(
            "tests/data/seqvars/frequencies.tsv",
            "tests/data/seqvars/pathogenicity.tsv",
        )?;

        let common = SequenceVariant::new("2", 47_630_500, "C", "T");
        let frequencies = table.frequencies_for(&common)?;
        assert_eq!(frequencies.rs_id(), Some("rs1042821"));
        assert_eq!(frequencies.max_frequency(), 18.5);

        let known = SequenceVariant::new("10", 123_256_215, "T", "G");
        assert_eq!(table.frequencies_for(&known)?.rs_id(), Some("rs79184941"));
        assert!(!table.frequencies_for(&known)?.has_frequencies());
        let pathogenicity = table.pathogenicity_for(&known)?;
        assert_eq!(pathogenicity.scores().count(), 2);
        assert_eq!(pathogenicity.score(), 0.98);

        let absent = SequenceVariant::new("1", 1, "A", "C");
        assert_eq!(table.frequencies_for(&absent)?, FrequencyData::default());
        assert!(table.pathogenicity_for(&absent)?.is_empty());

        Ok(())
    }

    #[test]
    fn priority_table_replaces_duplicates() {
        let table = PriorityTable::new(vec![
            PriorityRecord {
                gene_symbol: "FGFR2".into(),
                method: PriorityType::HumanPhenotype,
                score: 0.2,
            },
            PriorityRecord {
                gene_symbol: "FGFR2".into(),
                method: PriorityType::HumanPhenotype,
                score: 0.9,
            },
        ]);

        assert_eq!(
            table.score_for("FGFR2"),
            vec![PriorityResult::new(PriorityType::HumanPhenotype, 0.9)]
        );
        assert!(table.score_for("SHH").is_empty());
    }

    #[test]
    fn load_priorities() -> Result<(), anyhow::Error> {
        let table = PriorityTable::load("tests/data/seqvars/priorities.tsv")?;

        assert_eq!(
            table.score_for("FGFR2"),
            vec![PriorityResult::new(PriorityType::HumanPhenotype, 0.95)]
        );

        Ok(())
    }
}
