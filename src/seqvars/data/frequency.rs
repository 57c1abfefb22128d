//! Source-tagged population frequencies.

use strum::EnumCount as _;

/// Reference population a frequency was observed in.
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
    strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FrequencySource {
    /// Local frequency data of the lab.
    Local,
    /// 1000 Genomes Project.
    ThousandGenomes,
    /// TOPMed.
    Topmed,
    /// UK10K.
    Uk10k,
    /// ESP, African American.
    EspAa,
    /// ESP, European American.
    EspEa,
    /// ESP, all.
    EspAll,
    /// ExAC, African.
    ExacAfr,
    /// ExAC, American.
    ExacAmr,
    /// ExAC, East Asian.
    ExacEas,
    /// ExAC, Finnish.
    ExacFin,
    /// ExAC, non-Finnish European.
    ExacNfe,
    /// ExAC, other.
    ExacOth,
    /// ExAC, South Asian.
    ExacSas,
    /// gnomAD exomes, African.
    GnomadEAfr,
    /// gnomAD exomes, American.
    GnomadEAmr,
    /// gnomAD exomes, Ashkenazi Jewish.
    GnomadEAsj,
    /// gnomAD exomes, East Asian.
    GnomadEEas,
    /// gnomAD exomes, Finnish.
    GnomadEFin,
    /// gnomAD exomes, non-Finnish European.
    GnomadENfe,
    /// gnomAD exomes, other.
    GnomadEOth,
    /// gnomAD exomes, South Asian.
    GnomadESas,
    /// gnomAD genomes, African.
    GnomadGAfr,
    /// gnomAD genomes, American.
    GnomadGAmr,
    /// gnomAD genomes, Ashkenazi Jewish.
    GnomadGAsj,
    /// gnomAD genomes, East Asian.
    GnomadGEas,
    /// gnomAD genomes, Finnish.
    GnomadGFin,
    /// gnomAD genomes, non-Finnish European.
    GnomadGNfe,
    /// gnomAD genomes, other.
    GnomadGOth,
    /// gnomAD genomes, South Asian.
    GnomadGSas,
}

/// Allele counts backing a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct AlleleCounts {
    /// Number of alternative alleles observed.
    pub allele_count: u32,
    /// Total number of alleles called.
    pub allele_number: u32,
    /// Number of homozygous alternative individuals.
    pub homozygotes: u32,
}

/// A population frequency as a percentage in `[0, 100]`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Frequency {
    /// The reference population.
    pub source: FrequencySource,
    /// Frequency in percent.
    pub frequency: f64,
    /// Allele counts, if the source provides them.
    pub counts: Option<AlleleCounts>,
}

impl Frequency {
    /// Construct from a percentage.
    pub fn new(source: FrequencySource, frequency: f64) -> Self {
        Self {
            source,
            frequency,
            counts: None,
        }
    }

    /// Construct from allele counts, the percentage is `100 * ac / an`.
    pub fn from_counts(
        source: FrequencySource,
        allele_count: u32,
        allele_number: u32,
        homozygotes: u32,
    ) -> Self {
        let frequency = if allele_number == 0 {
            0.0
        } else {
            100.0 * f64::from(allele_count) / f64::from(allele_number)
        };
        Self {
            source,
            frequency,
            counts: Some(AlleleCounts {
                allele_count,
                allele_number,
                homozygotes,
            }),
        }
    }

    /// Whether the frequency is strictly above the percentage `threshold`.
    pub fn is_over_threshold(&self, threshold: f64) -> bool {
        self.frequency > threshold
    }
}

/// Frequencies of one variant, at most one per source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyData {
    /// dbSNP identifier, e.g., `rs123`.
    rs_id: Option<String>,
    /// Frequencies indexed by `FrequencySource as usize`.
    frequencies: [Option<Frequency>; FrequencySource::COUNT],
}

impl FrequencyData {
    /// Construct from an optional dbSNP identifier and frequencies; later
    /// frequencies of the same source replace earlier ones.
    pub fn new<I>(rs_id: Option<String>, frequencies: I) -> Self
    where
        I: IntoIterator<Item = Frequency>,
    {
        let mut result = Self::default();
        if let Some(rs_id) = rs_id {
            result.set_rs_id(rs_id);
        }
        frequencies.into_iter().for_each(|f| result.add(f));
        result
    }

    /// Add `frequency`, replacing any existing one of the same source.
    pub fn add(&mut self, frequency: Frequency) {
        self.frequencies[frequency.source as usize] = Some(frequency);
    }

    /// Set the dbSNP identifier; empty and `.` placeholders are ignored.
    pub fn set_rs_id(&mut self, rs_id: String) {
        if !rs_id.is_empty() && rs_id != "." {
            self.rs_id = Some(rs_id);
        }
    }

    /// The dbSNP identifier, if any.
    pub fn rs_id(&self) -> Option<&str> {
        self.rs_id.as_deref()
    }

    /// Return the frequency of the given `source`, if any.
    pub fn get(&self, source: FrequencySource) -> Option<&Frequency> {
        self.frequencies[source as usize].as_ref()
    }

    /// Present frequencies in source order.
    pub fn frequencies(&self) -> impl Iterator<Item = &Frequency> + '_ {
        self.frequencies.iter().flatten()
    }

    /// Whether any frequency is present.
    pub fn has_frequencies(&self) -> bool {
        self.frequencies().next().is_some()
    }

    /// Whether the variant is known to any reference database.
    pub fn is_represented_in_database(&self) -> bool {
        self.rs_id.is_some() || self.has_frequencies()
    }

    /// Maximal frequency over all sources in percent, `0.0` if there is none.
    pub fn max_frequency(&self) -> f64 {
        self.frequencies()
            .map(|f| f.frequency)
            .fold(0.0, f64::max)
    }

    /// Rarity score in `[0, 1]`, decreasing with the maximal frequency.
    ///
    /// Variants absent from all populations score `1.0` and variants above 2%
    /// score `0.0`.
    pub fn score(&self) -> f64 {
        let max_freq = self.max_frequency();
        if max_freq <= 0.0 {
            1.0
        } else if max_freq > 2.0 {
            0.0
        } else {
            1.0 - 0.13533 * max_freq.exp()
        }
    }
}

/// Serialization helper for `FrequencyData`.
#[serde_with::skip_serializing_none]
#[derive(serde::Deserialize, serde::Serialize)]
struct FrequencyDataRepr {
    rs_id: Option<String>,
    #[serde(default)]
    frequencies: Vec<Frequency>,
}

impl serde::Serialize for FrequencyData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        FrequencyDataRepr {
            rs_id: self.rs_id.clone(),
            frequencies: self.frequencies().copied().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for FrequencyData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = FrequencyDataRepr::deserialize(deserializer)?;
        Ok(Self::new(repr.rs_id, repr.frequencies))
    }
}
