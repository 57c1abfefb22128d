//! Source-tagged pathogenicity predictions.
//!
//! All sources report values in `[0, 1]` where larger means more likely to be
//! pathogenic, except for SIFT which reports tolerance (smaller means more
//! damaging).  Ordering and aggregate scores always use the
//! pathogenicity-oriented value, see [`pathogenicity_rank`].

use std::cmp::Ordering;

use strum::EnumCount as _;

/// Source of a pathogenicity prediction.
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
    strum::EnumIter,
    strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PathogenicitySource {
    /// PolyPhen-2.
    Polyphen,
    /// MutationTaster.
    MutationTaster,
    /// SIFT, a tolerance score.
    Sift,
    /// CADD (scaled to `[0, 1]`).
    Cadd,
    /// REVEL.
    Revel,
    /// MVP.
    Mvp,
    /// REMM, for non-coding variants.
    Remm,
}

impl PathogenicitySource {
    /// Whether raw values of the source express tolerance instead of pathogenicity.
    pub fn is_tolerance_score(&self) -> bool {
        matches!(self, PathogenicitySource::Sift)
    }
}

/// A single pathogenicity prediction.
///
/// Note that the ordering provided by [`compare_pathogenicity`] is not consistent
/// with `PartialEq`: a SIFT score of `0.1` and a PolyPhen score of `0.9` compare as
/// equal but are not equal values.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PathogenicityScore {
    /// The predicting source.
    pub source: PathogenicitySource,
    /// The raw value as reported by the source.
    pub score: f64,
}

impl PathogenicityScore {
    /// Construct a new `PathogenicityScore`.
    pub fn new(source: PathogenicitySource, score: f64) -> Self {
        Self { source, score }
    }
}

/// Return the pathogenicity-oriented value of `score`.
///
/// Tolerance scores are inverted so that larger always means more pathogenic.
pub fn pathogenicity_rank(score: &PathogenicityScore) -> f64 {
    if score.source.is_tolerance_score() {
        1.0 - score.score
    } else {
        score.score
    }
}

/// Compare two scores such that the more pathogenic one sorts first.
pub fn compare_pathogenicity(lhs: &PathogenicityScore, rhs: &PathogenicityScore) -> Ordering {
    pathogenicity_rank(rhs).total_cmp(&pathogenicity_rank(lhs))
}

/// Collection of at most one pathogenicity score per source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathogenicityData {
    /// Scores indexed by `PathogenicitySource as usize`.
    scores: [Option<PathogenicityScore>; PathogenicitySource::COUNT],
}

impl PathogenicityData {
    /// Construct from the given scores; a later score for the same source replaces
    /// an earlier one and `None` entries are skipped.
    pub fn new<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = Option<PathogenicityScore>>,
    {
        let mut result = Self::default();
        scores.into_iter().flatten().for_each(|s| result.add(s));
        result
    }

    /// Add `score`, replacing any existing score of the same source.
    pub fn add(&mut self, score: PathogenicityScore) {
        self.scores[score.source as usize] = Some(score);
    }

    /// Return the score of the given `source`, if any.
    pub fn get(&self, source: PathogenicitySource) -> Option<&PathogenicityScore> {
        self.scores[source as usize].as_ref()
    }

    /// Whether a score for `source` is present.
    pub fn has_source(&self, source: PathogenicitySource) -> bool {
        self.get(source).is_some()
    }

    /// Whether no score is present at all.
    pub fn is_empty(&self) -> bool {
        self.scores.iter().all(Option::is_none)
    }

    /// Present scores in source order.
    pub fn scores(&self) -> impl Iterator<Item = &PathogenicityScore> + '_ {
        self.scores.iter().flatten()
    }

    /// Return the score that sorts first under [`compare_pathogenicity`].
    ///
    /// Ties are resolved towards the earlier source.
    pub fn most_pathogenic_score(&self) -> Option<&PathogenicityScore> {
        self.scores().fold(None, |best, score| match best {
            Some(best) if compare_pathogenicity(score, best) != Ordering::Less => Some(best),
            _ => Some(score),
        })
    }

    /// Pathogenicity-oriented value of the most pathogenic score, `0.0` when empty.
    pub fn score(&self) -> f64 {
        self.most_pathogenic_score()
            .map(pathogenicity_rank)
            .unwrap_or(0.0)
    }
}

impl serde::Serialize for PathogenicityData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.scores())
    }
}

impl<'de> serde::Deserialize<'de> for PathogenicityData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let scores = Vec::<PathogenicityScore>::deserialize(deserializer)?;
        Ok(Self::new(scores.into_iter().map(Some)))
    }
}

impl FromIterator<PathogenicityScore> for PathogenicityData {
    fn from_iter<T: IntoIterator<Item = PathogenicityScore>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Some))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty() {
        let data = PathogenicityData::default();
        assert!(data.is_empty());
        assert_eq!(data.score(), 0.0);
        assert_eq!(data.most_pathogenic_score(), None);
    }

    #[test]
    fn constructor_drops_none() {
        let data = PathogenicityData::new(vec![
            None,
            Some(PathogenicityScore::new(PathogenicitySource::Polyphen, 0.3)),
            None,
        ]);
        assert_eq!(data.scores().count(), 1);
        assert!(data.has_source(PathogenicitySource::Polyphen));
        assert!(!data.has_source(PathogenicitySource::Cadd));
    }

    #[test]
    fn add_overwrites_same_source() {
        let mut data = PathogenicityData::default();
        data.add(PathogenicityScore::new(PathogenicitySource::Revel, 0.2));
        data.add(PathogenicityScore::new(PathogenicitySource::Revel, 0.7));
        assert_eq!(data.scores().count(), 1);
        assert_eq!(
            data.get(PathogenicitySource::Revel),
            Some(&PathogenicityScore::new(PathogenicitySource::Revel, 0.7))
        );
    }

    #[rstest::rstest]
    #[case(0.0)]
    #[case(0.05)]
    #[case(0.5)]
    #[case(1.0)]
    fn sift_only_is_inverted(#[case] value: f64) {
        let data: PathogenicityData =
            std::iter::once(PathogenicityScore::new(PathogenicitySource::Sift, value)).collect();
        assert_eq!(data.score(), 1.0 - value);
    }

    #[test]
    fn most_pathogenic_with_sift() {
        let data: PathogenicityData = vec![
            PathogenicityScore::new(PathogenicitySource::Polyphen, 0.8),
            PathogenicityScore::new(PathogenicitySource::Sift, 0.01),
            PathogenicityScore::new(PathogenicitySource::MutationTaster, 0.9),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            data.most_pathogenic_score(),
            Some(&PathogenicityScore::new(PathogenicitySource::Sift, 0.01))
        );
        assert_eq!(data.score(), 1.0 - 0.01);
    }

    #[test]
    fn tie_prefers_earlier_source() {
        let data: PathogenicityData = vec![
            PathogenicityScore::new(PathogenicitySource::Cadd, 0.5),
            PathogenicityScore::new(PathogenicitySource::Sift, 0.5),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            data.most_pathogenic_score().map(|s| s.source),
            Some(PathogenicitySource::Sift)
        );
    }

    #[test]
    fn comparison_inconsistent_with_equality() {
        let polyphen = PathogenicityScore::new(PathogenicitySource::Polyphen, 0.9);
        let sift = PathogenicityScore::new(PathogenicitySource::Sift, 0.1);
        assert_eq!(compare_pathogenicity(&polyphen, &sift), Ordering::Equal);
        assert_ne!(polyphen, sift);

        let benign = PathogenicityScore::new(PathogenicitySource::Polyphen, 0.1);
        assert_eq!(compare_pathogenicity(&polyphen, &benign), Ordering::Less);
        assert_eq!(compare_pathogenicity(&benign, &sift), Ordering::Greater);
    }

    #[test]
    fn serde_roundtrip_keeps_single_score_per_source() -> Result<(), anyhow::Error> {
        let data: PathogenicityData = serde_json::from_str(
            r#"[{"source": "cadd", "score": 0.2}, {"source": "cadd", "score": 0.4},
                {"source": "revel", "score": 0.6}]"#,
        )?;
        assert_eq!(
            serde_json::to_string(&data)?,
            r#"[{"source":"cadd","score":0.4},{"source":"revel","score":0.6}]"#
        );

        Ok(())
    }

    #[test]
    fn source_from_str() -> Result<(), anyhow::Error> {
        assert_eq!(
            "mutation_taster".parse::<PathogenicitySource>()?,
            PathogenicitySource::MutationTaster
        );
        assert_eq!("SIFT".parse::<PathogenicitySource>()?, PathogenicitySource::Sift);
        assert!("unknown".parse::<PathogenicitySource>().is_err());

        Ok(())
    }
}
