//! Genomic regions on rust-bio intervals.

use bio::bio_types::genome::AbstractInterval as _;

/// 0-based, half-open genomic interval.
pub type Interval = bio::bio_types::genome::Interval;

/// Contig name without `chr` prefix, so that `chr1` and `1` compare equal.
pub fn canonical_contig(contig: &str) -> &str {
    contig.strip_prefix("chr").unwrap_or(contig)
}

/// Returns whether the 1-based position `pos` on `chrom` lies within `interval`.
///
/// # Arguments
///
/// * `interval` - The region to check.
/// * `chrom` - Chromosome of the position.
/// * `pos` - 1-based position.
pub fn contains_position(interval: &Interval, chrom: &str, pos: u32) -> bool {
    canonical_contig(interval.contig()) == canonical_contig(chrom)
        && pos > 0
        && interval.range().contains(&u64::from(pos - 1))
}

/// Parse a region string `CHROM:START-END` with 1-based, inclusive coordinates.
///
/// A bare `CHROM` yields the whole chromosome.
///
/// # Errors
///
/// If the string is malformed or `START > END`.
pub fn parse_region(region: &str) -> Result<Interval, anyhow::Error> {
    let (chrom, range) = match region.split_once(':') {
        Some((chrom, range)) => (chrom, Some(range)),
        None => (region, None),
    };
    if chrom.is_empty() {
        anyhow::bail!("missing chromosome in region {:?}", region);
    }
    let Some(range) = range else {
        return Ok(Interval::new(chrom.to_string(), 0..u64::MAX));
    };
    let (begin, end) = range
        .split_once('-')
        .ok_or_else(|| anyhow::anyhow!("could not parse range of region {:?}", region))?;
    let begin = begin
        .replace(',', "")
        .parse::<u64>()
        .map_err(|e| anyhow::anyhow!("could not parse start position of {:?}: {}", region, e))?
        .saturating_sub(1);
    let end = end
        .replace(',', "")
        .parse::<u64>()
        .map_err(|e| anyhow::anyhow!("could not parse end position of {:?}: {}", region, e))?;
    if begin >= end {
        anyhow::bail!("empty region {:?}", region);
    }
    Ok(Interval::new(chrom.to_string(), begin..end))
}

#[cfg(test)]
mod test {
    use super::*;

    #[rstest::rstest]
    #[case("1", 100, true)]
    #[case("chr1", 200, true)]
    #[case("1", 99, false)]
    #[case("1", 201, false)]
    #[case("2", 150, false)]
    #[case("1", 0, false)]
    fn contains_position_cases(#[case] chrom: &str, #[case] pos: u32, #[case] expected: bool) {
        let itv = Interval::new("chr1".into(), 99..200);
        assert_eq!(contains_position(&itv, chrom, pos), expected);
    }

    #[rstest::rstest]
    #[case("1:100-200", "1", 99..200)]
    #[case("X:1,000-2,000", "X", 999..2000)]
    #[case("chr7", "chr7", 0..u64::MAX)]
    fn parse_region_ok(
        #[case] region: &str,
        #[case] contig: &str,
        #[case] range: std::ops::Range<u64>,
    ) -> Result<(), anyhow::Error> {
        let itv = parse_region(region)?;
        assert_eq!(itv.contig(), contig);
        assert_eq!(itv.range(), range);

        Ok(())
    }

    #[rstest::rstest]
    #[case("")]
    #[case(":1-2")]
    #[case("1:200-100")]
    #[case("1:abc-100")]
    #[case("1:100")]
    fn parse_region_err(#[case] region: &str) {
        assert!(parse_region(region).is_err());
    }
}
