//! Gene ranking for sequence variants.

pub mod analysis;
pub mod annotation;
pub mod config;
pub mod data;
pub mod ds;
pub mod error;
pub mod evaluation;
pub mod filter;
pub mod inheritance;
pub mod prioritisation;
pub mod scoring;

use std::path::Path;

use clap::Parser;

use self::{
    analysis::Analysis,
    config::{Config, RunMode},
    data::io::{AnnotationTable, EvidenceTable, PriorityTable},
    ds::CallRecord,
    inheritance::{segregation::SegregationChecker, InheritanceAdapter, ModeOfInheritance, Pedigree},
};

/// Command line arguments for `seqvars` command.
#[derive(Parser, Debug)]
#[command(about = "Rank candidate genes from sequence variants", long_about = None)]
pub struct Args {
    /// Path to the case JSON file with pedigree and variant calls.
    #[arg(long)]
    pub path_case: String,
    /// Path to the annotation TSV file.
    #[arg(long)]
    pub path_annotations: String,
    /// Path to the population frequency TSV file.
    #[arg(long)]
    pub path_frequencies: String,
    /// Path to the pathogenicity prediction TSV file.
    #[arg(long)]
    pub path_pathogenicity: String,
    /// Path to the gene priority TSV file.
    #[arg(long)]
    pub path_priorities: Option<String>,
    /// Path to the TOML configuration file.
    #[arg(long)]
    pub path_config: Option<String>,
    /// Override the run mode of the configuration.
    #[arg(long, value_enum)]
    pub run_mode: Option<RunMode>,
    /// Override the mode of inheritance of the configuration.
    #[arg(long, value_enum)]
    pub mode_of_inheritance: Option<ModeOfInheritance>,
}

/// Pedigree and raw variant calls of one case.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Case {
    /// The family.
    pub pedigree: Pedigree,
    /// The raw variant calls.
    pub variants: Vec<CallRecord>,
}

impl Case {
    /// Load a case from a JSON file.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let reader = std::fs::File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("problem opening file {:?}: {}", path.as_ref(), e))
            .map(std::io::BufReader::new)?;
        serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("problem parsing case {:?}: {}", path.as_ref(), e))
    }
}

/// Main entry point for the `seqvars` command.
///
/// # Arguments
///
/// * `common_args` - Commonly used command line arguments.
/// * `args` - Command line arguments specific to `seqvars` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    run_with_writer(common_args, args, &mut std::io::stdout().lock())
}

/// Run the `seqvars` command, writing the ranked genes as JSON lines to `out`.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run_with_writer<W>(
    common_args: &crate::common::Args,
    args: &Args,
    out: &mut W,
) -> Result<(), anyhow::Error>
where
    W: std::io::Write,
{
    tracing::info!("  running command `seqvars`");
    tracing::debug!("  common_args = {:?}", &common_args);
    tracing::debug!("  args = {:?}", &args);

    let mut config = match &args.path_config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(run_mode) = args.run_mode {
        config.run_mode = run_mode;
    }
    if let Some(mode) = args.mode_of_inheritance {
        config.mode_of_inheritance = mode;
    }

    tracing::info!("loading case and reference tables...");
    let case = Case::load(&args.path_case)?;
    let annotations = AnnotationTable::load(&args.path_annotations)?;
    let evidence = EvidenceTable::load(&args.path_frequencies, &args.path_pathogenicity)?;
    let priorities = match &args.path_priorities {
        Some(path) => PriorityTable::load(path)?,
        None => PriorityTable::default(),
    };
    tracing::info!(
        "... done loading {} variants and {} annotations",
        case.variants.len(),
        annotations.len()
    );

    let adapter = InheritanceAdapter::new(case.pedigree, Box::new(SegregationChecker))
        .map_err(|e| anyhow::anyhow!("invalid pedigree: {}", e))?;
    let analysis = Analysis::new(&config, &annotations, &evidence, &priorities, &adapter)
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    let results = analysis
        .run(case.variants)
        .map_err(|e| anyhow::anyhow!("analysis failed: {}", e))?;

    for gene in &results.genes {
        serde_json::to_writer(&mut *out, gene)
            .map_err(|e| anyhow::anyhow!("problem writing gene: {}", e))?;
        writeln!(out)?;
    }
    for errored in &results.errored {
        serde_json::to_writer(&mut *out, &serde_json::json!({ "errored": errored }))
            .map_err(|e| anyhow::anyhow!("problem writing errored variant: {}", e))?;
        writeln!(out)?;
    }
    tracing::info!(
        "ranked {} genes, {} variants errored",
        results.genes.len(),
        results.errored.len()
    );

    Ok(())
}

#[cfg(test)]
mod test {
    use clap_verbosity_flag::Verbosity;

    use super::*;

    fn args() -> Args {
        Args {
            path_case: "tests/data/seqvars/case.json".into(),
            path_annotations: "tests/data/seqvars/annotations.tsv".into(),
            path_frequencies: "tests/data/seqvars/frequencies.tsv".into(),
            path_pathogenicity: "tests/data/seqvars/pathogenicity.tsv".into(),
            path_priorities: Some("tests/data/seqvars/priorities.tsv".into()),
            path_config: Some("tests/data/seqvars/config.toml".into()),
            run_mode: None,
            mode_of_inheritance: None,
        }
    }

    #[test]
    fn run_smoke() -> Result<(), anyhow::Error> {
        let common_args = crate::common::Args {
            verbose: Verbosity::new(0, 0),
        };
        let mut out = Vec::new();
        run_with_writer(&common_args, &args(), &mut out)?;

        let text = String::from_utf8(out)?;
        let symbols = text
            .lines()
            .map(|line| -> Result<String, anyhow::Error> {
                let value: serde_json::Value = serde_json::from_str(line)?;
                Ok(value["symbol"].as_str().unwrap_or_default().to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(symbols, vec!["FGFR2", "SHH", "MECP2"]);

        Ok(())
    }

    #[test]
    fn run_smoke_full_mode() -> Result<(), anyhow::Error> {
        let common_args = crate::common::Args {
            verbose: Verbosity::new(0, 0),
        };
        let output = |run_mode| -> Result<String, anyhow::Error> {
            let args = Args {
                run_mode: Some(run_mode),
                path_config: None,
                ..args()
            };
            let mut out = Vec::new();
            run_with_writer(&common_args, &args, &mut out)?;
            Ok(String::from_utf8(out)?)
        };

        let full = output(RunMode::Full)?;
        assert_eq!(full.lines().count(), 3);
        assert_eq!(full, output(RunMode::PassOnly)?);

        Ok(())
    }

    #[test]
    fn case_load() -> Result<(), anyhow::Error> {
        let case = Case::load("tests/data/seqvars/case.json")?;

        assert_eq!(case.pedigree.individuals.len(), 3);
        assert_eq!(case.variants.len(), 8);

        Ok(())
    }
}
