use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use splcore::config::AnalysisConfig;
use splcore::indexer::build_index;
use splcore::persist::{load_traces, save_report, save_traces, Report};
use splcore::trace::{score_documents, trace_products};
use splcore::{analyze, ExtendedBoolean, FeatureDictionary, Language};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "tracer")]
#[command(about = "Recover feature traces and variability across product variants", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index one product and print index statistics
    Index {
        /// Product source tree
        #[arg(long)]
        project: PathBuf,
        /// Language tag (c, java, cpp, cs, python, haskell)
        #[arg(long)]
        language: String,
        /// Directory holding the stop-word lists
        #[arg(long, default_value = "resources")]
        resources: PathBuf,
        /// Drop conditional-compilation lines before tokenizing
        #[arg(long, default_value_t = false)]
        remove_ifdefs: bool,
    },
    /// Score every document of one product against one feature
    Score {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        product: String,
        #[arg(long)]
        feature: String,
    },
    /// Threshold scores into a per-product trace table
    Trace {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Classify a trace table and diff common and shared files
    Classify {
        #[arg(long)]
        traces: PathBuf,
        /// Directory holding one subdirectory per product
        #[arg(long)]
        base: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Trace and classify in one go
    Run {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct IndexStats {
    project: PathBuf,
    language: Language,
    num_files: usize,
    num_documents: usize,
    num_terms: usize,
    skipped: Vec<PathBuf>,
}

#[derive(Serialize)]
struct ScoredDocument {
    path: PathBuf,
    score: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { project, language, resources, remove_ifdefs } => {
            index_stats(&project, &language, &resources, remove_ifdefs)
        }
        Commands::Score { config, product, feature } => score(&config, &product, &feature),
        Commands::Trace { config, output } => {
            let config = AnalysisConfig::load(&config)?;
            let traces = trace_products(&config)?;
            save_traces(&output, &traces)?;
            tracing::info!(output = %output.display(), products = traces.len(), "trace table written");
            Ok(())
        }
        Commands::Classify { traces, base, output } => {
            let traces = load_traces(&traces)?;
            let report = Report::new(traces.len(), analyze(&traces, &base));
            save_report(&output, &report)?;
            tracing::info!(output = %output.display(), features = report.meta.num_features, "report written");
            Ok(())
        }
        Commands::Run { config, output } => {
            let config = AnalysisConfig::load(&config)?;
            let traces = trace_products(&config)?;
            let report = Report::new(traces.len(), analyze(&traces, &config.products_base_path));
            save_report(&output, &report)?;
            tracing::info!(output = %output.display(), features = report.meta.num_features, "report written");
            Ok(())
        }
    }
}

fn index_stats(project: &Path, language: &str, resources: &Path, remove_ifdefs: bool) -> Result<()> {
    let language: Language = language.parse()?;
    let index = build_index(project, language, &FeatureDictionary::new(), resources, remove_ifdefs)?;
    let stats = IndexStats {
        project: project.to_path_buf(),
        language,
        num_files: index.num_files(),
        num_documents: index.document_lengths().len(),
        num_terms: index.num_terms(),
        skipped: index.skipped().iter().map(|s| s.path.clone()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn score(config: &Path, product: &str, feature: &str) -> Result<()> {
    let config = AnalysisConfig::load(config)?;
    let synonyms = config
        .features
        .get(feature)
        .ok_or_else(|| anyhow!("unknown feature: {feature}"))?;
    let scorer = ExtendedBoolean::from_resources(&config.resources_dir)?.with_combination(config.combination);

    let index = build_index(
        &config.product_path(product),
        config.language()?,
        &config.features,
        &config.resources_dir,
        config.remove_ifdefs,
    )?;
    let scored: Vec<ScoredDocument> = score_documents(&index, synonyms, &scorer)
        .into_iter()
        .map(|(path, score)| ScoredDocument { path, score })
        .collect();
    println!("{}", serde_json::to_string_pretty(&scored)?);
    Ok(())
}
