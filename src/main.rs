use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use walsim::prelude::*;

/// Pairwise language similarity from WALS features
#[derive(Parser, Debug)]
#[command(name = "walsim")]
#[command(about = "Pairwise language similarity from WALS features", long_about = None)]
struct Args {
    /// Directory holding the WALS CLDF tables
    #[arg(short, long, default_value = "./data/wals")]
    data_dir: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot directory, overrides the configuration
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Load scores from a snapshot instead of recomputing them
    #[arg(long)]
    from_cache: bool,

    /// Snapshot to load with --from-cache; the latest one when unset
    #[arg(long, requires = "from_cache")]
    snapshot: Option<String>,

    /// Do not write a snapshot after recomputing
    #[arg(long)]
    no_save: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every pair of the languages listed in a file (one ISO 639-3 code per line)
    Score {
        #[arg(default_value = "languages.txt")]
        languages: PathBuf,

        #[arg(long, default_value = "wals")]
        method: Method,
    },
    /// Score of one language pair
    Query {
        first: String,
        second: String,

        /// Registry codes preferred for ambiguous ISO codes
        #[arg(long = "prefer", value_delimiter = ',')]
        preferences: Vec<String>,
    },
    /// List cached snapshots
    Snapshots {
        /// Only snapshots whose name starts with this method prefix
        #[arg(long)]
        method: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting walsim v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let mut config = match &args.config {
        Some(path) => SimilarityConfig::from_json_file(path)?,
        None => SimilarityConfig::default(),
    };
    if let Some(dir) = &args.cache_dir {
        config.cache.dir = dir.clone();
    }
    if args.from_cache {
        config.cache.load_from_cache = true;
        config.cache.snapshot = args.snapshot.clone();
    }
    if args.no_save {
        config.cache.save_to_cache = false;
    }
    config.validate()?;
    info!("Cache directory: {:?}", config.cache.dir);

    match args.command {
        Command::Score { languages, method } => {
            let languages = walsim::load_languages_of_interest(&languages)?;
            let mode = if config.cache.load_from_cache {
                EvaluationMode::LoadFromCache {
                    snapshot: config.cache.snapshot.clone(),
                }
            } else {
                EvaluationMode::Evaluate
            };
            // --from-cache selects the evaluator table, not the full table
            config.cache.load_from_cache = false;
            config.cache.snapshot = None;

            let registry = MethodRegistry::with_defaults(MethodContext::new(args.data_dir.clone(), config));
            let evaluator = Evaluator::new(&registry, method, languages, mode)?;
            for (pair, score) in evaluator.scores().iter() {
                println!("{}\t{}\t{:.6}", pair.first(), pair.second(), score);
            }
            if let Some(snapshot) = evaluator.snapshot() {
                info!("Saved snapshot {}", snapshot.name);
            }
        }
        Command::Query {
            first,
            second,
            preferences,
        } => {
            if !preferences.is_empty() {
                config.preferences = preferences;
            }
            let store = FeatureStore::load(&args.data_dir)?;
            let service = SimilarityService::new(store, config, Scope::All)?;
            let score = service.evaluate_score(&first, &second)?;
            println!("{first}\t{second}\t{score:.6}");
        }
        Command::Snapshots { method } => {
            let cache = ScoreCache::new(&config.cache.dir)?;
            let snapshots = cache.list_snapshots(method.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
        }
    }

    Ok(())
}
