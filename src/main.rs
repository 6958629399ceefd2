use anyhow::Context;
use clap::{Parser, ValueEnum};
use smartsimilar::{parse_catalog, render_sql, EngineConfig, RankedResult, ScanOrder, SimilarityEngine, SqlTarget, StrategyKind};
use smartsimilar_similarity::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_ITERATIONS, DEFAULT_PACKING_FACTOR};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Storefront database statements
    Sql,
    /// JSON array of {"id", "similar"} objects
    Json,
}

/// Compute "you may also like" lists for a storefront catalog export
#[derive(Parser, Debug)]
#[command(name = "smartsimilar")]
#[command(about = "Similar product recommendations for eyewear catalogs", long_about = None)]
struct Args {
    /// Tab-delimited catalog export, `-` reads stdin
    #[arg(default_value = "-")]
    input: String,

    /// Similar products per record (1-8)
    #[arg(short = 'k', long, default_value_t = 5, allow_negative_numbers = true)]
    similar_count: i64,

    /// Ranking strategy: exact or clustered
    #[arg(long, default_value = "exact")]
    strategy: StrategyKind,

    /// Candidate scan order of the exact strategy: batch or id
    #[arg(long, default_value = "batch")]
    scan_order: ScanOrder,

    /// Records per parallel step of the exact strategy
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Average cluster size relative to K for the clustered strategy
    #[arg(long, default_value_t = DEFAULT_PACKING_FACTOR)]
    packing_factor: usize,

    /// Seed for reproducible clustered runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Sql)]
    format: OutputFormat,

    /// Property id receiving the similar products list
    #[arg(long, default_value_t = 122)]
    property_id: u32,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level, overridden per target by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            strategy: self.strategy,
            chunk_size: self.chunk_size,
            scan_order: self.scan_order,
            packing_factor: self.packing_factor,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: self.seed,
        }
    }

    fn sql_target(&self) -> SqlTarget {
        SqlTarget {
            property_id: self.property_id,
            ..SqlTarget::default()
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// RUST_LOG directives win, `--log-level` is the default for everything else
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(parse_level(level)).into())
        .from_env_lossy()
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading catalog export {}", input))
    }
}

fn render(results: &[RankedResult], args: &Args) -> anyhow::Result<String> {
    match args.format {
        OutputFormat::Sql => Ok(render_sql(results, &args.sql_target())),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    let text = read_input(&args.input)?;
    let catalog = parse_catalog(&text)?;
    if !catalog.rejected.is_empty() {
        warn!("{} catalog rows were rejected", catalog.rejected.len());
    }
    info!("Loaded {} {} records", catalog.records.len(), catalog.domain);

    let config = args.engine_config();
    info!("Engine config: {}", serde_json::to_string(&config)?);

    let engine = SimilarityEngine::new(config);
    let results = engine.run(&catalog.records, args.similar_count)?;
    render(&results, args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(&args.log_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting SmartSimilar v{}", env!("CARGO_PKG_VERSION"));

    let output = args.output.clone();
    let batch = tokio::task::spawn_blocking(move || run(&args));

    // The batch is atomic: an interrupt discards it and writes nothing
    let rendered = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, no output written");
            std::process::exit(130);
        }
        joined = batch => joined??,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered).with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote results to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_log_filter_defaults_to_level() {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return;
        }
        assert_eq!(log_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter("warn").max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_args_accept_negative_similar_count() {
        let args = Args::try_parse_from(["smartsimilar", "export.tsv", "-k", "-3", "--log-level", "debug"]).unwrap();
        assert_eq!(args.similar_count, -3);
        assert_eq!(args.log_level, "debug");
    }
}
