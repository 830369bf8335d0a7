use anyhow::{Context, Result};
use clap::Parser;
use readiness_cache::AnalysisCacheStore;
use readiness_cli::paths::resolve_extension_paths;
use readiness_cli::report::{build_report, render_json, render_text};
use readiness_cli::{discovery, Cli, Commands, Config, OutputFormat};
use readiness_core::{cache_subdir, AnalysisContext};
use readiness_pipeline::{CachedAnalyzer, LinesOfCodeAnalyzer, Pipeline, RefactorAnalyzer, RefactorTarget, RunnableAnalyzer, VersionAvailabilityAnalyzer};
use readiness_registry_client::{HttpRegistryClient, PackageRegistryClient};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const DEFAULT_REGISTRY_PRIMARY: &str = "https://extensions.typo3.org";
const DEFAULT_REGISTRY_SECONDARY: &str = "https://packagist.org";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            target,
            current,
            format,
            config,
        } => run_analyze(path, target, current, format, config).await,
    }
}

async fn run_analyze(path: String, target: Option<String>, current: Option<String>, format: OutputFormat, config_path: Option<String>) -> Result<()> {
    let config = Config::load_or_default(config_path.as_ref().map(PathBuf::from).as_deref());

    let installation_path = PathBuf::from(config.installation.path.clone().unwrap_or(path));
    let target_version = match target.or(config.installation.target_version.clone()) {
        Some(v) => v.parse().context("invalid --target version")?,
        None => anyhow::bail!("target platform version must be supplied via --target or the config file"),
    };
    let current_version = match current.or(config.installation.current_version.clone()) {
        Some(v) => v.parse().context("invalid --current version")?,
        None => anyhow::bail!("current platform version must be supplied via --current or the config file"),
    };

    let mut context = AnalysisContext::new(current_version, target_version, installation_path.clone());
    if let Some(enabled) = config.cache.enabled {
        context.result_cache.enabled = enabled;
    }
    if let Some(ttl_s) = config.cache.ttl_s {
        context.result_cache.ttl_s = ttl_s;
    }

    let extensions = discovery::discover_extensions(&installation_path);
    tracing::info!(count = extensions.len(), "discovered extensions");

    resolve_extension_paths(
        &extensions,
        &installation_path,
        config.installation.installation_kind(),
        context.target_version.major(),
        &mut context,
    );

    let cache_store = Arc::new(Mutex::new(AnalysisCacheStore::open(cache_subdir("analysis-results"))?));

    let primary: Arc<dyn PackageRegistryClient> = Arc::new(HttpRegistryClient::new(
        config.analysis.registry_primary_url.clone().unwrap_or_else(|| DEFAULT_REGISTRY_PRIMARY.to_string()),
    ));
    let secondary: Arc<dyn PackageRegistryClient> = Arc::new(HttpRegistryClient::new(
        config.analysis.registry_secondary_url.clone().unwrap_or_else(|| DEFAULT_REGISTRY_SECONDARY.to_string()),
    ));

    let refactor_binary = config.refactor.binary_path.clone().unwrap_or_else(|| "rector".to_string());
    let work_dir = cache_subdir("refactor-work");

    let analyzers: Vec<Arc<dyn RunnableAnalyzer>> = vec![
        Arc::new(CachedAnalyzer::new(VersionAvailabilityAnalyzer::new(primary, secondary), cache_store.clone())),
        Arc::new(CachedAnalyzer::new(LinesOfCodeAnalyzer::new(), cache_store.clone())),
        Arc::new(CachedAnalyzer::new(
            RefactorAnalyzer::new(refactor_binary.clone(), work_dir.clone(), RefactorTarget::Code),
            cache_store.clone(),
        )),
        Arc::new(CachedAnalyzer::new(
            RefactorAnalyzer::new(refactor_binary, work_dir, RefactorTarget::TemplatesAndConfig),
            cache_store,
        )),
    ];

    let max_concurrency = config.analysis.max_concurrency.unwrap_or_else(|| num_cpus::get().min(extensions.len().max(1)));

    let mut pipeline = Pipeline::new().with_max_concurrency(max_concurrency);
    for analyzer in analyzers {
        pipeline = pipeline.with_analyzer(analyzer);
    }

    let extension_reports = pipeline.run_all(&extensions, &context).await;
    let report = build_report(extension_reports);

    match format {
        OutputFormat::Text => println!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&render_json(&report))?),
    }

    Ok(())
}
