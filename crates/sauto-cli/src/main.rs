mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::output::JsonLinesSink;

#[derive(Debug, Parser)]
#[command(name = "sauto-cli")]
#[command(about = "Paginated, filtered crawler for the sauto.cz listing API")]
struct Cli {
    /// Crawl parameter file (overrides SAUTO_PARAMS_PATH).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Output file for emitted records, one JSON document per line
    /// (overrides SAUTO_OUTPUT_PATH; defaults to stdout).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = sauto_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let params_path = cli.params.unwrap_or_else(|| config.params_path.clone());
    let crawl_params = sauto_core::load_crawl_params(&params_path)?;

    let audit = sauto_crawler::LineAudit::append_to(&config.audit_log_path)?;
    let client = sauto_crawler::SautoClient::new(
        &config.search_url,
        &config.detail_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?
    .with_audit(Arc::new(audit));

    let crawler = sauto_crawler::Crawler::new(
        client,
        crawl_params.filter,
        config.listing_url.as_str(),
        config.max_concurrent_details,
        config.inter_page_delay_ms,
    );

    let output_path = cli.output.or_else(|| config.output_path.clone());
    let mut sink = match output_path {
        Some(path) => JsonLinesSink::to_file(&path)?,
        None => JsonLinesSink::to_stdout(),
    };

    let totals = crawler.run(crawl_params.search, &mut sink).await?;
    sink.flush()?;

    tracing::info!(
        pages = totals.pages,
        emitted = totals.emitted,
        filtered_out = totals.filtered_out,
        detail_failures = totals.detail_failures,
        "crawl finished"
    );
    Ok(())
}
