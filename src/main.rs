use anyhow::Context;
use clap::Parser;
use flare_catalog::app::catalog_use_case::{CatalogRequest, CatalogUseCase};
use flare_catalog::config::Config;
use flare_catalog::infra::catalog_loader::load_catalog;
use flare_catalog::infra::csv_sink::AppendFileSink;
use flare_catalog::infra::hek_event_source::HekEventSource;
use flare_catalog::infra::http_client::ReqwestHttp;
use flare_catalog::infra::jsoc_client::JsocClient;
use flare_catalog::logging;
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[derive(Parser)]
#[command(name = "flare_catalog")]
#[command(
    about = "Determine flare class, level, peak time and Carrington position of the flaring active region"
)]
#[command(version = "0.1.0")]
struct Cli {
    /// Start time, e.g.: 2014/10/30 04:25
    #[arg(short = 'a', long = "t_start", visible_alias = "t-start")]
    t_start: String,

    /// End time, e.g.: 2015/06/06 00:00
    #[arg(short = 'b', long = "t_end", visible_alias = "t-end")]
    t_end: String,

    /// Minimum GOES X-ray flux flare classification, e.g.: X2
    #[arg(short = 'c', long = "min_flare_class", visible_alias = "min-flare-class")]
    min_flare_class: String,

    /// Maximum GOES X-ray flux flare classification, e.g.: X9
    #[arg(short = 'd', long = "max_flare_class", visible_alias = "max-flare-class")]
    max_flare_class: String,

    /// Output file to append to
    #[arg(short = 'e', long)]
    ofile: String,

    /// Path to a TOML config file (defaults to ./flare_catalog.toml when present)
    #[arg(long)]
    config: Option<String>,

    /// HARP/NOAA table, URL or local path (overrides config)
    #[arg(long)]
    catalog: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let _guard = logging::init_logging(&config.logging.directory, &config.logging.file_prefix);

    // Bad classes or times abort before anything is fetched or written
    let request = CatalogRequest::parse(
        &cli.t_start,
        &cli.t_end,
        &cli.min_flare_class,
        &cli.max_flare_class,
    )?;

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("catalog_run", %run_id);

    async move {
        let http = Arc::new(ReqwestHttp::new(config.services.request_timeout())?);

        let catalog_source = cli
            .catalog
            .as_deref()
            .unwrap_or(&config.services.catalog_source);
        let catalog = load_catalog(catalog_source, http.as_ref())
            .await
            .with_context(|| format!("loading region catalog from {}", catalog_source))?;

        let events = Arc::new(HekEventSource::new(
            http.clone(),
            &config.services.event_search_url,
            config.services.event_page_size,
            config.services.max_event_pages,
        ));
        let coordinates = Arc::new(JsocClient::new(http.clone(), &config.services.coordinate_url));
        let use_case = CatalogUseCase::new(events, coordinates, &config.services.coordinate_series);

        let ofile = cli.ofile.clone();
        let summary = use_case
            .run(&request, catalog, || AppendFileSink::open(&ofile))
            .await
            .map_err(|e| {
                error!("Catalog run failed: {}", e);
                e
            })?;

        info!(
            total = summary.total_events,
            selected = summary.selected_events,
            written = summary.rows_written(),
            "Catalog run finished"
        );
        println!("\n📊 Catalog results:");
        println!("   Flares returned: {}", summary.total_events);
        println!("   In class range: {}", summary.selected_events);
        println!("   Rows written: {}", summary.rows_written());
        for (reason, count) in &summary.skipped {
            println!("   Skipped ({}): {}", reason, count);
        }
        println!("   Output file: {}", cli.ofile);
        anyhow::Ok(())
    }
    .instrument(span)
    .await
}
