//! hostdb-collector-vrops: collect vROps inventory into HostDB

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vrops_client::{TransportOptions, VropsClient};
use vrops_inventory::{Collector, FileSink, HostDbSink, Sink, authenticate};

mod config;

use config::{CollectorConfig, Config, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "hostdb-collector-vrops")]
#[command(about = "Collect vROps inventory and store it in HostDB", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    debug: bool,

    /// Write record sets as JSON files instead of sending them to HostDB;
    /// DIR defaults to collector.sample_data_dir
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    sample_data: Option<Option<PathBuf>>,
}

impl Cli {
    /// Command-line flags take precedence over file and environment values
    fn apply(&self, config: &mut Config) {
        if self.debug {
            config.collector.debug = true;
        }
        if let Some(dir) = &self.sample_data {
            config.collector.sample_data = true;
            if let Some(dir) = dir {
                config.collector.sample_data_dir.clone_from(dir);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let path = config::locate(cli.config.as_deref())?;
    let mut config = Config::load(&path)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    cli.apply(&mut config);
    config.validate()?;

    init_tracing(&config.collector);

    info!(path = %path.display(), "configuration loaded");
    debug!(?config);

    let options = config.transport_options();
    let client = VropsClient::with_options(&config.vrops.host, &options)
        .wrap_err_with(|| format!("invalid vrops.host: {}", config.vrops.host))?;
    let client = authenticate(client, &config.vrops.login(), config.vrops.pass.expose()).await?;

    let sink = build_sink(&config, &options)?;
    info!(sink = sink.sink_type(), "sink ready");

    let collector = Collector::new(Arc::new(client), sink, config.collector_settings());
    let summary = collector.run().await?;

    info!(
        adapters = summary.adapters_seen,
        collected = summary.adapters_collected,
        skipped = summary.adapters_skipped,
        records = summary.records,
        pages_skipped = summary.pages_skipped,
        resources_skipped = summary.resources_skipped,
        "run complete"
    );

    Ok(())
}

/// `RUST_LOG` wins; otherwise `debug` or the configured level
fn init_tracing(collector: &CollectorConfig) {
    let level = if collector.debug {
        "debug"
    } else {
        collector.log_level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match collector.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn build_sink(config: &Config, options: &TransportOptions) -> Result<Arc<dyn Sink>> {
    if config.collector.sample_data {
        return Ok(Arc::new(FileSink::new(&config.collector.sample_data_dir)));
    }

    let mut sink = HostDbSink::new(&config.hostdb.url, options.build_client()?)
        .wrap_err_with(|| format!("invalid hostdb.url: {}", config.hostdb.url))?;
    if !config.hostdb.user.is_empty() {
        sink = sink.with_basic_auth(&config.hostdb.user, config.hostdb.pass.expose());
    }

    Ok(Arc::new(sink))
}
