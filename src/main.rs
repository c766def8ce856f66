use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use fcd_stream::adapters::inbound::TraceFile;
use fcd_stream::adapters::outbound::{init_tracing_logger, DryRunPublisher, KafkaAgentPublisher};
use fcd_stream::application::{spawn_interrupt_handler, DeregisterOnce};
use fcd_stream::domains::agents::{AgentPublisher, NodeRegistration};
use fcd_stream::domains::trace::TraceSource;
use fcd_stream::{Config, StreamSettings, TraceStreamService};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status used when the stream is stopped by an interrupt.
const INTERRUPTED: u8 = 130;

#[derive(Parser, Debug)]
#[command(
    name = "fcd-stream",
    about = "Streams a SUMO floating car data trace as cumulative agent batches",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Discovery endpoint (broker bootstrap address)
    #[arg(long)]
    nodesrv: Option<String>,

    /// Wait between timesteps in milliseconds
    #[arg(long)]
    speed: Option<u64>,

    /// Input XML FCD file
    #[arg(long = "in")]
    input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Channel (topic) the batches are published on
    #[arg(long)]
    channel: Option<String>,

    /// Publish person records alongside vehicles
    #[arg(long)]
    include_persons: bool,

    /// Log batches locally instead of connecting to a broker
    #[arg(long)]
    dry_run: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.nodesrv {
            config.discovery.endpoint = endpoint.clone();
        }
        if let Some(speed) = self.speed {
            config.stream.delay_ms = speed;
        }
        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(channel) = &self.channel {
            config.stream.channel = channel.clone();
        }
        if self.include_persons {
            config.stream.include_persons = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Can't load configuration")?;
    cli.apply(&mut config);

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("SumoFCD Convert Provider({})", env!("CARGO_PKG_VERSION"));

    let logger = init_tracing_logger();

    let (publisher, registration) = if cli.dry_run {
        let dry = Arc::new(DryRunPublisher::new(
            config.discovery.node_name.clone(),
            logger.clone(),
        ));
        (
            dry.clone() as Arc<dyn AgentPublisher>,
            dry as Arc<dyn NodeRegistration>,
        )
    } else {
        let kafka = Arc::new(
            KafkaAgentPublisher::register(&config.discovery)
                .await
                .context("Can't register node")?,
        );
        info!(
            "Registered {} via {}, brokers {:?}",
            config.discovery.node_name,
            config.discovery.endpoint,
            kafka.brokers()
        );
        (
            kafka.clone() as Arc<dyn AgentPublisher>,
            kafka as Arc<dyn NodeRegistration>,
        )
    };

    let guard = Arc::new(DeregisterOnce::new(registration, logger.clone()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    spawn_interrupt_handler(guard.clone(), shutdown_tx, logger.clone());

    info!("Starting SumoFCD Convert Provider");

    let source = TraceFile::new(config.input.path.clone());
    let trace = source
        .load_trace()
        .await
        .with_context(|| format!("Can't load trace {}", source.path().display()))?;
    info!(
        "Loaded {} timesteps ({} vehicle and {} person records)",
        trace.len(),
        trace.vehicle_count(),
        trace.person_count()
    );

    let service = TraceStreamService::new(publisher, logger, StreamSettings::from(&config));
    let report = service.run(&trace, shutdown_rx).await;

    guard.deregister().await;

    info!(
        "Published {} of {} timesteps ({} failed), last batch carried {} agents",
        report.published(),
        trace.len(),
        report.failed(),
        report.last_batch_size()
    );

    if report.interrupted {
        warn!("Stream interrupted before the last timestep");
        return Ok(ExitCode::from(INTERRUPTED));
    }

    info!("Done.");
    Ok(ExitCode::SUCCESS)
}
