use clap::Parser;
use incident_review::{
    analysis::IncidentAnalyzer,
    config::{parse_review_date, Config},
    report::{ReviewContext, ReviewRenderer},
    victorops::VictorOpsClient,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// On-call incident review generator
#[derive(Parser)]
#[command(name = "incident-review", version)]
#[command(about = "Fetches VictorOps incidents and renders response-time statistics", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Period start date in format DD.MM.YYYY
    #[arg(short, long)]
    start_date: Option<String>,

    /// Period end date in format DD.MM.YYYY
    #[arg(short, long)]
    end_date: Option<String>,

    /// Output file (overrides configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug mode (includes verbose mode)
    #[arg(short, long, conflicts_with = "verbose")]
    debug: bool,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Log level from flags, falling back to the configured level
    fn log_level<'a>(&self, config: &'a Config) -> &'a str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            &config.observability.log_level
        }
    }
}

fn init_tracing(cli: &Cli, config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("incident_review={}", cli.log_level(config)))
    });

    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref()).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(&cli, &config);

    tracing::info!("Starting incident-review v{}", env!("CARGO_PKG_VERSION"));

    // Construct the analyzer first so a malformed holiday list aborts the
    // run before any network I/O.
    let analyzer = IncidentAnalyzer::new(
        config.work_time.start_hour,
        config.work_time.end_hour,
        &config.work_time.holidays,
    )?;

    let client = VictorOpsClient::new(&config.victorops.api_id, &config.victorops.api_key)?;
    tracing::debug!(client = ?client, "VictorOps client ready");

    // Resolve the reporting period; CLI flags take precedence
    let start_date = cli
        .start_date
        .as_deref()
        .or(config.period.start_date.as_deref())
        .ok_or_else(|| incident_review::AppError::Validation(
            "No period start date. Provide -s|--start-date or period.start_date".to_string(),
        ))?;
    let start_date = parse_review_date(start_date)?;

    let end_date = cli
        .end_date
        .as_deref()
        .or(config.period.end_date.as_deref())
        .map(parse_review_date)
        .transpose()?;

    tracing::info!(start = %start_date, end = ?end_date, "Reporting period");

    // Fetch -> annotate -> summarize
    let records = client
        .fetch_incidents(&config.victorops.routing_key, start_date, end_date)
        .await?;

    let annotated = analyzer.annotate(records);
    let summary = analyzer.summarize(&annotated);

    tracing::info!(
        count = summary.count,
        in_work_hours = summary.in_work_hours_count,
        "Analysis complete"
    );

    // Render
    let renderer = match &config.report.template {
        Some(path) => ReviewRenderer::from_template_file(path).await?,
        None => ReviewRenderer::new()?,
    };

    let output = cli.output.unwrap_or_else(|| config.report.output.clone());
    let context = ReviewContext {
        client_name: &config.victorops.client_name,
        period_start: start_date,
        period_end: end_date,
        incidents: &annotated,
        summary: &summary,
    };

    renderer.write_report(&context, &output).await?;

    tracing::info!(path = %output.display(), "Review generated");

    Ok(())
}
