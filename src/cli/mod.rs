use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::application::{DEFAULT_CURRENCY, ReportConfig, ReportService, ReportSettings};
use crate::io::{OutputFormat, write_report, write_report_file};
use crate::remote::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};

/// Splitwise expense summary by category
#[derive(Parser)]
#[command(name = "splitwise-report")]
#[command(about = "Summarize your share of Splitwise expenses by currency and category")]
#[command(version)]
pub struct Cli {
    /// Splitwise API bearer token
    #[arg(long, env = "SPLITWISE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Only include expenses from a specific group
    #[arg(long)]
    pub group_id: Option<i64>,

    /// Only include expenses dated on or after this date (YYYY-MM-DD, defaults to current month)
    #[arg(long)]
    pub dated_after: Option<String>,

    /// Only include expenses dated on or before this date (YYYY-MM-DD, defaults to current month)
    #[arg(long)]
    pub dated_before: Option<String>,

    /// Currency label for expenses without a currency code
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Output format: table, json, csv
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Expenses requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Splitwise API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log to stderr. `RUST_LOG` wins over `--verbose`.
    pub fn init_tracing(&self) {
        let level = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)));

        // A subscriber may already be installed when embedded in tests.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    pub fn settings(&self) -> ReportSettings {
        ReportSettings {
            token: self.token.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
            page_size: self.page_size,
            group_id: self.group_id,
            dated_after: self.dated_after.clone(),
            dated_before: self.dated_before.clone(),
            currency: self.currency.clone(),
        }
    }

    pub async fn run(self) -> Result<()> {
        // All local validation happens before the first request.
        let format: OutputFormat = self.format.parse()?;
        let config = ReportConfig::resolve(self.settings(), Local::now().date_naive())?;

        let service = ReportService::connect(config.client)?;
        let report = service.generate_report(&config.request).await?;

        match &self.output {
            Some(path) => {
                write_report_file(&report, format, path)?;
                eprintln!("Report written to {}", path.display());
            }
            None => write_report(&report, format, std::io::stdout().lock())?,
        }

        Ok(())
    }
}
