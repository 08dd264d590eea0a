//! ff5 CLI binary.
//!
//! Interactive dashboard and one-shot commands for the Fama-French
//! five-factor model.

mod config;
mod dashboard;
mod logging;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use ff5::PredictionSession;
use ff5_data::DataSet;
use ff5_model::{Factor, FactorInputs, FactorModel};
use ff5_output::{
    CoefficientExport, ExportFormat, Exporter, FittedPointExport, RegressionSummary,
    ReportBuilder,
};
use logging::LogTarget;
use serde_json::json;

#[derive(Debug, Parser)]
#[command(name = "ff5")]
#[command(about = "Fama-French 5 Factor Model: predict a stock's excess return", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding fama_french_5_factor_rets.csv and yahoo_rets.csv
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Factor returns CSV (overrides --data-dir)
    #[arg(long, global = true)]
    factors_file: Option<PathBuf>,

    /// Stock returns CSV (overrides --data-dir)
    #[arg(long, global = true)]
    returns_file: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive terminal dashboard (default)
    Dashboard {
        /// Stock selected at start
        #[arg(long)]
        stock: Option<String>,
    },

    /// List selectable stocks
    Stocks,

    /// Predict the excess return of a stock for given factor values
    Predict {
        /// Stock symbol
        symbol: String,

        #[command(flatten)]
        inputs: InputArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print regression diagnostics for a stock
    Summary {
        /// Stock symbol
        symbol: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,
    },

    /// Export coefficients or the fitted series of a stock
    Export {
        /// Stock symbol
        symbol: String,

        /// Output file
        #[arg(long, short)]
        output: PathBuf,

        /// What to export
        #[arg(long, value_enum, default_value_t = ExportKind::Coefficients)]
        kind: ExportKind,

        /// File format
        #[arg(long, value_enum, default_value_t = FileFormat::Csv)]
        format: FileFormat,
    },
}

/// Factor values; unset ones come from the configuration.
#[derive(Debug, clap::Args)]
struct InputArgs {
    /// Market excess return
    #[arg(long, allow_negative_numbers = true)]
    mkt_rf: Option<f64>,

    /// Size factor
    #[arg(long, allow_negative_numbers = true)]
    smb: Option<f64>,

    /// Value factor
    #[arg(long, allow_negative_numbers = true)]
    hml: Option<f64>,

    /// Profitability factor
    #[arg(long, allow_negative_numbers = true)]
    rmw: Option<f64>,

    /// Investment factor
    #[arg(long, allow_negative_numbers = true)]
    cma: Option<f64>,
}

impl InputArgs {
    fn values(&self) -> [(Factor, Option<f64>); 5] {
        [
            (Factor::MarketExcess, self.mkt_rf),
            (Factor::Smb, self.smb),
            (Factor::Hml, self.hml),
            (Factor::Rmw, self.rmw),
            (Factor::Cma, self.cma),
        ]
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SummaryFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportKind {
    Coefficients,
    Fitted,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FileFormat {
    Csv,
    Json,
    PrettyJson,
}

impl From<FileFormat> for ExportFormat {
    fn from(format: FileFormat) -> Self {
        match format {
            FileFormat::Csv => Self::Csv,
            FileFormat::Json => Self::Json,
            FileFormat::PrettyJson => Self::PrettyJson,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or(Commands::Dashboard { stock: None });

    let target = match command {
        Commands::Dashboard { .. } => LogTarget::dashboard(),
        _ => LogTarget::Stderr,
    };
    logging::init(cli.verbose, target)?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.override_paths(cli.data_dir.as_deref(), cli.factors_file, cli.returns_file);

    let data = DataSet::load(&config.data)?;
    let session = PredictionSession::new(data, config.bounds)?.with_inputs(config.inputs)?;

    match command {
        Commands::Dashboard { stock } => {
            let mut session = session;
            if let Some(symbol) = stock {
                session.select(&symbol)?;
            }
            dashboard::run(session)?;
        }
        Commands::Stocks => print!("{}", list_stocks(&session)?),
        Commands::Predict {
            symbol,
            inputs,
            format,
        } => print!("{}", predict(session, &symbol, &inputs, format)?),
        Commands::Summary { symbol, format } => print!("{}", summary(session, &symbol, format)?),
        Commands::Export {
            symbol,
            output,
            kind,
            format,
        } => println!("{}", export(session, &symbol, &output, kind, format.into())?),
    }

    Ok(())
}

fn list_stocks(session: &PredictionSession) -> Result<String, Box<dyn std::error::Error>> {
    let returns = session.data().returns();
    let mut out = String::new();

    writeln!(out, "\nStocks: {}", session.stocks().len())?;
    writeln!(out, "{}", "=".repeat(40))?;
    writeln!(out, "{:<20} {:>12}", "Symbol", "Observations")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for symbol in session.stocks() {
        writeln!(out, "{:<20} {:>12}", symbol, returns.observation_count(symbol)?)?;
    }

    Ok(out)
}

/// Select `symbol` and fit it.
fn fit<'a>(
    session: &'a mut PredictionSession,
    symbol: &str,
) -> Result<&'a FactorModel, Box<dyn std::error::Error>> {
    session.select(symbol)?;
    Ok(session.model()?)
}

fn predict(
    mut session: PredictionSession,
    symbol: &str,
    args: &InputArgs,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    for (factor, value) in args.values() {
        if let Some(value) = value {
            session.set_input(factor, value)?;
        }
    }
    let inputs: FactorInputs = *session.inputs();

    let model = fit(&mut session, symbol)?;
    let report = ReportBuilder::new().model(model).inputs(inputs).build()?;

    Ok(match format {
        OutputFormat::Text => report.to_text(),
        OutputFormat::Json => format!("{}\n", report.to_json()?),
    })
}

fn summary(
    mut session: PredictionSession,
    symbol: &str,
    format: SummaryFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let model = fit(&mut session, symbol)?;
    let summary = RegressionSummary::from_model(model);

    Ok(match format {
        SummaryFormat::Text => summary.to_ascii_table(),
        SummaryFormat::Markdown => summary.to_markdown(),
        SummaryFormat::Json => format!("{}\n", serde_json::to_string_pretty(&summary)?),
    })
}

/// Write the export file and describe it as a JSON line.
fn export(
    mut session: PredictionSession,
    symbol: &str,
    output: &Path,
    kind: ExportKind,
    format: ExportFormat,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let model = fit(&mut session, symbol)?;

    let rows = match kind {
        ExportKind::Coefficients => {
            let rows = CoefficientExport::from_model(model);
            rows.export_to_file(output, format)?;
            rows.len()
        }
        ExportKind::Fitted => {
            let rows = FittedPointExport::from_model(model);
            rows.export_to_file(output, format)?;
            rows.len()
        }
    };

    tracing::info!(symbol, path = %output.display(), rows, "export written");
    Ok(json!({
        "symbol": symbol,
        "output": output.display().to_string(),
        "format": format.extension(),
        "rows": rows,
    }))
}
