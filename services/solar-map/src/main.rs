//! Solar Map CLI
//!
//! Builds a classified irradiation marker map from a delimited table.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use solar_common::{DecimalSeparator, SolarMapError};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use solar_map::{
    render_legend, render_preview, render_summary, write_output, AppConfig, ConfigOverrides,
    InputSource, LegendFormat,
};

/// Log output format.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

/// Solar irradiation map generator
#[derive(Parser, Debug)]
#[command(name = "solar-map")]
#[command(about = "Plot annual solar irradiation points as a classified marker map")]
struct Args {
    /// Input table (CSV or similar), `-` for stdin
    #[arg(env = "SOLAR_MAP_INPUT", required_unless_present = "list_schemes")]
    input: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, env = "SOLAR_MAP_CONFIG")]
    config: Option<PathBuf>,

    /// Classification scheme name
    #[arg(short, long, env = "SOLAR_MAP_SCHEME")]
    scheme: Option<String>,

    /// Extra scheme file (YAML or JSON); may be repeated
    #[arg(long = "scheme-file")]
    scheme_files: Vec<PathBuf>,

    /// List available schemes and exit
    #[arg(long)]
    list_schemes: bool,

    /// Write the map document here instead of stdout
    #[arg(short, long, env = "SOLAR_MAP_OUTPUT")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON document
    #[arg(long)]
    pretty: bool,

    /// How to print the legend on stderr
    #[arg(long, value_enum, default_value = "table", env = "SOLAR_MAP_LEGEND_FORMAT")]
    legend_format: LegendFormat,

    /// Number of legend steps for continuous schemes
    #[arg(long)]
    legend_steps: Option<usize>,

    /// Print the first N rows as read before processing
    #[arg(long, default_value_t = 0)]
    preview: usize,

    /// Field delimiter; sniffed when omitted
    #[arg(short, long, env = "SOLAR_MAP_DELIMITER")]
    delimiter: Option<char>,

    /// Decimal mark in numeric cells: point or comma
    #[arg(long, value_parser = parse_decimal, env = "SOLAR_MAP_DECIMAL")]
    decimal: Option<DecimalSeparator>,

    /// Longitude column name
    #[arg(long)]
    lon_column: Option<String>,

    /// Latitude column name
    #[arg(long)]
    lat_column: Option<String>,

    /// Annual irradiation column name
    #[arg(long)]
    value_column: Option<String>,

    /// Match column names ignoring case
    #[arg(long)]
    ignore_header_case: bool,

    /// Absolute longitude bound
    #[arg(long)]
    lon_bound: Option<f64>,

    /// Absolute latitude bound
    #[arg(long)]
    lat_bound: Option<f64>,

    /// Maximum divisions by ten per coordinate
    #[arg(long)]
    max_divisions: Option<u32>,

    /// Use 180 on both axes with at most two divisions
    #[arg(long)]
    legacy_bounds: bool,

    /// Marker popup text; `{value}` is replaced with the irradiation
    #[arg(long, env = "SOLAR_MAP_POPUP")]
    popup: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log format
    #[arg(long, value_enum, default_value = "pretty", env = "SOLAR_MAP_LOG_FORMAT")]
    log_format: LogFormat,
}

fn parse_decimal(s: &str) -> std::result::Result<DecimalSeparator, String> {
    DecimalSeparator::parse(s).ok_or_else(|| format!("expected 'point' or 'comma', got '{}'", s))
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            scheme: self.scheme.clone(),
            scheme_files: self.scheme_files.clone(),
            delimiter: self.delimiter,
            decimal: self.decimal,
            longitude_column: self.lon_column.clone(),
            latitude_column: self.lat_column.clone(),
            value_column: self.value_column.clone(),
            case_insensitive_headers: self.ignore_header_case,
            longitude_bound: self.lon_bound,
            latitude_bound: self.lat_bound,
            max_divisions: self.max_divisions,
            legacy_bounds: self.legacy_bounds,
            legend_steps: self.legend_steps,
            popup_template: self.popup.clone(),
        }
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let failure = Failure::from_error(&e);
            if failure.user_error {
                warn!(
                    error = %format!("{:#}", e),
                    error_code = failure.error_code,
                    exit_code = failure.exit_code,
                    "Input rejected"
                );
            } else {
                error!(
                    error = %format!("{:#}", e),
                    error_code = failure.error_code,
                    exit_code = failure.exit_code,
                    "Map generation failed"
                );
            }
            eprintln!("error [{}]: {:#}", failure.error_code, e);
            ExitCode::from(failure.exit_code.clamp(1, 255) as u8)
        }
    }
}

/// How a failed run is reported.
#[derive(Debug, PartialEq, Eq)]
struct Failure {
    error_code: &'static str,
    exit_code: i32,
    user_error: bool,
}

impl Failure {
    fn from_error(e: &anyhow::Error) -> Self {
        match e.downcast_ref::<SolarMapError>() {
            Some(err) => Self {
                error_code: err.error_code(),
                exit_code: err.exit_code(),
                user_error: err.is_user_error(),
            },
            None => Self {
                error_code: "NoApplicableCode",
                exit_code: 1,
                user_error: false,
            },
        }
    }
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the document, so logs go to stderr
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn execute(args: &Args) -> Result<()> {
    let mut config =
        AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(args.overrides());

    if args.list_schemes {
        let schemes = config.scheme_config()?;
        for name in schemes.names() {
            let description = schemes
                .get(name)
                .map(|s| s.description.as_str())
                .unwrap_or_default();
            println!("{:<16} {}", name, description);
        }
        return Ok(());
    }

    let input_path = args.input.as_deref().context("No input table given")?;
    config.validate()?;

    info!(input = %input_path.display(), scheme = %config.scheme, "Starting map generation");

    let input = InputSource::from_arg(input_path);
    let table = solar_map::load_table(&config, &input)
        .with_context(|| format!("Failed to load {}", input_path.display()))?;

    if args.preview > 0 {
        eprint!("{}", render_preview(&table, args.preview));
    }

    let run = solar_map::build_map(&config, table)?;

    let document = run.document(input.name());
    write_output(&document.to_json(args.pretty)?, args.output.as_deref())?;

    if let Some(legend) = render_legend(&run.layer.legend, args.legend_format)? {
        eprintln!("{}", legend);
    }
    eprintln!("{}", render_summary(&run.layer.summary));

    Ok(())
}
