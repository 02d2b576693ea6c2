//! Frequência CLI - attendance summaries from employee attendance sheets
//!
//! # Main Commands
//!
//! ```bash
//! frequencia summary frequencia.csv             # Summary table on stdout
//! frequencia summary frequencia.xlsx --json     # Full report as JSON
//! frequencia export frequencia.csv              # relatorio_frequencia.xlsx + .pdf
//! frequencia cards frequencia.csv -o cards.html # HTML card grid
//! frequencia chart frequencia.csv -o chart.svg  # SVG bar charts
//! frequencia serve                              # Start HTTP server (port 3000)
//! ```

use clap::{Parser, Subcommand};
use frequencia::{
    config, init_cli_logger, paginate, server::start_server, summarize_file, AppConfig,
    CardRenderer, CardView, ChartRenderer, DenominatorPolicy, Report,
};
use std::fs;
use std::path::{Path, PathBuf};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "frequencia")]
#[command(about = "Summarize employee attendance sheets", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = config::CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the per-employee summary
    Summary {
        /// Attendance sheet (.csv, .txt, .xlsx)
        input: PathBuf,

        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,

        /// Total-days policy: worked | all_categories
        #[arg(short, long)]
        policy: Option<DenominatorPolicy>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the spreadsheet and PDF reports
    Export {
        /// Attendance sheet (.csv, .txt, .xlsx)
        input: PathBuf,

        /// Spreadsheet output path
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// PDF output path
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Total-days policy: worked | all_categories
        #[arg(short, long)]
        policy: Option<DenominatorPolicy>,
    },

    /// Render the HTML card grid
    Cards {
        /// Attendance sheet (.csv, .txt, .xlsx)
        input: PathBuf,

        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,

        /// Grid columns (1-6)
        #[arg(short, long)]
        columns: Option<usize>,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the SVG bar charts
    Chart {
        /// Attendance sheet (.csv, .txt, .xlsx)
        input: PathBuf,

        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default from config, 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    let result = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, mut config: AppConfig) -> CliResult {
    match command {
        Commands::Summary {
            input,
            filter,
            policy,
            json,
        } => {
            if let Some(policy) = policy {
                config.report.denominator = policy;
            }
            cmd_summary(&input, &config, filter.as_deref(), json)
        }

        Commands::Export {
            input,
            xlsx,
            pdf,
            policy,
        } => {
            if let Some(policy) = policy {
                config.report.denominator = policy;
            }
            cmd_export(&input, &config, xlsx.as_deref(), pdf.as_deref())
        }

        Commands::Cards {
            input,
            filter,
            columns,
            page,
            output,
        } => {
            if let Some(columns) = columns {
                config::validate_columns(columns)?;
                config.display.columns = columns;
            }
            cmd_cards(&input, &config, filter.as_deref(), page, output.as_deref())
        }

        Commands::Chart {
            input,
            filter,
            output,
        } => cmd_chart(&input, &config, filter.as_deref(), output.as_deref()),

        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            start_server(config).await
        }
    }
}

fn cmd_summary(input: &Path, config: &AppConfig, filter: Option<&str>, json: bool) -> CliResult {
    let report = summarize_file(input, config, filter)?;

    if json {
        let json = serde_json::to_string_pretty(&report)?;
        return write_output(&json, None);
    }

    print_source(&report);
    write_output(&format_table(&report), None)
}

fn cmd_export(input: &Path, config: &AppConfig, xlsx: Option<&Path>, pdf: Option<&Path>) -> CliResult {
    let report = summarize_file(input, config, None)?;

    // neither flag: write both with the default names
    let (xlsx, pdf) = match (xlsx, pdf) {
        (None, None) => (
            Some(Path::new(config::XLSX_FILE_NAME)),
            Some(Path::new(config::PDF_FILE_NAME)),
        ),
        other => other,
    };

    if let Some(path) = xlsx {
        fs::write(path, report.to_xlsx()?)?;
        eprintln!("Spreadsheet written to: {}", path.display());
    }
    if let Some(path) = pdf {
        fs::write(path, report.to_pdf()?)?;
        eprintln!("PDF written to: {}", path.display());
    }

    Ok(())
}

fn cmd_cards(
    input: &Path,
    config: &AppConfig,
    filter: Option<&str>,
    page: usize,
    output: Option<&Path>,
) -> CliResult {
    let report = summarize_file(input, config, filter)?;

    let views: Vec<CardView> = report.display_rows().into_iter().map(CardView::from).collect();
    let page = paginate(&views, page, config.display.page_size);
    let html = CardRenderer::new(config.display.columns).render(&page);

    write_output(&html, output)
}

fn cmd_chart(input: &Path, config: &AppConfig, filter: Option<&str>, output: Option<&Path>) -> CliResult {
    let report = summarize_file(input, config, filter)?;
    let svg = ChartRenderer::new().render(&report.display_rows())?;

    write_output(&svg, output)
}

fn print_source(report: &Report) {
    let source = &report.source;
    eprintln!("   File: {}", source.file_name);
    if let Some(encoding) = &source.encoding {
        eprintln!("   Encoding: {}", encoding);
    }
    if let Some(delimiter) = source.delimiter {
        eprintln!("   Delimiter: '{}'", format_delimiter(delimiter));
    }
    eprintln!("   Rows: {}", source.row_count);
    eprintln!("   Date columns: {}", report.summary.date_columns);
    if !source.redacted_columns.is_empty() {
        eprintln!("   Removed: {}", source.redacted_columns.join(", "));
    }
    if !source.skipped_rows.is_empty() {
        eprintln!("   Skipped rows without name: {}", source.skipped_rows.len());
    }
    eprintln!("   Policy: {}", report.summary.policy.as_str());
}

/// Plain-text table of the display rows.
fn format_table(report: &Report) -> String {
    let headers = report.summary.headers();
    let rows: Vec<Vec<String>> = report
        .display_rows()
        .into_iter()
        .map(|row| {
            let mut cells = vec![row.employee_name.clone()];
            cells.extend(report.summary.status_columns.iter().map(|s| row.count(s).to_string()));
            cells.push(row.total_days.to_string());
            cells.push(frequencia::format_percent(row.attendance_percent));
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|i| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(headers[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(&headers)];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    out.extend(rows.iter().map(|r| line(r)));
    out.join("\n")
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
