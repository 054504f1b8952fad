//! Command-line interface for the identification client.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::config::{ClientOptions, Database, BOLD_IDS_URL};
use crate::error::{IdentifyError, Result};
use crate::fasta::read_fasta;
use crate::http::create_client;
use crate::identify::identify_with;
use crate::table::{Table, TableBuilder};
use crate::types::{Identification, RawResponse};

/// bold-identify - Identify COI barcode sequences with BOLD Systems.
#[derive(Parser)]
#[command(name = "bold-identify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify nucleotide sequences against a BOLD database.
    Identify(IdentifyArgs),
}

#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Nucleotide sequences to identify
    pub sequences: Vec<String>,

    /// Read sequences from a FASTA file
    #[arg(short, long)]
    pub fasta: Option<PathBuf>,

    /// Database: COX1, COX1_SPECIES, COX1_SPECIES_PUBLIC or COX1_L604bp
    #[arg(long, default_value_t = Database::default())]
    pub db: Database,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print the unparsed XML response instead of a table
    #[arg(long)]
    pub raw: bool,

    /// Request timeout in seconds (default: wait for the engine)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Identification endpoint
    #[arg(long, default_value = BOLD_IDS_URL)]
    pub base_url: String,

    /// Proxy URL for all requests
    #[arg(long)]
    pub proxy: Option<String>,

    /// Log connection traffic (with RUST_LOG=trace)
    #[arg(long)]
    pub verbose_http: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl IdentifyArgs {
    fn client_options(&self) -> ClientOptions {
        let mut builder = ClientOptions::builder()
            .base_url(self.base_url.as_str())
            .timeout(self.timeout.map(Duration::from_secs))
            .verbose(self.verbose_http)
            .raw_response(self.raw);
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.as_str());
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text, one block per sequence
    Table,
    Json,
    Yaml,
    /// One tab-separated table with a leading `query` column
    Tsv,
    /// One comma-separated table with a leading `query` column
    Csv,
}

/// Outcome for one input sequence, as written to the output.
#[derive(Debug, Serialize)]
pub struct SequenceReport {
    pub label: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Table(Table),
    Raw(RawResponse),
    Error(String),
}

impl From<Result<Identification>> for Outcome {
    fn from(result: Result<Identification>) -> Self {
        match result {
            Ok(Identification::Table(table)) => Self::Table(table),
            Ok(Identification::Raw(raw)) => Self::Raw(raw),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Identify(args) => identify_command(&args),
    }
}

/// Collect labelled sequences from arguments and the FASTA file.
///
/// Positional sequences are labelled `seq1`, `seq2`, ...; FASTA records keep
/// their id, falling back to `fasta1`, `fasta2`, ... for unnamed records.
pub fn collect_inputs(args: &IdentifyArgs) -> Result<Vec<(String, String)>> {
    let mut inputs: Vec<(String, String)> = args
        .sequences
        .iter()
        .enumerate()
        .map(|(i, seq)| (format!("seq{}", i + 1), seq.trim().to_string()))
        .collect();

    if let Some(path) = &args.fasta {
        for (i, record) in read_fasta(path)?.into_iter().enumerate() {
            let label = if record.id.is_empty() {
                format!("fasta{}", i + 1)
            } else {
                record.id
            };
            inputs.push((label, record.sequence));
        }
    }

    if inputs.is_empty() {
        return Err(IdentifyError::EmptyInput);
    }
    Ok(inputs)
}

/// Execute the identify command.
fn identify_command(args: &IdentifyArgs) -> Result<()> {
    let inputs = collect_inputs(args)?;
    let options = args.client_options();

    if !args.db.is_known() {
        tracing::warn!(db = %args.db, "Unknown database selector, sending it anyway");
    }

    let client = create_client(&options)?;

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let total = inputs.len();
    let mut reports = Vec::with_capacity(total);
    for (i, (label, sequence)) in inputs.into_iter().enumerate() {
        pb.set_message(format!("Identifying {label} ({}/{total})...", i + 1));
        let result = identify_with(&client, &sequence, &args.db, &options);
        if let Err(e) = &result {
            tracing::warn!(label = %label, error = %e, "Identification failed");
        }
        reports.push(SequenceReport {
            label,
            outcome: result.into(),
        });
    }
    pb.finish_and_clear();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            console::set_colors_enabled(false);
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };
    write_reports(&mut out, &reports, args.format)?;
    out.flush()?;

    if let Some(path) = &args.output {
        eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
    }

    let failed = reports
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Error(_)))
        .count();
    if failed > 0 {
        return Err(IdentifyError::PartialFailure { failed, total });
    }
    Ok(())
}

/// Write reports in the requested format.
pub fn write_reports<W: Write>(
    out: &mut W,
    reports: &[SequenceReport],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => write_text(out, reports)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => out.write_all(serde_yaml_ng::to_string(reports)?.as_bytes())?,
        OutputFormat::Tsv => combined_table(reports).write_delimited(out, b'\t')?,
        OutputFormat::Csv => combined_table(reports).write_delimited(out, b',')?,
    }
    Ok(())
}

fn write_text<W: Write>(out: &mut W, reports: &[SequenceReport]) -> io::Result<()> {
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        match &report.outcome {
            Outcome::Table(table) => {
                writeln!(
                    out,
                    "{} ({} matches)",
                    style(&report.label).cyan().bold(),
                    table.len()
                )?;
                if !table.is_empty() {
                    writeln!(out, "{}", table.to_text())?;
                }
            }
            Outcome::Raw(raw) => {
                writeln!(
                    out,
                    "{} (HTTP {}, {})",
                    style(&report.label).cyan().bold(),
                    raw.status,
                    raw.url
                )?;
                writeln!(out, "{}", raw.body.trim_end())?;
            }
            Outcome::Error(message) => {
                writeln!(
                    out,
                    "{} {}",
                    style(&report.label).cyan().bold(),
                    style(format!("Error: {message}")).red()
                )?;
            }
        }
    }
    Ok(())
}

/// Merge all reports into a single table with a leading `query` column.
///
/// Raw responses and errors become rows with their own columns; the column
/// union fills everything else with nulls.
pub fn combined_table(reports: &[SequenceReport]) -> Table {
    let mut builder = TableBuilder::with_columns(["query"]);
    for report in reports {
        let query = ("query".to_string(), Some(report.label.clone()));
        match &report.outcome {
            Outcome::Table(table) => {
                for row in table.rows() {
                    builder.push_row(
                        std::iter::once(query.clone())
                            .chain(table.columns().iter().cloned().zip(row.iter().cloned())),
                    );
                }
            }
            Outcome::Raw(raw) => {
                builder.push_row([
                    query,
                    ("status".to_string(), Some(raw.status.to_string())),
                    ("url".to_string(), Some(raw.url.clone())),
                    ("body".to_string(), Some(raw.body.clone())),
                ]);
            }
            Outcome::Error(message) => {
                builder.push_row([query, ("error".to_string(), Some(message.clone()))]);
            }
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchRecord, Specimen};
    use pretty_assertions::assert_eq;

    fn parse_args(extra: &[&str]) -> IdentifyArgs {
        let mut argv = vec!["bold-identify", "identify"];
        argv.extend_from_slice(extra);
        let Commands::Identify(args) = Cli::parse_from(argv).command;
        args
    }

    fn sample_table() -> Table {
        Table::from_records(&[MatchRecord {
            id: Some("GBMIN1".to_string()),
            similarity: Some("0.99".to_string()),
            specimen: Specimen {
                country: Some("Canada".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }])
    }

    #[test]
    fn test_cli_parse_defaults() {
        let args = parse_args(&["ACGT"]);
        assert_eq!(args.sequences, vec!["ACGT".to_string()]);
        assert_eq!(args.db, Database::Cox1);
        assert_eq!(args.format, OutputFormat::Table);
        assert!(!args.raw);
        assert_eq!(args.timeout, None);
        assert_eq!(args.client_options().timeout, None);
        assert_eq!(args.base_url, BOLD_IDS_URL);
        assert!(args.fasta.is_none());
    }

    #[test]
    fn test_cli_parse_options() {
        let args = parse_args(&[
            "--db",
            "COX1_SPECIES_PUBLIC",
            "--format",
            "tsv",
            "--raw",
            "--timeout",
            "5",
            "--proxy",
            "http://proxy:3128",
            "ACGT",
            "TTGA",
        ]);
        assert_eq!(args.db, Database::Cox1SpeciesPublic);
        assert_eq!(args.format, OutputFormat::Tsv);
        assert_eq!(args.sequences.len(), 2);

        let options = args.client_options();
        assert!(options.raw_response);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.proxy.as_deref(), Some("http://proxy:3128"));
    }

    #[test]
    fn test_cli_accepts_unknown_db() {
        let args = parse_args(&["--db", "MY_DB", "ACGT"]);
        assert_eq!(args.db, Database::Other("MY_DB".to_string()));
    }

    #[test]
    fn test_collect_inputs_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.fa");
        std::fs::write(&path, "GGGG\n>danaus\nACGT\n").unwrap();

        let mut args = parse_args(&["AAAA"]);
        args.fasta = Some(path);
        let inputs = collect_inputs(&args).unwrap();

        assert_eq!(
            inputs,
            vec![
                ("seq1".to_string(), "AAAA".to_string()),
                ("fasta1".to_string(), "GGGG".to_string()),
                ("danaus".to_string(), "ACGT".to_string()),
            ]
        );
    }

    #[test]
    fn test_collect_inputs_empty() {
        let args = parse_args(&[]);
        assert!(matches!(
            collect_inputs(&args),
            Err(IdentifyError::EmptyInput)
        ));
    }

    #[test]
    fn test_combined_table() {
        let reports = vec![
            SequenceReport {
                label: "a".to_string(),
                outcome: Outcome::Table(sample_table()),
            },
            SequenceReport {
                label: "b".to_string(),
                outcome: Outcome::Error("boom".to_string()),
            },
        ];
        let table = combined_table(&reports);

        assert_eq!(table.columns()[0], "query");
        assert_eq!(table.columns()[1], "ID");
        assert_eq!(table.columns().last().map(String::as_str), Some("error"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "specimen_country"), Some("Canada"));
        assert_eq!(table.get(0, "error"), None);
        assert_eq!(table.get(1, "query"), Some("b"));
        assert_eq!(table.get(1, "ID"), None);
        assert_eq!(table.get(1, "error"), Some("boom"));
    }

    #[test]
    fn test_write_json_reports() {
        let reports = vec![SequenceReport {
            label: "a".to_string(),
            outcome: Outcome::Table(sample_table()),
        }];
        let mut out = Vec::new();
        write_reports(&mut out, &reports, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["label"], "a");
        assert_eq!(value[0]["table"][0]["ID"], "GBMIN1");
        assert_eq!(value[0]["table"][0]["citation"], serde_json::Value::Null);
    }

    #[test]
    fn test_write_json_report_keys() {
        let reports = vec![
            SequenceReport {
                label: "a".to_string(),
                outcome: Outcome::Raw(RawResponse {
                    status: 200,
                    url: "https://example.org/Ids_xml?sequence=ACGT".to_string(),
                    content_type: Some("text/xml".to_string()),
                    body: "<matches/>".to_string(),
                }),
            },
            SequenceReport {
                label: "b".to_string(),
                outcome: Outcome::Error("boom".to_string()),
            },
        ];
        let mut out = Vec::new();
        write_reports(&mut out, &reports, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["raw"]["body"], "<matches/>");
        assert_eq!(value[0]["raw"]["status"], 200);
        assert_eq!(value[1]["label"], "b");
        assert_eq!(value[1]["error"], "boom");
        assert!(value[1].get("table").is_none());
    }

    #[test]
    fn test_write_yaml_reports() {
        let reports = vec![SequenceReport {
            label: "a".to_string(),
            outcome: Outcome::Error("boom".to_string()),
        }];
        let mut out = Vec::new();
        write_reports(&mut out, &reports, OutputFormat::Yaml).unwrap();

        let yaml = String::from_utf8(out).unwrap();
        assert!(yaml.contains("label: a"));
        assert!(yaml.contains("error: boom"));
    }

    #[test]
    fn test_write_text_reports() {
        console::set_colors_enabled(false);
        let reports = vec![SequenceReport {
            label: "a".to_string(),
            outcome: Outcome::Table(sample_table()),
        }];
        let mut out = Vec::new();
        write_reports(&mut out, &reports, OutputFormat::Table).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("a (1 matches)\n"));
        assert!(text.contains("GBMIN1"));
        assert!(text.contains("Canada"));
    }
}
