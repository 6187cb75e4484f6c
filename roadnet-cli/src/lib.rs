//! Command-line interface for road network extraction.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roadnet_data::{
    ExportPaths, ExportReport, OsmIngestSummary, export_network, ingest_osm_json,
};
use serde::{Deserialize, Serialize};

mod error;

pub use error::CliError;

const ARG_INPUT: &str = "input";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ARG_LINKS_FILE: &str = "links-file";
const ARG_NODES_FILE: &str = "nodes-file";
const ENV_INPUT: &str = "ROADNET_CMDS_INGEST_INPUT";

/// Run the roadnet CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Ingest(args) => {
            let outcome = run_ingest(args)?;
            outcome.log_summary();
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "roadnet",
    about = "Convert OpenStreetMap extracts into road network tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build link and intersection tables from an Overpass JSON extract.
    Ingest(IngestArgs),
}

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read an Overpass API JSON extract, resolve its ways against \
                 its nodes and write semicolon-delimited link and \
                 intersection tables. Paths can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Convert an Overpass JSON extract into road network tables"
)]
#[ortho_config(prefix = "ROADNET")]
struct IngestArgs {
    /// Path to the Overpass API JSON extract.
    #[arg(long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    input: Option<Utf8PathBuf>,
    /// Directory receiving the tables; created when missing.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    output_dir: Option<Utf8PathBuf>,
    /// File name of the link table.
    #[arg(long = ARG_LINKS_FILE, value_name = "name")]
    #[serde(default)]
    links_file: Option<String>,
    /// File name of the intersection table.
    #[arg(long = ARG_NODES_FILE, value_name = "name")]
    #[serde(default)]
    nodes_file: Option<String>,
}

impl IngestArgs {
    fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IngestConfig {
    input: Utf8PathBuf,
    output_dir: Utf8PathBuf,
    export: ExportPaths,
}

impl IngestConfig {
    fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.input, ARG_INPUT)?;
        self.require_output_dir()?;
        Self::require_file_name(&self.export.links_file, ARG_LINKS_FILE)?;
        Self::require_file_name(&self.export.nodes_file, ARG_NODES_FILE)?;
        if self.export.links_file == self.export.nodes_file {
            return Err(CliError::ConflictingOutputFiles {
                name: self.export.links_file.clone(),
            });
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match roadnet_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn require_output_dir(&self) -> Result<(), CliError> {
        let inspect = |source| CliError::InspectSourcePath {
            field: ARG_OUTPUT_DIR,
            path: self.output_dir.clone(),
            source,
        };
        if !roadnet_fs::path_exists(&self.output_dir).map_err(inspect)? {
            return Ok(());
        }
        if roadnet_fs::dir_is_dir(&self.output_dir).map_err(inspect)? {
            Ok(())
        } else {
            Err(CliError::OutputDirectoryNotDirectory {
                path: self.output_dir.clone(),
            })
        }
    }

    fn require_file_name(name: &str, field: &'static str) -> Result<(), CliError> {
        if Utf8Path::new(name).file_name() == Some(name) {
            Ok(())
        } else {
            Err(CliError::InvalidOutputFileName {
                field,
                name: name.to_owned(),
            })
        }
    }
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_INPUT,
        })?;
        let output_dir = args.output_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        let defaults = ExportPaths::default();
        let export = ExportPaths {
            links_file: args.links_file.unwrap_or(defaults.links_file),
            nodes_file: args.nodes_file.unwrap_or(defaults.nodes_file),
        };
        Ok(Self {
            input,
            output_dir,
            export,
        })
    }
}

/// Result of a completed `ingest` run.
#[derive(Debug, Clone, PartialEq)]
struct IngestOutcome {
    /// Extraction timestamp of the input.
    timestamp: String,
    /// Element counts from the parse.
    summary: OsmIngestSummary,
    /// Written tables and row counts.
    export: ExportReport,
}

impl IngestOutcome {
    fn log_summary(&self) {
        if !self.summary.skipped.is_empty() {
            info!(
                "Skipped {} elements of unsupported kinds",
                self.summary.skipped.len()
            );
        }
        info!(
            "Extract from {}: {} nodes and {} ways read",
            self.timestamp, self.summary.nodes, self.summary.ways
        );
        if let Some(bounds) = self.summary.bounds {
            info!(
                "Nodes span longitude {} to {} and latitude {} to {}",
                bounds.min().x,
                bounds.max().x,
                bounds.min().y,
                bounds.max().y
            );
        }
        info!(
            "Wrote {} links to {} and {} intersections to {}",
            self.export.links,
            self.export.links_path,
            self.export.intersections,
            self.export.nodes_path
        );
    }
}

fn resolve_ingest_config(args: IngestArgs) -> Result<IngestConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn run_ingest(args: IngestArgs) -> Result<IngestOutcome, CliError> {
    let config = resolve_ingest_config(args)?;
    execute_ingest(&config)
}

fn execute_ingest(config: &IngestConfig) -> Result<IngestOutcome, CliError> {
    let report = ingest_osm_json(&config.input)?;
    let export = export_network(&report.network, &config.output_dir, &config.export)?;
    Ok(IngestOutcome {
        timestamp: report.network.provenance.timestamp().to_owned(),
        summary: report.summary,
        export,
    })
}

#[cfg(test)]
mod tests;
