use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TrackerError};
use crate::models::SchemaVariant;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarize a job-application spreadsheet export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "jobtrack",
    about = "Summarize a job-application spreadsheet export",
    version
)]
pub struct Settings {
    /// Exported sheet to analyze (CSV, or sheet-values JSON)
    pub input: PathBuf,

    /// Input format; `auto` picks JSON for `.json` files and CSV otherwise
    #[arg(long, default_value = "auto", value_parser = ["auto", "csv", "json"])]
    pub format: String,

    /// The first row is data, not a header
    #[arg(long)]
    pub no_header: bool,

    /// CSV field delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Column layout of the export
    #[arg(long, default_value = "canonical", value_parser = ["canonical", "with-referral"])]
    pub schema: String,

    /// Report format
    #[arg(long, default_value = "text", value_parser = ["text", "json", "wire"])]
    pub output: String,

    /// Persist the summary and cleaned rows to the results directory
    #[arg(long)]
    pub save: bool,

    /// Where `--save` writes its files (default: ~/.jobtrack/results)
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,

    /// Set when `schema` was taken from the last-used config rather than the
    /// command line or its default.
    #[arg(skip)]
    pub schema_from_last_used: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.jobtrack/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_dir: Option<PathBuf>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&home_dir())
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".jobtrack").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // NOTE: clap stores the arg id using the *field name* (underscores).
        if !is_arg_explicitly_set(&matches, "schema") {
            if let Some(v) = last.schema {
                settings.schema_from_last_used = v != settings.schema;
                settings.schema = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "delimiter") {
            if let Some(v) = last.delimiter {
                settings.delimiter = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output") {
            if let Some(v) = last.output {
                settings.output = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "results_dir") && settings.results_dir.is_none() {
            settings.results_dir = last.results_dir;
        }

        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// The configured column layout. Unknown names fall back to canonical.
    pub fn schema_variant(&self) -> SchemaVariant {
        SchemaVariant::from_name(&self.schema).unwrap_or_default()
    }

    /// The CSV delimiter as a byte; only ASCII delimiters are supported.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(TrackerError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }

    /// Directory used by `--save`.
    pub fn resolved_results_dir(&self) -> PathBuf {
        self.results_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".jobtrack").join("results"))
    }

    /// `--debug` overrides log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            schema: Some(s.schema.clone()),
            delimiter: Some(s.delimiter),
            output: Some(s.output.clone()),
            results_dir: s.results_dir.clone(),
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
