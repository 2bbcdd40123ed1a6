//! Command-line interface components.

use crate::config::PipelineConfig;
use crate::constants::{
    DEFAULT_FILE_PATTERN, DEFAULT_SKIP_ROWS, DEFAULT_TARGET_MONTH, DEFAULT_TARGET_YEAR,
    DEFAULT_TOP_N,
};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "inmet-precip")]
#[command(about = "Aggregate INMET station CSV exports into a monthly precipitation point dataset")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory holding the station CSV files
    #[arg(value_name = "INPUT_DIR", default_value = ".")]
    pub input_dir: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Preferred year for the target month
    #[arg(long, default_value_t = DEFAULT_TARGET_YEAR)]
    pub target_year: i32,

    /// Target month (1-12)
    #[arg(long, default_value_t = DEFAULT_TARGET_MONTH)]
    pub target_month: u32,

    /// Glob pattern selecting station files inside INPUT_DIR
    #[arg(long, default_value = DEFAULT_FILE_PATTERN)]
    pub pattern: String,

    /// Metadata lines assumed when no precipitation header line is found
    #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
    pub skip_rows: usize,

    /// Number of stations in the ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Report header row and resolved columns per file, then exit (no output written)
    #[arg(long)]
    pub inspect: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Output path, defaulting to INPUT_DIR/precipitation_<year>-<month>.geojson
    pub fn get_output_path(&self, input_dir: &Path) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => input_dir.join(format!(
                "precipitation_{}-{:02}.geojson",
                self.target_year, self.target_month
            )),
        }
    }

    /// Pipeline configuration built from the flags
    pub fn to_config(&self) -> PipelineConfig {
        let config = PipelineConfig::default()
            .with_target(self.target_year, self.target_month)
            .with_file_pattern(self.pattern.clone())
            .with_fallback_skip_rows(self.skip_rows)
            .with_top_n(self.top_n);

        if self.inspect {
            config.with_inspect_only()
        } else {
            config
        }
    }
}

/// Install the tracing subscriber; `RUST_LOG` overrides the flag-derived level
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("inmet_precip={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["inmet-precip", "data"]);
        assert_eq!(args.input_dir, PathBuf::from("data"));
        assert_eq!(
            args.get_output_path(&args.input_dir),
            PathBuf::from("data").join("precipitation_2025-01.geojson")
        );
        assert_eq!(args.to_config(), PipelineConfig::default());
    }

    #[test]
    fn test_flags_reach_config() {
        let args = Args::parse_from([
            "inmet-precip",
            "data",
            "--target-year",
            "2026",
            "--target-month",
            "2",
            "--pattern",
            "*.csv",
            "--skip-rows",
            "9",
            "--top-n",
            "5",
            "--inspect",
            "-o",
            "out/feb.geojson",
        ]);
        let config = args.to_config();

        assert_eq!(config.target.year, 2026);
        assert_eq!(config.target.month, 2);
        assert_eq!(config.file_pattern, "*.csv");
        assert_eq!(config.fallback_skip_rows, 9);
        assert_eq!(config.top_n, 5);
        assert!(config.inspect_only);
        assert_eq!(
            args.get_output_path(&args.input_dir),
            PathBuf::from("out/feb.geojson")
        );
    }
}
