//! Drivediff CLI Binary
//!
//! Command-line interface for the drivediff mirror verification tool.

use clap::Parser;
use drivediff::cli::{map_error, Cli, RunContext};
use drivediff::config::ConfigLoader;
use drivediff::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = RunContext::execute(&cli) {
        error!("Command failed: {}", e);
        eprintln!("{}", map_error(&e));
        process::exit(1);
    }
}

/// Build logging configuration from CLI args and the config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .map(|c| c.logging)
            .unwrap_or_default(),
        None => ConfigLoader::load().map(|c| c.logging).unwrap_or_default(),
    };

    if cli.quiet {
        config.level = "off".to_string();
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_logging_config_default() {
        let cli = Cli::try_parse_from(["drivediff", "diff", "/tmp/mirror"]).unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.format, "text");
    }

    #[test]
    fn build_logging_config_quiet() {
        let cli = Cli::try_parse_from(["drivediff", "--quiet", "diff", "/tmp/mirror"]).unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.level, "off");
    }

    #[test]
    fn build_logging_config_verbose() {
        let cli = Cli::try_parse_from(["drivediff", "--verbose", "diff", "/tmp/mirror"]).unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn explicit_log_level_wins_over_verbose() {
        let cli = Cli::try_parse_from([
            "drivediff",
            "--verbose",
            "--log-level",
            "trace",
            "diff",
            "/tmp/mirror",
        ])
        .unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.level, "trace");
    }

    #[test]
    fn diff_requires_a_target() {
        assert!(Cli::try_parse_from(["drivediff", "diff"]).is_err());
    }

    #[test]
    fn diff_rejects_extra_positionals() {
        assert!(Cli::try_parse_from(["drivediff", "diff", "a", "b"]).is_err());
    }
}
