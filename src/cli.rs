use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "hca",
    version,
    about = "Human-centered accessibility heuristics for UI markup and screenshots"
)]
pub struct Cli {
    /// Optional TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log stage progress to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score markup with the five heuristic metrics only
    Evaluate {
        /// HTML file to score, or "-" for stdin
        #[arg(long)]
        html: String,

        #[arg(long, default_value_t = hca_lib::metrics::DEFAULT_MIN_HTML_LENGTH)]
        min_html_length: usize,
    },
    /// Run heuristics, visual analysis and recommendation synthesis
    Analyze {
        /// HTML file to analyze
        #[arg(long)]
        html: Option<PathBuf>,

        /// Screenshot image file
        #[arg(long)]
        screenshot: Option<PathBuf>,

        /// Source URL; its HTML is fetched when --html is not given
        #[arg(long)]
        url: Option<String>,

        #[arg(long, default_value_t = hca_lib::metrics::DEFAULT_MIN_HTML_LENGTH)]
        min_html_length: usize,
    },
    /// Load a screenshot and/or fetch a URL without analyzing
    Ingest {
        #[arg(long)]
        screenshot: Option<PathBuf>,

        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hca", "evaluate", "--html", "page.html", "--format", "pretty", "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Evaluate { ref html, .. } if html == "page.html"));
    }
}
