mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match args.command {
        Commands::Evaluate {
            html,
            min_html_length,
        } => {
            commands::run_evaluate(
                &raw_args,
                args.config,
                html,
                min_html_length,
                args.format,
                args.output,
            )
            .await
        }
        Commands::Analyze {
            html,
            screenshot,
            url,
            min_html_length,
        } => {
            commands::run_analyze(
                &raw_args,
                args.config,
                html,
                screenshot,
                url,
                min_html_length,
                args.format,
                args.output,
            )
            .await
        }
        Commands::Ingest { screenshot, url } => {
            commands::run_ingest(args.config, screenshot, url, args.format, args.output).await
        }
    }
}
