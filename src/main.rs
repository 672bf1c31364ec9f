// src/main.rs
// shardscope - ranked summaries of search cluster index metadata

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use shardscope::ErrorKind;
use shardscope::cli::{self, Cli};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(ErrorKind::Usage.exit_code()),
            };
        }
    };

    // Diagnostics go to stderr; stdout carries only the report
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging disabled: {err}");
    }

    let result = match cli.to_config() {
        Ok(config) => {
            debug!(?config, "Validated configuration");
            cli::run(&config).await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(report) => {
            let mut stdout = std::io::stdout().lock();
            if stdout.write_all(report.as_bytes()).and_then(|_| stdout.flush()).is_err() {
                return ExitCode::from(ErrorKind::Io.exit_code());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
