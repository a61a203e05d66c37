//! odsec CLI - OpenDocument macro triage tool
//!
//! Reports embedded macros and script event listeners of an OpenDocument
//! file on stderr. Exits with 1 only when the input cannot be opened.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Detect macros and script event listeners in OpenDocument files
#[derive(Parser)]
#[command(
    name = "odsec",
    version,
    about = "Detect macros in OpenDocument files",
    long_about = "odsec - static triage of OpenDocument files.\n\n\
                  Lists Basic/script members and script event listeners of packaged \
                  (.odt, .ods, .odp) and flat (.fodt, .fods, .fodp) documents, \
                  following embedded objects."
)]
struct Cli {
    /// An opendocument path
    od_path: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli) {
        tracing::debug!("scan aborted: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> odsec::Result<()> {
    let report = odsec::scan_file(&cli.od_path, &mut odsec::TracingReporter)?;
    tracing::info!(
        "{}: macros {:?}, {} event listener(s)",
        report.kind,
        report.macros,
        report.listener_count()
    );
    Ok(())
}

/// Message-only lines on stderr; `RUST_LOG` overrides the `warn` default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .with_level(false)
                .with_ansi(false),
        )
        .with(filter)
        .init();
}
