use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xnt2wav::RenderConfig;

#[derive(Parser, Debug)]
#[command(name = "xnt2wav")]
#[command(version = "0.1.0")]
#[command(about = "Render a Krazy Rain XNT chart to WAV", long_about = None)]
struct Args {
    /// Input chart (.xnt, or its .xne header)
    chart: Option<PathBuf>,

    /// Output WAV file (defaults to the chart name with .wav)
    output: Option<PathBuf>,

    /// Volume override file (defaults to volumes.txt next to the chart)
    #[arg(long)]
    volumes: Option<PathBuf>,

    /// Also write the notes as a BMS chart next to the output
    #[arg(long)]
    export_notes: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let Some(chart) = args.chart else {
        // Usage is not an error
        let _ = Args::command().print_help();
        return;
    };

    let mut config = RenderConfig::new(&chart, args.output.as_deref());
    config.export_notes = args.export_notes;
    if let Some(volumes) = args.volumes {
        config.volumes = volumes;
    }

    match xnt2wav::render_file(&config) {
        Ok(summary) => {
            if summary.failed_keysounds > 0 {
                tracing::warn!("{} keysounds rendered silent", summary.failed_keysounds);
            }
        }
        Err(e) => tracing::error!("{}", e),
    }
}
