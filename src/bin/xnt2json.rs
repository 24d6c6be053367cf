//! XNT to JSON converter

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use xnt2wav::chart::{Chart, ChartJson};

#[derive(Parser, Debug)]
#[command(name = "xnt2json")]
#[command(version = "0.1.0")]
#[command(about = "Convert XNT charts to JSON", long_about = None)]
struct Args {
    /// Input XNT file
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let data = std::fs::read(&args.input)?;
    let chart = Chart::parse(&data)?;
    let chart_json = ChartJson::from(&chart);

    let json_string = if args.compact {
        serde_json::to_string(&chart_json)?
    } else {
        serde_json::to_string_pretty(&chart_json)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
