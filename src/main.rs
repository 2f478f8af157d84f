use clap::Parser;
use propelclean::load::DEFAULT_SHEET;
use propelclean::Pipeline;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Clean one workbook of event registration records and export the result.
#[derive(Debug, Parser)]
#[command(name = "propelclean", version, about)]
struct Args {
    /// Input workbook (.xlsx).
    #[arg(default_value = "data/data_propel.xlsx")]
    input: PathBuf,

    /// Directory the cleaned artifacts are written to; created if absent.
    #[arg(default_value = "output")]
    output_dir: PathBuf,

    /// Worksheet to load from the input workbook.
    #[arg(long, default_value = DEFAULT_SHEET)]
    sheet: String,
}

fn main() {
    // ─── init logging ────────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let pipeline = Pipeline::new(args.input, args.output_dir, args.sheet);
    match pipeline.run() {
        Ok(outcome) => info!(rows = outcome.rows, "done"),
        Err(err) => {
            error!("pipeline failed: {err}");
            std::process::exit(1);
        }
    }
}
