use clap::Parser;
use tracing_subscriber::EnvFilter;

use latency_plot::cli::{run, Args};
use latency_plot::error::PlotResult;

fn main() -> PlotResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("latency_plot=warn")),
        )
        .init();

    run(Args::parse())
}
