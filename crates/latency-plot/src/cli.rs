use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::config::{ExpectedFields, RenderConfig};
use crate::error::PlotResult;
use crate::render::{render, PlotPaths};

#[derive(Debug, Parser)]
#[command(
    name = "latency-plot",
    about = "Summarize latency samples and plot them with percentile and mean overlays"
)]
pub struct Args {
    /// Directory holding `<nome>.txt` datasets
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,
    /// Directory receiving rendered charts
    #[arg(long, default_value = "plots")]
    pub plots_dir: PathBuf,
    /// Free-form `key=value` parameters (nome, p, clip, ymin, ymax)
    pub params: Vec<String>,
}

/// Splits `key=value` tokens into a map. Tokens that are not exactly one
/// key and one value are skipped; a repeated key keeps its last value.
pub fn parse_params(tokens: &[String]) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for token in tokens {
        let mut parts = token.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            warn!(token = %token, "ignoring parameter; expected KEY=VALUE");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            warn!(token = %token, "ignoring parameter with empty key");
            continue;
        }
        params.insert(key.to_string(), value.to_string());
    }
    params
}

/// Runs one invocation. Without params only the expected fields are printed.
/// Usage errors and a missing dataset end with a message and `Ok(())`; only
/// drawing and filesystem failures are returned.
pub fn run(args: Args) -> PlotResult<()> {
    let usage = ExpectedFields::default().usage_line()?;
    if args.params.is_empty() {
        println!("{usage}");
        return Ok(());
    }

    let paths = PlotPaths::new(args.data_dir, args.plots_dir);
    let result = RenderConfig::from_params(&parse_params(&args.params))
        .and_then(|config| render(&config, &paths));

    match result {
        Ok(_) => Ok(()),
        Err(err) if err.is_usage() => {
            println!("{err}");
            println!("{usage}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
