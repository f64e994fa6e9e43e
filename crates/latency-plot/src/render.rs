use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::chart::ChartSpec;
use crate::config::RenderConfig;
use crate::error::PlotResult;
use crate::loader::load_dataset;
use crate::report::StatsReport;
use crate::stats::{summarize, Moments};

/// Where datasets are read from and charts are written to.
#[derive(Clone, Debug)]
pub struct PlotPaths {
    pub data_dir: PathBuf,
    pub plots_dir: PathBuf,
}

impl PlotPaths {
    pub fn new(data_dir: impl Into<PathBuf>, plots_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            plots_dir: plots_dir.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderOutcome {
    pub report: StatsReport,
    pub output_path: PathBuf,
    pub plotted_samples: usize,
}

/// Load, summarize and plot one dataset.
///
/// Returns `Ok(None)` when the dataset could not be opened; nothing is
/// written in that case. Backend and filesystem failures while drawing are
/// returned as errors.
pub fn render(config: &RenderConfig, paths: &PlotPaths) -> PlotResult<Option<RenderOutcome>> {
    let Some(samples) = load_dataset(&paths.data_dir, &config.dataset) else {
        return Ok(None);
    };
    if samples.skipped_lines() > 0 {
        debug!(
            dataset = %config.dataset,
            skipped = samples.skipped_lines(),
            "ignored malformed lines"
        );
    }

    let summary = summarize(&config.dataset, samples.values(), config.percentile)?;
    let mut report = StatsReport::from_summary(&summary);
    let points = if config.clip {
        if let Some(moments) = Moments::of(&summary.clipped) {
            report.mean = moments.mean;
            report.variance = moments.variance;
        }
        summary.clipped
    } else {
        samples.into_values()
    };

    println!("{}", report.summary_line());

    let output_path = config.output_path(&paths.plots_dir);
    let plotted_samples = points.len();
    let spec = ChartSpec::build(config, &report, points);
    write_chart(&spec, &output_path)?;

    info!(path = %output_path.display(), samples = plotted_samples, "chart saved");
    println!("saved as \"{}\"", output_path.display());

    Ok(Some(RenderOutcome {
        report,
        output_path,
        plotted_samples,
    }))
}

fn write_chart(spec: &ChartSpec, output_path: &Path) -> PlotResult<()> {
    if let Some(dir) = output_path.parent() {
        fs::create_dir_all(dir)?;
    }
    spec.draw(output_path)
}
