//! Chart context for one rendering.
//!
//! [`ChartSpec`] holds every layout decision (title, overlays, bounds, legend)
//! as plain data; [`ChartSpec::draw`] is the only place that touches the
//! plotting backend, and the canvas lives only for the duration of that call.

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::config::RenderConfig;
use crate::error::{PlotError, PlotResult};
use crate::report::StatsReport;

/// 10x5 inches at 300 DPI.
pub const WIDTH_PX: u32 = 3000;
pub const HEIGHT_PX: u32 = 1500;

pub const X_DESC: &str = "sample";
pub const Y_DESC: &str = "time (ns)";

const FONT_FAMILY: &str = "sans-serif";
const MARKER_RADIUS: i32 = 3;
const MARKER_OPACITY: f64 = 0.3;
const LINE_WIDTH: u32 = 4;
const AUTO_MARGIN: f64 = 0.05;
/// Low enough that samples under the legend box stay visible.
pub const LEGEND_BACKGROUND_OPACITY: f64 = 0.4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineKind {
    Percentile,
    Mean,
}

impl LineKind {
    fn color(self) -> RGBColor {
        match self {
            Self::Percentile => RED,
            Self::Mean => BLACK,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceLine {
    pub kind: LineKind,
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub points: Vec<u64>,
    pub reference_lines: Vec<ReferenceLine>,
    pub y_range: Range<f64>,
    pub legend_caption: Vec<String>,
}

impl ChartSpec {
    pub fn build(config: &RenderConfig, report: &StatsReport, points: Vec<u64>) -> Self {
        let mut reference_lines = Vec::new();
        if report.percentile < 100 && !config.clip {
            reference_lines.push(ReferenceLine {
                kind: LineKind::Percentile,
                label: report.percentile_label(),
                value: report.percentile_value,
            });
        }
        reference_lines.push(ReferenceLine {
            kind: LineKind::Mean,
            label: "mean".to_string(),
            value: report.mean,
        });

        let title = if config.clip {
            format!(
                "Latency variation {} {}",
                config.dataset,
                report.percentile_label()
            )
        } else {
            format!("Latency variation {}", config.dataset)
        };

        let y_range = y_range(config, &points, &reference_lines);
        Self {
            title,
            points,
            reference_lines,
            y_range,
            legend_caption: report.legend_lines(),
        }
    }

    pub fn has_line(&self, kind: LineKind) -> bool {
        self.reference_lines.iter().any(|line| line.kind == kind)
    }

    pub fn draw(&self, path: &Path) -> PlotResult<()> {
        ensure_font()?;

        let root = BitMapBackend::new(path, (WIDTH_PX, HEIGHT_PX)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let x_end = self.points.len().max(1) as f64;
        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, (FONT_FAMILY, 56))
            .margin(40)
            .x_label_area_size(110)
            .y_label_area_size(180)
            .build_cartesian_2d(0f64..x_end, self.y_range.clone())
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(X_DESC)
            .y_desc(Y_DESC)
            .label_style((FONT_FAMILY, 32))
            .axis_desc_style((FONT_FAMILY, 40))
            .draw()
            .map_err(render_error)?;

        let marker = BLUE.mix(MARKER_OPACITY).filled();
        let visible = self.y_range.start..=self.y_range.end;
        chart
            .draw_series(self.points.iter().enumerate().filter_map(|(idx, &value)| {
                let y = value as f64;
                visible
                    .contains(&y)
                    .then(|| Circle::new((idx as f64, y), MARKER_RADIUS, marker))
            }))
            .map_err(render_error)?;

        for caption in &self.legend_caption {
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())
                .map_err(render_error)?
                .label(caption.as_str());
        }

        for line in &self.reference_lines {
            let color = line.kind.color();
            let segment = if visible.contains(&line.value) {
                vec![(0.0, line.value), (x_end, line.value)]
            } else {
                Vec::new()
            };
            chart
                .draw_series(LineSeries::new(segment, color.stroke_width(LINE_WIDTH)))
                .map_err(render_error)?
                .label(line.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(LINE_WIDTH))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .margin(20)
            .legend_area_size(60)
            .label_font((FONT_FAMILY, 34))
            .background_style(WHITE.mix(LEGEND_BACKGROUND_OPACITY))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

fn y_range(config: &RenderConfig, points: &[u64], lines: &[ReferenceLine]) -> Range<f64> {
    let lower = config.y_min;
    let upper = match config.y_max {
        Some(upper) => upper,
        None => {
            let top = points
                .iter()
                .map(|&v| v as f64)
                .chain(lines.iter().map(|line| line.value))
                .fold(lower, f64::max);
            top + (top - lower) * AUTO_MARGIN
        }
    };
    if upper > lower {
        lower..upper
    } else {
        lower..lower + 1.0
    }
}

// plotters' ab_glyph backend only sees fonts registered at runtime.
fn ensure_font() -> PlotResult<()> {
    static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            let mut last_error = "no bundled fonts available".to_string();
            for data in typst_assets::fonts() {
                match register_font(FONT_FAMILY, FontStyle::Normal, data) {
                    Ok(()) => return Ok(()),
                    Err(_) => last_error = "invalid bundled font".to_string(),
                }
            }
            Err(last_error)
        })
        .clone()
        .map_err(PlotError::Render)
}

fn render_error<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}
