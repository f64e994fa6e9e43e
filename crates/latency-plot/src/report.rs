use crate::stats::Summary;

/// Statistics shown to the user, both on stdout and inside the chart legend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsReport {
    pub percentile: u8,
    pub percentile_value: f64,
    pub mean: f64,
    pub variance: f64,
}

impl StatsReport {
    pub fn from_summary(summary: &Summary) -> Self {
        Self {
            percentile: summary.percentile,
            percentile_value: summary.percentile_value,
            mean: summary.mean,
            variance: summary.variance,
        }
    }

    pub fn percentile_label(&self) -> String {
        format!("P{}", self.percentile)
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} ns | mean: {:.2} ns | variance: {:.2} ns",
            self.percentile_label(),
            self.percentile_value,
            self.mean,
            self.variance
        )
    }

    pub fn legend_lines(&self) -> Vec<String> {
        vec![
            format!("mean: {:.2} ns", self.mean),
            format!("variance: {:.2} ns", self.variance),
            format!("{}: {} ns", self.percentile_label(), self.percentile_value),
        ]
    }
}
