use crate::error::{PlotError, PlotResult};

/// Mean and population variance of one sample population.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
}

impl Moments {
    pub fn of(values: &[u64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let len = values.len() as f64;
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / len;
        let variance = values
            .iter()
            .map(|&v| {
                let delta = v as f64 - mean;
                delta * delta
            })
            .sum::<f64>()
            / len;

        Some(Self { mean, variance })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub percentile: u8,
    pub percentile_value: f64,
    pub mean: f64,
    pub variance: f64,
    /// Samples at or below `percentile_value`, in input order.
    pub clipped: Vec<u64>,
}

/// Linear interpolation between closest ranks over an ascending slice.
pub fn percentile(sorted: &[u64], p: u8) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = f64::from(p.min(100)) / 100.0 * last as f64;
    let lower = (rank.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let fraction = rank - lower as f64;

    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    Some(low + fraction * (high - low))
}

pub fn summarize(name: &str, values: &[u64], p: u8) -> PlotResult<Summary> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let percentile_value = percentile(&sorted, p).ok_or_else(|| PlotError::EmptyDataset {
        name: name.to_string(),
    })?;

    let clipped: Vec<u64> = values
        .iter()
        .copied()
        .filter(|&v| v as f64 <= percentile_value)
        .collect();
    // The lowest sample is always <= any interpolated percentile.
    let moments = Moments::of(&clipped).ok_or_else(|| PlotError::EmptyDataset {
        name: name.to_string(),
    })?;

    Ok(Summary {
        percentile: p,
        percentile_value,
        mean: moments.mean,
        variance: moments.variance,
        clipped,
    })
}
