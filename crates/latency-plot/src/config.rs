use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{PlotError, PlotResult};

pub const DEFAULT_PERCENTILE: u8 = 100;
pub const DEFAULT_Y_MIN: f64 = 0.0;

const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];
const FALSY: [&str; 4] = ["false", "0", "no", "off"];

/// Parameter record printed when the tool is invoked without arguments.
#[derive(Clone, Debug, Serialize)]
pub struct ExpectedFields {
    pub nome: Option<String>,
    pub p: u8,
    pub clip: bool,
    pub ymax: Option<f64>,
}

impl Default for ExpectedFields {
    fn default() -> Self {
        Self {
            nome: None,
            p: DEFAULT_PERCENTILE,
            clip: false,
            ymax: None,
        }
    }
}

impl ExpectedFields {
    pub fn usage_line(&self) -> PlotResult<String> {
        Ok(format!("expected fields {}", serde_json::to_string(self)?))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub dataset: String,
    pub percentile: u8,
    pub clip: bool,
    pub y_min: f64,
    pub y_max: Option<f64>,
    /// Keys nobody reads; kept so callers can inspect what was passed.
    pub extra: BTreeMap<String, String>,
}

impl RenderConfig {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            percentile: DEFAULT_PERCENTILE,
            clip: false,
            y_min: DEFAULT_Y_MIN,
            y_max: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn from_params(params: &BTreeMap<String, String>) -> PlotResult<Self> {
        let mut config = Self::new(String::new());
        let mut dataset = None;

        for (key, value) in params {
            match key.as_str() {
                "nome" => dataset = Some(parse_dataset_name(value)?),
                "p" => config.percentile = parse_percentile(value)?,
                "clip" => config.clip = parse_flag(key, value)?,
                "ymin" => config.y_min = parse_bound(key, value)?,
                "ymax" => config.y_max = Some(parse_bound(key, value)?),
                _ => {
                    debug!(key = %key, value = %value, "storing unrecognized parameter");
                    config.extra.insert(key.clone(), value.clone());
                }
            }
        }

        config.dataset = dataset.ok_or_else(|| {
            PlotError::InvalidArgument("missing required field 'nome'".to_string())
        })?;
        if let Some(y_max) = config.y_max {
            if y_max <= config.y_min {
                return Err(PlotError::InvalidArgument(format!(
                    "ymax ({y_max}) must be greater than ymin ({})",
                    config.y_min
                )));
            }
        }
        Ok(config)
    }

    pub fn clip_tag(&self) -> &'static str {
        if self.clip {
            "clipped"
        } else {
            "noclip"
        }
    }

    pub fn output_file_name(&self) -> String {
        format!(
            "graph_{}_{}_{}.png",
            self.dataset,
            self.percentile,
            self.clip_tag()
        )
    }

    pub fn output_path(&self, plots_dir: &Path) -> PathBuf {
        plots_dir.join(self.output_file_name())
    }
}

fn parse_dataset_name(value: &str) -> PlotResult<String> {
    let name = value.trim();
    if name.is_empty() {
        return Err(PlotError::InvalidArgument(
            "field 'nome' must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn parse_percentile(value: &str) -> PlotResult<u8> {
    let parsed = value.trim().parse::<u8>().map_err(|_| {
        PlotError::InvalidArgument(format!(
            "field 'p' must be an integer in 0..=100, got '{value}'"
        ))
    })?;
    if parsed > 100 {
        return Err(PlotError::InvalidArgument(format!(
            "field 'p' must be an integer in 0..=100, got '{value}'"
        )));
    }
    Ok(parsed)
}

fn parse_flag(key: &str, value: &str) -> PlotResult<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    if TRUTHY.contains(&normalized.as_str()) {
        Ok(true)
    } else if FALSY.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(PlotError::InvalidArgument(format!(
            "field '{key}' must be one of {} or {}, got '{value}'",
            TRUTHY.join("/"),
            FALSY.join("/")
        )))
    }
}

fn parse_bound(key: &str, value: &str) -> PlotResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(PlotError::InvalidArgument(format!(
            "field '{key}' must be a finite number, got '{value}'"
        ))),
    }
}
