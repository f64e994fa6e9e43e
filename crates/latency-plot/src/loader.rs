use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PlotError, PlotResult};

pub const DATASET_EXTENSION: &str = "txt";

/// Samples read from one dataset file, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleSet {
    values: Vec<u64>,
    skipped_lines: usize,
}

impl SampleSet {
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<u64> {
        self.values
    }

    /// Lines that were present but not a plain non-negative integer.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn dataset_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{DATASET_EXTENSION}"))
}

/// Fail-soft loader: reports a missing or unreadable dataset on stdout and
/// returns `None` so the caller can stop before drawing anything.
pub fn load_dataset(dir: &Path, name: &str) -> Option<SampleSet> {
    let path = dataset_path(dir, name);
    match read_samples(&path) {
        Ok(samples) => Some(samples),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "dataset unavailable");
            println!("{}", not_found_message(dir, name));
            None
        }
    }
}

pub fn read_samples(path: &Path) -> PlotResult<SampleSet> {
    let file = File::open(path).map_err(|_| PlotError::DatasetNotFound {
        path: path.to_path_buf(),
    })?;
    let samples = parse_samples(BufReader::new(file)).map_err(|_| PlotError::DatasetNotFound {
        path: path.to_path_buf(),
    })?;
    debug!(
        path = %path.display(),
        samples = samples.len(),
        skipped = samples.skipped_lines(),
        "loaded dataset"
    );
    Ok(samples)
}

/// Keeps every line that, once surrounding whitespace is stripped, is a run
/// of ASCII digits fitting in a `u64`. Blank lines are neither kept nor
/// counted as skipped.
pub fn parse_samples<R: BufRead>(mut reader: R) -> PlotResult<SampleSet> {
    let mut set = SampleSet::default();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let token = trim_line(&line);
        if token.is_empty() {
            continue;
        }
        match parse_sample(token) {
            Some(value) => set.values.push(value),
            None => set.skipped_lines += 1,
        }
    }
    Ok(set)
}

fn parse_sample(token: &[u8]) -> Option<u64> {
    if !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(token).ok()?.parse().ok()
}

/// Names the file the way the user addressed it: bare for the working
/// directory, joined with `dir` otherwise.
pub fn not_found_message(dir: &Path, name: &str) -> String {
    let path = if dir == Path::new(".") {
        PathBuf::from(format!("{name}.{DATASET_EXTENSION}"))
    } else {
        dataset_path(dir, name)
    };
    PlotError::DatasetNotFound { path }.to_string()
}

// `is_ascii_whitespace` leaves out vertical tab.
fn is_line_space(b: &u8) -> bool {
    b.is_ascii_whitespace() || *b == 0x0b
}

fn trim_line(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|b| !is_line_space(b)).unwrap_or(line.len());
    let end = line.iter().rposition(|b| !is_line_space(b)).map_or(start, |i| i + 1);
    &line[start..end]
}
