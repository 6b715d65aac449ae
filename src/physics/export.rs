//! CSV serialization of the sample history

use super::history::{HistoryBuffer, HistorySample};
use super::math::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Column names, in row order
pub const CSV_HEADER: &str = "time_s,x_m,v_m_s,F_applied_N,F_friction_N,F_drag_N,F_net_N";

/// Which part of the history an export covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportMode {
    /// Every retained sample
    All,
    /// The most recent `seconds` of simulated time
    Window(Scalar),
}

impl ExportMode {
    /// Conventional file name: `sim_data_all.csv` or `sim_data_window_<N>s.csv`
    pub fn file_name(&self) -> String {
        match self {
            ExportMode::All => "sim_data_all.csv".to_string(),
            ExportMode::Window(seconds) => {
                format!("sim_data_window_{}s.csv", seconds.max(0.0).round() as u64)
            }
        }
    }
}

/// Config and CLI spelling of an export mode, before a window length is attached
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    #[default]
    All,
    Window,
}

impl ExportScope {
    pub fn with_window(self, window_seconds: Scalar) -> ExportMode {
        match self {
            ExportScope::All => ExportMode::All,
            ExportScope::Window => ExportMode::Window(window_seconds),
        }
    }
}

impl FromStr for ExportScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ExportScope::All),
            "window" => Ok(ExportScope::Window),
            other => Err(format!("Unknown export mode: '{other}'. Expected 'all' or 'window'")),
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    /// The history holds no samples
    EmptyHistory,
    /// Writing the export file failed
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EmptyHistory => write!(f, "nothing to export"),
            ExportError::Io(err) => write!(f, "Failed to write export: {err}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::EmptyHistory => None,
            ExportError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

/// Serialize the selected part of `history` as CSV.
///
/// The output is the header followed by one row per sample, every value
/// printed with six decimal places. Rows are separated by `\n` with no
/// trailing newline.
pub fn export_csv(history: &HistoryBuffer, mode: ExportMode) -> Result<String, ExportError> {
    if history.is_empty() {
        return Err(ExportError::EmptyHistory);
    }

    let window = match mode {
        ExportMode::All => history.all(),
        ExportMode::Window(seconds) => history.query_window(seconds),
    };

    let mut lines = Vec::with_capacity(window.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(window.iter().map(format_row));

    Ok(lines.join("\n"))
}

/// Write an export into `dir` under [`ExportMode::file_name`], creating `dir` if needed
pub fn write_export(
    history: &HistoryBuffer,
    mode: ExportMode,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    let csv = export_csv(history, mode)?;

    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let path = dir.join(mode.file_name());
    std::fs::write(&path, csv)?;
    Ok(path)
}

fn format_row(sample: &HistorySample) -> String {
    // Adding zero folds -0.0 into 0.0
    format!(
        "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
        sample.time + 0.0,
        sample.position + 0.0,
        sample.velocity + 0.0,
        sample.applied_force + 0.0,
        sample.friction_force + 0.0,
        sample.drag_force + 0.0,
        sample.net_force + 0.0
    )
}
