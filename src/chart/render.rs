//! Render chart PNGs by piping series data to matplotlib.
//!
//! Each chart type carries its own small Python program, executed with
//! `python3 -c`. Data rows travel over stdin as tab-separated values and
//! the output path plus title come in as argv. A missing interpreter or a
//! non-zero exit is surfaced with an actionable message; an empty series
//! is an `EmptySeries` error the caller downgrades to a skip-with-warning.

use crate::aggregator::summary::PivotMatrix;
use crate::chart::ChartConfig;
use crate::utils::error::ChartError;
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const CATEGORY_CHART_PY: &str = "
import matplotlib
matplotlib.use('Agg')
import matplotlib.pyplot as plt
import sys

labels, values = [], []
for line in sys.stdin.readlines():
    parts = line.rstrip('\\n').split('\\t')
    if len(parts) != 2:
        continue
    labels.append(parts[0])
    values.append(int(parts[1]))

fig, ax = plt.subplots(figsize=(10, 6))
bars = ax.bar(labels, values)
ax.bar_label(bars, padding=2)
ax.set_title(sys.argv[2])
ax.set_ylabel('Count')
plt.xticks(rotation=45, ha='right')
plt.tight_layout()
plt.savefig(sys.argv[1])
";

const FUNCTION_CHART_PY: &str = "
import matplotlib
matplotlib.use('Agg')
import matplotlib.pyplot as plt
import textwrap
import sys

labels, values = [], []
for line in sys.stdin.readlines():
    parts = line.rstrip('\\n').split('\\t')
    if len(parts) != 2:
        continue
    wrapped = '\\n'.join(textwrap.wrap(parts[0], width=int(sys.argv[3])))
    labels.append(wrapped)
    values.append(int(parts[1]))

fig, ax = plt.subplots(figsize=(14, 10))
bars = ax.barh(labels, values)
ax.bar_label(bars, padding=3)
ax.set_title(sys.argv[2])
ax.set_xlabel('Count')
ax.invert_yaxis()
fig.subplots_adjust(left=0.5)
plt.savefig(sys.argv[1])
";

const HEATMAP_PY: &str = "
import matplotlib
matplotlib.use('Agg')
import matplotlib.pyplot as plt
import sys

rows = [line.rstrip('\\n').split('\\t') for line in sys.stdin.readlines() if line.strip()]
categories = rows[0][1:]
functions = [r[0] for r in rows[1:]]
data = [[int(v) for v in r[1:]] for r in rows[1:]]

fig, ax = plt.subplots(figsize=(12, 8))
im = ax.imshow(data, cmap='YlOrRd', aspect='auto')
ax.set_xticks(range(len(categories)), labels=categories, rotation=45, ha='right')
ax.set_yticks(range(len(functions)), labels=functions)
for i in range(len(functions)):
    for j in range(len(categories)):
        ax.text(j, i, data[i][j], ha='center', va='center', fontsize=8)
fig.colorbar(im, ax=ax, label='Count')
ax.set_title(sys.argv[2])
plt.tight_layout()
plt.savefig(sys.argv[1])
";

/// Render the vertical category bar chart
///
/// **Public** - writes `<prefix>_categories.png`
pub fn render_category_chart(
    table: &[(String, u64)],
    config: &ChartConfig,
) -> Result<PathBuf, ChartError> {
    if table.is_empty() {
        return Err(ChartError::EmptySeries("category chart".to_string()));
    }

    let output = config.categories_path();
    let payload = series_payload(table, usize::MAX);
    run_plotter(
        CATEGORY_CHART_PY,
        &[
            path_arg(&output),
            "Instructions by category".to_string(),
        ],
        &payload,
    )?;

    info!("Category chart written to: {}", output.display());
    Ok(output)
}

/// Render the horizontal top-functions bar chart
///
/// **Public** - writes `<prefix>_top_functions_level_<depth>.png`
pub fn render_function_chart(
    table: &[(String, u64)],
    config: &ChartConfig,
) -> Result<PathBuf, ChartError> {
    if table.is_empty() {
        return Err(ChartError::EmptySeries("function chart".to_string()));
    }

    let output = config.top_functions_path();
    let payload = series_payload(table, config.label_cap);
    let title = format!(
        "Top {} functions (hierarchy depth {})",
        table.len(),
        config.depth
    );
    run_plotter(
        FUNCTION_CHART_PY,
        &[path_arg(&output), title, config.wrap_width.to_string()],
        &payload,
    )?;

    info!("Function chart written to: {}", output.display());
    Ok(output)
}

/// Render the function-by-category heatmap
///
/// **Public** - writes `<prefix>_heatmap_level_<depth>.png`
pub fn render_heatmap(matrix: &PivotMatrix, config: &ChartConfig) -> Result<PathBuf, ChartError> {
    if matrix.is_empty() {
        return Err(ChartError::EmptySeries("heatmap".to_string()));
    }

    let output = config.heatmap_path();
    let payload = matrix_payload(matrix, config.label_cap);
    let title = format!(
        "Instruction counts by function and category (depth {})",
        config.depth
    );
    run_plotter(HEATMAP_PY, &[path_arg(&output), title], &payload)?;

    info!("Heatmap written to: {}", output.display());
    Ok(output)
}

/// Build the two-column TSV payload for a ranked series
///
/// **Private** - labels are truncated and made tab-safe first
fn series_payload(table: &[(String, u64)], label_cap: usize) -> String {
    let mut payload = String::new();
    for (label, count) in table {
        payload.push_str(&truncate_label(label, label_cap));
        payload.push('\t');
        payload.push_str(&count.to_string());
        payload.push('\n');
    }
    payload
}

/// Build the TSV payload for the heatmap grid (header row, then one row
/// per function)
///
/// **Private**
fn matrix_payload(matrix: &PivotMatrix, label_cap: usize) -> String {
    let mut payload = String::new();

    for category in &matrix.categories {
        payload.push('\t');
        payload.push_str(&truncate_label(category, label_cap));
    }
    payload.push('\n');

    for (function, row) in matrix.functions.iter().zip(&matrix.cells) {
        payload.push_str(&truncate_label(function, label_cap));
        for value in row {
            payload.push('\t');
            payload.push_str(&value.to_string());
        }
        payload.push('\n');
    }

    payload
}

/// Shorten an over-long label, keeping a trailing ellipsis
///
/// **Private** - also strips embedded tabs so the TSV payload stays sound
fn truncate_label(label: &str, cap: usize) -> String {
    let clean: String = label
        .chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect();

    if cap == usize::MAX || clean.chars().count() <= cap {
        return clean;
    }

    let kept: String = clean.chars().take(cap.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Spawn the plotter and feed it the payload
///
/// **Private** - shared by all three chart types
fn run_plotter(script: &str, args: &[String], payload: &str) -> Result<(), ChartError> {
    debug!("Spawning plotter with {} payload bytes", payload.len());

    let mut child = Command::new("python3")
        .arg("-c")
        .arg(script)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ChartError::PlotterUnavailable(e.to_string()))?;

    {
        let mut stdin = child.stdin.take().ok_or_else(|| {
            ChartError::PlotterUnavailable("failed to open pipe to plotter".to_string())
        })?;
        stdin.write_all(payload.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(ChartError::PlotterFailed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
