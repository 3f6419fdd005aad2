//! Renderer-neutral figure model for a confidence interval sweep.
//!
//! The figure has two upper panels (TPR and TNR intervals around the true
//! value) and one lower panel with the interval widths of both rates. It
//! serializes with serde for an external plotting tool and can render
//! itself as a Markdown table.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use txr_common::Result;

use crate::interval::{confidence_interval_txr_sweep, SweepParams, TxrSweep};

pub const TPR_COLOR: &str = "#1f77b4";
pub const TNR_COLOR: &str = "#d62728";
pub const FIGURE_TITLE: &str = "Confidence Intervals for TPR and TNR";

const Y_PADDING: f64 = 0.05;
const WIDTH_HEADROOM: f64 = 1.1;
const BAND_OPACITY: f64 = 0.15;

/// Notes shown under the chart.
pub const ABOUT_TEXT: &str = "\
### About this Visualization

This plot shows how confidence intervals for True Positive Rate (TPR) and True Negative Rate (TNR)
change with increasing sample size.

- **Top row**: TPR confidence intervals (blue, left) and TNR confidence intervals (red, right)
- **Bottom row**: Width of confidence intervals for both metrics

The solid horizontal lines represent the true TPR and TNR values. As sample size increases,
confidence intervals narrow, indicating increased precision in our estimates.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    LowerRight,
    UpperRight,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub style: LineStyle,
    pub line_width: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// A shaded region between two curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub color: String,
    pub opacity: f64,
    pub x: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub legend: LegendPosition,
    pub series: Vec<Series>,
    pub bands: Vec<Band>,
}

/// Complete chart for one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFigure {
    pub title: String,
    pub params: SweepParams,
    pub confidence_level: f64,
    pub tpr_panel: Panel,
    pub tnr_panel: Panel,
    pub width_panel: Panel,
    pub sweep: TxrSweep,
}

fn series(label: String, color: &str, style: LineStyle, x: &[f64], y: Vec<f64>) -> Series {
    let line_width = match style {
        LineStyle::Solid => 2.5,
        LineStyle::Dashed => 1.5,
    };
    Series {
        label,
        color: color.to_string(),
        style,
        line_width,
        x: x.to_vec(),
        y,
    }
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Upper panel for one rate.
fn rate_panel(
    rate_name: &str,
    true_value: f64,
    color: &str,
    params: &SweepParams,
    x: &[f64],
    lower: &[f64],
    upper: &[f64],
) -> Panel {
    let level = params.confidence_level();
    Panel {
        title: format!("{rate_name} Confidence Intervals (α={})", params.alpha),
        x_label: None,
        y_label: format!("{rate_name} Value"),
        x_range: (params.ntot_min as f64, params.ntot_max as f64),
        y_range: (
            (min_of(lower) - Y_PADDING).max(0.0),
            (max_of(upper) + Y_PADDING).min(1.0),
        ),
        legend: LegendPosition::LowerRight,
        series: vec![
            series(
                format!("True {rate_name}"),
                color,
                LineStyle::Solid,
                x,
                vec![true_value; x.len()],
            ),
            series(
                format!("Lower CI ({level:.1}%)"),
                color,
                LineStyle::Dashed,
                x,
                lower.to_vec(),
            ),
            series(
                format!("Upper CI ({level:.1}%)"),
                color,
                LineStyle::Dashed,
                x,
                upper.to_vec(),
            ),
        ],
        bands: vec![Band {
            color: color.to_string(),
            opacity: BAND_OPACITY,
            x: x.to_vec(),
            lower: lower.to_vec(),
            upper: upper.to_vec(),
        }],
    }
}

/// Lay out an already computed sweep.
pub fn build_figure(params: &SweepParams, sweep: TxrSweep) -> ConfidenceFigure {
    let x: Vec<f64> = sweep.n_total.iter().map(|&n| n as f64).collect();
    let tpr_width = sweep.tpr_width();
    let tnr_width = sweep.tnr_width();
    let y_max = max_of(&tpr_width).max(max_of(&tnr_width)) * WIDTH_HEADROOM;

    let width_panel = Panel {
        title: "Confidence Interval Widths".to_string(),
        x_label: Some("Total Sample Size".to_string()),
        y_label: "CI Width".to_string(),
        x_range: (params.ntot_min as f64, params.ntot_max as f64),
        y_range: (0.0, y_max),
        legend: LegendPosition::UpperRight,
        series: vec![
            series("TPR CI Width".to_string(), TPR_COLOR, LineStyle::Solid, &x, tpr_width),
            series("TNR CI Width".to_string(), TNR_COLOR, LineStyle::Solid, &x, tnr_width),
        ],
        bands: Vec::new(),
    };

    ConfidenceFigure {
        title: FIGURE_TITLE.to_string(),
        params: *params,
        confidence_level: params.confidence_level(),
        tpr_panel: rate_panel(
            "TPR",
            params.tpr,
            TPR_COLOR,
            params,
            &x,
            &sweep.tpr_lower,
            &sweep.tpr_upper,
        ),
        tnr_panel: rate_panel(
            "TNR",
            params.tnr,
            TNR_COLOR,
            params,
            &x,
            &sweep.tnr_lower,
            &sweep.tnr_upper,
        ),
        width_panel,
        sweep,
    }
}

/// Run the sweep and lay out the figure.
pub fn plot_confidence_intervals(params: &SweepParams) -> Result<ConfidenceFigure> {
    let sweep = confidence_interval_txr_sweep(params)?;
    Ok(build_figure(params, sweep))
}

impl ConfidenceFigure {
    /// Markdown rendering: parameters, one table row per sample size, and
    /// the explanatory notes.
    pub fn to_markdown(&self) -> String {
        let p = &self.params;
        let mut out = String::new();
        let _ = writeln!(out, "## {}\n", self.title);
        let _ = writeln!(
            out,
            "TPR={} · TNR={} · prevalence={} · α={} · confidence level {:.0}%\n",
            p.tpr, p.tnr, p.prevalence, p.alpha, self.confidence_level
        );
        out.push_str("| N total | N pos | N neg | TPR lower | TPR upper | TPR width | TNR lower | TNR upper | TNR width |\n");
        out.push_str("|---:|---:|---:|---:|---:|---:|---:|---:|---:|\n");

        let s = &self.sweep;
        for i in 0..s.len() {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} |",
                s.n_total[i],
                s.n_pos[i],
                s.n_neg[i],
                s.tpr_lower[i],
                s.tpr_upper[i],
                s.tpr_upper[i] - s.tpr_lower[i],
                s.tnr_lower[i],
                s.tnr_upper[i],
                s.tnr_upper[i] - s.tnr_lower[i],
            );
        }
        out.push('\n');
        out.push_str(ABOUT_TEXT);
        out
    }
}
