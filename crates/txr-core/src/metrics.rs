//! Diagnostic metrics derived from confusion matrices.
//!
//! Every metric is a ratio of cell counts. Zero denominators are not
//! guarded: a trial whose marginal count is zero yields NaN (or ±∞) in that
//! slot, and callers filter non-finite values if they need to.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use txr_common::{ConfusionCounts, Error, Grid, MatrixLayout, Result};

/// The twelve metrics computed for every trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    Accuracy,
    Tpr,
    Tnr,
    Ppv,
    Npv,
    BalancedAccuracy,
    CorrelationCoefficient,
    Markedness,
    F1Score,
    FowlkesMallows,
    Youden,
    P4,
}

impl MetricName {
    pub const ALL: [MetricName; 12] = [
        MetricName::Accuracy,
        MetricName::Tpr,
        MetricName::Tnr,
        MetricName::Ppv,
        MetricName::Npv,
        MetricName::BalancedAccuracy,
        MetricName::CorrelationCoefficient,
        MetricName::Markedness,
        MetricName::F1Score,
        MetricName::FowlkesMallows,
        MetricName::Youden,
        MetricName::P4,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            MetricName::Accuracy => "Accuracy",
            MetricName::Tpr => "TPR",
            MetricName::Tnr => "TNR",
            MetricName::Ppv => "PPV",
            MetricName::Npv => "NPV",
            MetricName::BalancedAccuracy => "Balanced accuracy",
            MetricName::CorrelationCoefficient => "Correlation Coefficient",
            MetricName::Markedness => "Markedness",
            MetricName::F1Score => "F1 score",
            MetricName::FowlkesMallows => "Fowlkes-Mallows",
            MetricName::Youden => "Youden",
            MetricName::P4 => "P4",
        }
    }

    /// Machine key, as used on the command line and in JSON.
    pub fn key(self) -> &'static str {
        match self {
            MetricName::Accuracy => "accuracy",
            MetricName::Tpr => "tpr",
            MetricName::Tnr => "tnr",
            MetricName::Ppv => "ppv",
            MetricName::Npv => "npv",
            MetricName::BalancedAccuracy => "balanced_accuracy",
            MetricName::CorrelationCoefficient => "correlation_coefficient",
            MetricName::Markedness => "markedness",
            MetricName::F1Score => "f1_score",
            MetricName::FowlkesMallows => "fowlkes_mallows",
            MetricName::Youden => "youden",
            MetricName::P4 => "p4",
        }
    }
}

impl FromStr for MetricName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        let aliases = [("mcc", MetricName::CorrelationCoefficient), ("f1", MetricName::F1Score)];
        if let Some((_, name)) = aliases.iter().find(|(alias, _)| *alias == wanted) {
            return Ok(*name);
        }
        MetricName::ALL
            .into_iter()
            .find(|name| name.key() == wanted)
            .ok_or_else(|| Error::invalid_argument(format!("unknown metric '{s}'")))
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// All twelve metrics for a single confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub accuracy: f64,
    pub tpr: f64,
    pub tnr: f64,
    pub ppv: f64,
    pub npv: f64,
    pub balanced_accuracy: f64,
    pub correlation_coefficient: f64,
    pub markedness: f64,
    pub f1_score: f64,
    pub fowlkes_mallows: f64,
    pub youden: f64,
    pub p4: f64,
}

impl MetricPoint {
    pub fn from_counts(counts: ConfusionCounts) -> Self {
        let tp = counts.tp as f64;
        let tn = counts.tn as f64;
        let fp = counts.fp as f64;
        let fn_ = counts.fn_ as f64;
        let n = tp + tn + fp + fn_;

        let accuracy = (tp + tn) / n;
        let tpr = tp / (tp + fn_);
        let tnr = tn / (tn + fp);
        let ppv = tp / (tp + fp);
        let npv = tn / (tn + fn_);
        let marginals = (tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_);

        Self {
            accuracy,
            tpr,
            tnr,
            ppv,
            npv,
            balanced_accuracy: (tpr + tnr) / 2.0,
            correlation_coefficient: (tp * tn - fp * fn_) / marginals.sqrt(),
            markedness: ppv + npv - 1.0,
            f1_score: (2.0 * tp) / (2.0 * tp + fp + fn_),
            fowlkes_mallows: (ppv * tpr).sqrt(),
            youden: tpr + tnr - 1.0,
            p4: (4.0 * tp * tn) / (4.0 * tp * tn + (tp + tn) * (fp + fn_)),
        }
    }

    pub fn get(&self, name: MetricName) -> f64 {
        match name {
            MetricName::Accuracy => self.accuracy,
            MetricName::Tpr => self.tpr,
            MetricName::Tnr => self.tnr,
            MetricName::Ppv => self.ppv,
            MetricName::Npv => self.npv,
            MetricName::BalancedAccuracy => self.balanced_accuracy,
            MetricName::CorrelationCoefficient => self.correlation_coefficient,
            MetricName::Markedness => self.markedness,
            MetricName::F1Score => self.f1_score,
            MetricName::FowlkesMallows => self.fowlkes_mallows,
            MetricName::Youden => self.youden,
            MetricName::P4 => self.p4,
        }
    }
}

/// Per-trial values of every metric, index-aligned across fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub accuracy: Vec<f64>,
    pub tpr: Vec<f64>,
    pub tnr: Vec<f64>,
    pub ppv: Vec<f64>,
    pub npv: Vec<f64>,
    pub balanced_accuracy: Vec<f64>,
    pub correlation_coefficient: Vec<f64>,
    pub markedness: Vec<f64>,
    pub f1_score: Vec<f64>,
    pub fowlkes_mallows: Vec<f64>,
    pub youden: Vec<f64>,
    pub p4: Vec<f64>,
}

impl MetricSet {
    fn with_capacity(n: usize) -> Self {
        Self {
            accuracy: Vec::with_capacity(n),
            tpr: Vec::with_capacity(n),
            tnr: Vec::with_capacity(n),
            ppv: Vec::with_capacity(n),
            npv: Vec::with_capacity(n),
            balanced_accuracy: Vec::with_capacity(n),
            correlation_coefficient: Vec::with_capacity(n),
            markedness: Vec::with_capacity(n),
            f1_score: Vec::with_capacity(n),
            fowlkes_mallows: Vec::with_capacity(n),
            youden: Vec::with_capacity(n),
            p4: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, p: MetricPoint) {
        self.accuracy.push(p.accuracy);
        self.tpr.push(p.tpr);
        self.tnr.push(p.tnr);
        self.ppv.push(p.ppv);
        self.npv.push(p.npv);
        self.balanced_accuracy.push(p.balanced_accuracy);
        self.correlation_coefficient.push(p.correlation_coefficient);
        self.markedness.push(p.markedness);
        self.f1_score.push(p.f1_score);
        self.fowlkes_mallows.push(p.fowlkes_mallows);
        self.youden.push(p.youden);
        self.p4.push(p.p4);
    }

    /// Metrics for a sequence of cell counts.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = ConfusionCounts>,
    {
        let iter = counts.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        for c in iter {
            set.push(MetricPoint::from_counts(c));
        }
        set
    }

    /// Metrics for grids that were arranged with `layout`.
    pub fn from_grids(grids: &[Grid], layout: MatrixLayout) -> Self {
        Self::from_counts(grids.iter().map(|g| layout.extract(g)))
    }

    /// Like [`MetricSet::from_grids`], with the layout given as a token.
    pub fn from_grids_with_token(grids: &[Grid], layout_token: &str) -> Result<Self> {
        let layout: MatrixLayout = layout_token.parse()?;
        Ok(Self::from_grids(grids, layout))
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.accuracy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accuracy.is_empty()
    }

    /// Values of one metric across all trials.
    pub fn get(&self, name: MetricName) -> &[f64] {
        match name {
            MetricName::Accuracy => &self.accuracy,
            MetricName::Tpr => &self.tpr,
            MetricName::Tnr => &self.tnr,
            MetricName::Ppv => &self.ppv,
            MetricName::Npv => &self.npv,
            MetricName::BalancedAccuracy => &self.balanced_accuracy,
            MetricName::CorrelationCoefficient => &self.correlation_coefficient,
            MetricName::Markedness => &self.markedness,
            MetricName::F1Score => &self.f1_score,
            MetricName::FowlkesMallows => &self.fowlkes_mallows,
            MetricName::Youden => &self.youden,
            MetricName::P4 => &self.p4,
        }
    }

    /// `(name, values)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricName, &[f64])> + '_ {
        MetricName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }
}
