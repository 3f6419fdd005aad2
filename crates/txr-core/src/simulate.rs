//! Monte Carlo confusion matrix simulation.
//!
//! Each trial draws `TP ~ Binomial(Npos, TPR)` and `TN ~ Binomial(Nneg, TNR)`
//! independently; the off-diagonal cells follow from the class sizes
//! (`FN = Npos - TP`, `FP = Nneg - TN`).
//!
//! The random source is passed in by the caller. Seed a
//! [`rand::rngs::StdRng`] for reproducible batches.

use rand::Rng;
use rand_distr::{Binomial, Distribution};
use serde::{Deserialize, Serialize};
use txr_common::{ConfusionCounts, Error, Grid, MatrixLayout, Result};

use crate::metrics::MetricSet;

/// Default number of Monte Carlo trials.
pub const DEFAULT_TRIALS: usize = 10_000;

/// Inputs for a simulated batch of confusion matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// True positive rate in [0, 1].
    pub tpr: f64,
    /// True negative rate in [0, 1].
    pub tnr: f64,
    /// Number of actual positives per trial.
    pub n_pos: u64,
    /// Number of actual negatives per trial.
    pub n_neg: u64,
}

impl SimulationParams {
    pub fn new(tpr: f64, tnr: f64, n_pos: u64, n_neg: u64) -> Self {
        Self {
            tpr,
            tnr,
            n_pos,
            n_neg,
        }
    }

    fn validate(&self) -> Result<()> {
        crate::interval::check_rate("tpr", self.tpr)?;
        crate::interval::check_rate("tnr", self.tnr)?;
        Ok(())
    }
}

/// A batch of simulated confusion matrices sharing one layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionBatch {
    layout: MatrixLayout,
    n_pos: u64,
    n_neg: u64,
    grids: Vec<Grid>,
}

impl ConfusionBatch {
    /// Layout the grids were arranged with.
    pub fn layout(&self) -> MatrixLayout {
        self.layout
    }

    pub fn n_pos(&self) -> u64 {
        self.n_pos
    }

    pub fn n_neg(&self) -> u64 {
        self.n_neg
    }

    /// The raw grids, one per trial.
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Cell counts of every trial, read with the batch's own layout.
    pub fn counts(&self) -> impl Iterator<Item = ConfusionCounts> + '_ {
        self.grids.iter().map(|grid| self.layout.extract(grid))
    }

    /// Compute the metric set for this batch.
    pub fn metrics(&self) -> MetricSet {
        MetricSet::from_grids(&self.grids, self.layout)
    }
}

/// Simulate `trials` confusion matrices arranged with `layout`.
pub fn create_confusion_matrices<R: Rng + ?Sized>(
    params: &SimulationParams,
    trials: usize,
    layout: MatrixLayout,
    rng: &mut R,
) -> Result<ConfusionBatch> {
    params.validate()?;

    let tp_dist = Binomial::new(params.n_pos, params.tpr)
        .map_err(|e| Error::invalid_argument(format!("tpr binomial: {e}")))?;
    let tn_dist = Binomial::new(params.n_neg, params.tnr)
        .map_err(|e| Error::invalid_argument(format!("tnr binomial: {e}")))?;

    // All TP draws first, then all TN draws, so a seeded batch does not
    // depend on how the two columns interleave.
    let tp: Vec<u64> = (0..trials).map(|_| tp_dist.sample(rng)).collect();
    let tn: Vec<u64> = (0..trials).map(|_| tn_dist.sample(rng)).collect();

    let grids = tp
        .into_iter()
        .zip(tn)
        .map(|(tp, tn)| {
            layout.arrange(ConfusionCounts {
                tp,
                tn,
                fp: params.n_neg - tn,
                fn_: params.n_pos - tp,
            })
        })
        .collect();

    tracing::debug!(
        trials,
        n_pos = params.n_pos,
        n_neg = params.n_neg,
        layout = %layout,
        "simulated confusion matrices"
    );

    Ok(ConfusionBatch {
        layout,
        n_pos: params.n_pos,
        n_neg: params.n_neg,
        grids,
    })
}

/// Like [`create_confusion_matrices`], with the layout given as a token
/// (`"01"` or `"10"`).
pub fn create_confusion_matrices_with_token<R: Rng + ?Sized>(
    params: &SimulationParams,
    trials: usize,
    layout_token: &str,
    rng: &mut R,
) -> Result<ConfusionBatch> {
    let layout: MatrixLayout = layout_token.parse()?;
    create_confusion_matrices(params, trials, layout, rng)
}
