//! Confusion matrix cell layouts.
//!
//! Two conventions are recognized, named by the position of the positive
//! class along the diagonal:
//!
//! ```text
//! "01" (TnFirst)     "10" (TpFirst)
//! [TN, FP]           [TP, FN]
//! [FN, TP]           [FP, TN]
//! ```
//!
//! The same layout must be used when a grid is built and when it is read.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// A 2×2 confusion matrix grid, indexed `[row][col]`.
pub type Grid = [[u64; 2]; 2];

/// The four cell counts of a confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub tp: u64,
    pub tn: u64,
    pub fp: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
}

impl ConfusionCounts {
    pub fn new(tp: u64, tn: u64, fp: u64, fn_: u64) -> Self {
        Self { tp, tn, fp, fn_ }
    }

    /// Number of actual positives (TP + FN).
    pub fn positives(&self) -> u64 {
        self.tp + self.fn_
    }

    /// Number of actual negatives (TN + FP).
    pub fn negatives(&self) -> u64 {
        self.tn + self.fp
    }

    pub fn total(&self) -> u64 {
        self.positives() + self.negatives()
    }
}

/// Cell layout of a confusion matrix grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatrixLayout {
    /// `"01"`: `[[TN, FP], [FN, TP]]`.
    #[default]
    #[serde(rename = "01")]
    TnFirst,
    /// `"10"`: `[[TP, FN], [FP, TN]]`.
    #[serde(rename = "10")]
    TpFirst,
}

impl MatrixLayout {
    /// The textual token for this layout.
    pub fn token(self) -> &'static str {
        match self {
            MatrixLayout::TnFirst => "01",
            MatrixLayout::TpFirst => "10",
        }
    }

    /// Place counts into a grid.
    pub fn arrange(self, counts: ConfusionCounts) -> Grid {
        let ConfusionCounts { tp, tn, fp, fn_ } = counts;
        match self {
            MatrixLayout::TnFirst => [[tn, fp], [fn_, tp]],
            MatrixLayout::TpFirst => [[tp, fn_], [fp, tn]],
        }
    }

    /// Read counts back out of a grid built with this layout.
    pub fn extract(self, grid: &Grid) -> ConfusionCounts {
        match self {
            MatrixLayout::TnFirst => ConfusionCounts {
                tn: grid[0][0],
                fp: grid[0][1],
                fn_: grid[1][0],
                tp: grid[1][1],
            },
            MatrixLayout::TpFirst => ConfusionCounts {
                tp: grid[0][0],
                fn_: grid[0][1],
                fp: grid[1][0],
                tn: grid[1][1],
            },
        }
    }
}

impl FromStr for MatrixLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "01" => Ok(MatrixLayout::TnFirst),
            "10" => Ok(MatrixLayout::TpFirst),
            other => Err(Error::InvalidLayout {
                token: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MatrixLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfusionCounts {
        ConfusionCounts::new(80, 70, 30, 20)
    }

    #[test]
    fn tn_first_grid_positions() {
        let grid = MatrixLayout::TnFirst.arrange(sample());
        assert_eq!(grid, [[70, 30], [20, 80]]);
    }

    #[test]
    fn tp_first_grid_positions() {
        let grid = MatrixLayout::TpFirst.arrange(sample());
        assert_eq!(grid, [[80, 20], [30, 70]]);
    }

    #[test]
    fn extract_inverts_arrange() {
        for layout in [MatrixLayout::TnFirst, MatrixLayout::TpFirst] {
            let grid = layout.arrange(sample());
            assert_eq!(layout.extract(&grid), sample());
        }
    }

    #[test]
    fn mismatched_layout_swaps_classes() {
        let grid = MatrixLayout::TpFirst.arrange(sample());
        let read = MatrixLayout::TnFirst.extract(&grid);
        assert_eq!(read.tp, 70);
        assert_eq!(read.tn, 80);
    }

    #[test]
    fn parse_tokens() {
        assert_eq!("01".parse::<MatrixLayout>().unwrap(), MatrixLayout::TnFirst);
        assert_eq!("10".parse::<MatrixLayout>().unwrap(), MatrixLayout::TpFirst);
        assert_eq!(MatrixLayout::TpFirst.to_string(), "10");
    }

    #[test]
    fn parse_rejects_unknown_token() {
        let err = "11".parse::<MatrixLayout>().unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { ref token } if token == "11"));
        assert!("".parse::<MatrixLayout>().is_err());
    }

    #[test]
    fn serde_uses_tokens() {
        assert_eq!(serde_json::to_string(&MatrixLayout::TnFirst).unwrap(), "\"01\"");
        let parsed: MatrixLayout = serde_json::from_str("\"10\"").unwrap();
        assert_eq!(parsed, MatrixLayout::TpFirst);
    }

    #[test]
    fn counts_marginals() {
        let c = sample();
        assert_eq!(c.positives(), 100);
        assert_eq!(c.negatives(), 100);
        assert_eq!(c.total(), 200);
    }
}
