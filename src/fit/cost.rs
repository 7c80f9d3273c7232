//! Cost functions for scoring a predicted infected curve.
//!
//! Each variant maps two equal-length sequences to one real score, lower is
//! better. They are pure and stateless; the estimator validates lengths before
//! ever calling `score`, so the functions themselves only debug-assert.
//!
//! Signed-error convention: `error = observed - predicted`, so the signed
//! variants (`me`, `se`) measure bias and go negative when the model
//! over-predicts.

use crate::domain::CostKind;

impl CostKind {
    /// Score `predicted` against `observed`.
    ///
    /// # Panics
    /// Debug builds panic on mismatched lengths; release builds truncate to
    /// the shorter sequence. The estimator never passes mismatched inputs.
    pub fn score(self, observed: &[f64], predicted: &[f64]) -> f64 {
        debug_assert_eq!(observed.len(), predicted.len());
        let n = observed.len().min(predicted.len());
        if n == 0 {
            return 0.0;
        }

        let errors = observed.iter().zip(predicted.iter()).map(|(&o, &p)| o - p);
        let sum: f64 = match self {
            CostKind::Mse | CostKind::Sse => errors.map(|e| e * e).sum(),
            CostKind::Mae | CostKind::Sae => errors.map(f64::abs).sum(),
            CostKind::Me | CostKind::Se => errors.sum(),
        };

        match self {
            CostKind::Mse | CostKind::Mae | CostKind::Me => sum / n as f64,
            CostKind::Sse | CostKind::Sae | CostKind::Se => sum,
        }
    }
}
