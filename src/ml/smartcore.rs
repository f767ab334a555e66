//! SmartCore RandomForest wrapper
//!
//! Owns the fitted bagged-tree regressor and converts plain feature rows into
//! SmartCore's dense matrix layout.

use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;

use super::error::{ProfitModelError, Result};
use crate::config::ForestConfig;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Fitted random forest over a fixed number of feature columns
pub struct ProfitForest {
    model: Forest,
    n_features: usize,
}

impl fmt::Debug for ProfitForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfitForest")
            .field("n_features", &self.n_features)
            .finish_non_exhaustive()
    }
}

impl ProfitForest {
    /// Map configuration onto SmartCore parameters for `n_features` columns.
    ///
    /// Every column is a split candidate unless `max_features` narrows it.
    /// Training samples are not retained.
    pub fn parameters(config: &ForestConfig, n_features: usize) -> RandomForestRegressorParameters {
        let m = config
            .max_features
            .map_or(n_features, |max| max.clamp(1, n_features.max(1)));

        RandomForestRegressorParameters {
            max_depth: config.max_depth,
            min_samples_leaf: config.min_samples_leaf,
            min_samples_split: config.min_samples_split,
            n_trees: config.n_trees,
            m: Some(m),
            keep_samples: false,
            seed: config.seed,
        }
    }

    /// Train a new forest on row-major features
    pub fn train(x: &[Vec<f64>], y: &[f64], config: &ForestConfig) -> Result<Self> {
        let x_matrix = to_matrix(x).map_err(ProfitModelError::ModelFitting)?;

        if x.len() != y.len() {
            return Err(ProfitModelError::ModelFitting(Failed::fit(&format!(
                "feature and target count mismatch: {} rows, {} targets",
                x.len(),
                y.len()
            ))));
        }

        let n_features = x[0].len();
        let model = RandomForestRegressor::fit(
            &x_matrix,
            &y.to_vec(),
            Self::parameters(config, n_features),
        )
        .map_err(ProfitModelError::ModelFitting)?;

        Ok(Self { model, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Predict one value per row
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        if let Some(row) = rows.iter().find(|row| row.len() != self.n_features) {
            return Err(ProfitModelError::Inference(Failed::predict(&format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            ))));
        }

        let x = to_matrix(rows).map_err(ProfitModelError::Inference)?;
        self.model.predict(&x).map_err(ProfitModelError::Inference)
    }

    pub fn predict_one(&self, row: &[f64]) -> Result<f64> {
        let predictions = self.predict(&[row.to_vec()])?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| ProfitModelError::Inference(Failed::predict("model returned no prediction")))
    }
}

/// Flatten rows into a row-major dense matrix
fn to_matrix(rows: &[Vec<f64>]) -> std::result::Result<DenseMatrix<f64>, Failed> {
    let Some(first) = rows.first() else {
        return Err(Failed::fit("cannot build a matrix from zero rows"));
    };

    let n_features = first.len();
    let mut flat_data = Vec::with_capacity(rows.len() * n_features);
    for row in rows {
        if row.len() != n_features {
            return Err(Failed::fit("all feature rows must have the same length"));
        }
        flat_data.extend_from_slice(row);
    }

    Ok(DenseMatrix::new(rows.len(), n_features, flat_data, false))
}
