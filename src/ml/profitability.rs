//! Crop profitability model
//!
//! [`ProfitabilityModel`] is the long-lived owner of the current
//! [`TrainedModel`]. A fit builds a complete new model before publishing it,
//! so concurrent readers always see either the old snapshot or the new one.
//! A failed fit leaves the published model untouched.

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::{ProfitModelError, Result};
use super::features::{build_scenario_row, build_training_table, FeatureSchema};
use super::smartcore::ProfitForest;
use super::statistics::{median, mode};
use super::training::{calculate_metrics, TrainingMetrics};
use crate::config::ForestConfig;
use crate::domain::{CropCycleRecord, Scenario};

/// Where a trained model came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProvenance {
    pub model_id: String,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub crop_types: usize,
    /// Open cycles present in the input but excluded from training
    pub dropped_open_cycles: usize,
    pub feature_names: Vec<String>,
    pub forest: ForestConfig,
    pub metrics: Option<TrainingMetrics>,
}

/// A crop and its predicted profit under the canonical scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub crop_type: String,
    pub predicted_profit: f64,
}

/// Typical conditions every crop is compared under
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalBaseline {
    /// Most frequent area
    pub area_id: i64,
    /// Median duration of harvested cycles
    pub duration_days: f64,
    /// Median total cost of all cycles
    pub total_cost: f64,
}

impl CanonicalBaseline {
    pub fn from_records(records: &[CropCycleRecord]) -> Result<Self> {
        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|reason| ProfitModelError::CorruptRecord { index, reason })?;
        }

        let areas: Vec<i64> = records.iter().map(|r| r.area_id).collect();
        let area_id = mode(&areas).ok_or_else(|| {
            ProfitModelError::InsufficientData("no crop cycle records supplied".to_string())
        })?;

        let durations: Vec<f64> = records
            .iter()
            .filter_map(|r| r.duration_days())
            .map(|days| days as f64)
            .collect();
        let duration_days = median(&durations).ok_or_else(|| {
            ProfitModelError::InsufficientData(
                "no harvested crop cycles to derive a typical duration".to_string(),
            )
        })?;

        let costs: Vec<f64> = records.iter().map(|r| r.total_cost()).collect();
        let total_cost = median(&costs).ok_or_else(|| {
            ProfitModelError::InsufficientData("no crop cycle records supplied".to_string())
        })?;

        Ok(Self {
            area_id,
            duration_days,
            total_cost,
        })
    }

    pub fn scenario_for(&self, crop_type: &str) -> Scenario {
        Scenario::new(self.area_id, crop_type, self.duration_days, self.total_cost)
    }
}

/// Sort by predicted profit, highest first. Equal profits keep their input
/// order.
pub fn rank_by_profit(mut recommendations: Vec<CropRecommendation>) -> Vec<CropRecommendation> {
    recommendations.sort_by_key(|r| Reverse(OrderedFloat(r.predicted_profit)));
    recommendations
}

/// Immutable fitted model with its frozen feature schema
#[derive(Debug)]
pub struct TrainedModel {
    forest: ProfitForest,
    schema: FeatureSchema,
    provenance: ModelProvenance,
}

impl TrainedModel {
    pub fn train(records: &[CropCycleRecord], config: &ForestConfig) -> Result<Self> {
        let table = build_training_table(records)?;
        let forest = ProfitForest::train(&table.features, &table.target, config)?;

        let fitted = forest.predict(&table.features)?;
        let metrics = calculate_metrics(&fitted, &table.target);

        let provenance = ModelProvenance {
            model_id: format!("crop_profit_rf_{}", uuid::Uuid::new_v4()),
            trained_at: Utc::now(),
            training_rows: table.len(),
            crop_types: table.schema.crop_count(),
            dropped_open_cycles: table.dropped_open_cycles,
            feature_names: table.schema.column_names(),
            forest: config.clone(),
            metrics,
        };

        Ok(Self {
            forest,
            schema: table.schema,
            provenance,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn provenance(&self) -> &ModelProvenance {
        &self.provenance
    }

    pub fn predict_profit(&self, scenario: &Scenario) -> Result<f64> {
        let row = build_scenario_row(scenario, &self.schema)?;
        self.forest.predict_one(&row)
    }

    /// Rank every trained crop under the canonical scenario for `records`
    pub fn recommend_crops(&self, records: &[CropCycleRecord]) -> Result<Vec<CropRecommendation>> {
        let baseline = CanonicalBaseline::from_records(records)?;

        let recommendations = self
            .schema
            .crop_columns()
            .iter()
            .map(|crop| -> Result<CropRecommendation> {
                let predicted_profit = self.predict_profit(&baseline.scenario_for(crop))?;
                debug!(crop = %crop, predicted_profit, "scored crop");
                Ok(CropRecommendation {
                    crop_type: crop.clone(),
                    predicted_profit,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(rank_by_profit(recommendations))
    }
}

/// Owner of the currently published model
#[derive(Debug, Default)]
pub struct ProfitabilityModel {
    config: ForestConfig,
    current: RwLock<Option<Arc<TrainedModel>>>,
}

impl ProfitabilityModel {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
        }
    }

    /// Train on the full record set and publish the result
    pub fn fit(&self, records: &[CropCycleRecord]) -> Result<Arc<TrainedModel>> {
        let trained = Arc::new(TrainedModel::train(records, &self.config)?);
        *self.current.write() = Some(Arc::clone(&trained));

        let provenance = trained.provenance();
        info!(
            model_id = %provenance.model_id,
            rows = provenance.training_rows,
            crops = provenance.crop_types,
            dropped = provenance.dropped_open_cycles,
            r2 = ?provenance.metrics.map(|m| m.r2),
            "profit model trained"
        );

        Ok(trained)
    }

    pub fn is_trained(&self) -> bool {
        self.current.read().is_some()
    }

    /// The published model, shared with any in-flight readers
    pub fn snapshot(&self) -> Result<Arc<TrainedModel>> {
        self.current
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(ProfitModelError::ModelNotTrained)
    }

    pub fn predict_profit(&self, scenario: &Scenario) -> Result<f64> {
        self.snapshot()?.predict_profit(scenario)
    }

    pub fn recommend_crops(&self, records: &[CropCycleRecord]) -> Result<Vec<CropRecommendation>> {
        self.snapshot()?.recommend_crops(records)
    }
}
