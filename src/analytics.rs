//! Profit analytics over historical crop cycles
//!
//! Aggregates shown next to the profit predictor: overall profit and ROI,
//! per-crop history and where the money goes by cost category.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::domain::CropCycleRecord;

/// Historical profit for one crop type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfitStats {
    pub crop_type: String,
    pub cycles: usize,
    pub total_profit: f64,
    pub average_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub total_profit: f64,
    /// Mean of per-cycle profit / cost, in percent, over cycles with spend
    pub average_roi_percent: Option<f64>,
    /// Crop of the single most profitable cycle
    pub most_profitable_crop: Option<String>,
    /// In first-observed order
    pub crops: Vec<CropProfitStats>,
}

/// A prediction set against the crop's track record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionComparison {
    pub predicted_profit: f64,
    pub historical_average_profit: f64,
    /// predicted minus historical average
    pub delta: f64,
}

impl ProfitSummary {
    pub fn from_records(records: &[CropCycleRecord]) -> Self {
        let total_profit = records.iter().map(CropCycleRecord::profit).sum();

        let rois: Vec<f64> = records
            .iter()
            .filter(|r| r.total_cost() > 0.0)
            .map(|r| r.profit() / r.total_cost() * 100.0)
            .collect();
        let average_roi_percent = if rois.is_empty() {
            None
        } else {
            Some(rois.iter().sum::<f64>() / rois.len() as f64)
        };

        // max_by_key keeps the last maximum, so scan reversed to keep the first
        let most_profitable_crop = records
            .iter()
            .rev()
            .max_by_key(|r| OrderedFloat(r.profit()))
            .map(|r| r.crop_type.clone());

        let mut crops: Vec<CropProfitStats> = Vec::new();
        for record in records {
            let profit = record.profit();
            match crops.iter_mut().find(|c| c.crop_type == record.crop_type) {
                Some(stats) => {
                    stats.cycles += 1;
                    stats.total_profit += profit;
                }
                None => crops.push(CropProfitStats {
                    crop_type: record.crop_type.clone(),
                    cycles: 1,
                    total_profit: profit,
                    average_profit: 0.0,
                }),
            }
        }
        for stats in &mut crops {
            stats.average_profit = stats.total_profit / stats.cycles as f64;
        }

        Self {
            total_profit,
            average_roi_percent,
            most_profitable_crop,
            crops,
        }
    }

    pub fn crop(&self, crop_type: &str) -> Option<&CropProfitStats> {
        self.crops.iter().find(|c| c.crop_type == crop_type)
    }

    /// `None` when the crop has no history
    pub fn compare_prediction(&self, crop_type: &str, predicted_profit: f64) -> Option<PredictionComparison> {
        self.crop(crop_type).map(|stats| PredictionComparison {
            predicted_profit,
            historical_average_profit: stats.average_profit,
            delta: predicted_profit - stats.average_profit,
        })
    }
}

/// Spend per cost category across a set of cycles
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub seed: f64,
    pub fertilizer: f64,
    pub labor: f64,
    pub equipment: f64,
    pub other: f64,
}

impl CostBreakdown {
    pub fn from_records(records: &[CropCycleRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.seed += r.seed_cost;
            acc.fertilizer += r.fertilizer_cost;
            acc.labor += r.labor_cost;
            acc.equipment += r.equipment_cost;
            acc.other += r.other_costs;
            acc
        })
    }

    pub fn total(&self) -> f64 {
        self.seed + self.fertilizer + self.labor + self.equipment + self.other
    }

    /// Category shares of the total, in percent; `None` when nothing was spent
    pub fn shares_percent(&self) -> Option<[(&'static str, f64); 5]> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }

        Some([
            ("seed", self.seed / total * 100.0),
            ("fertilizer", self.fertilizer / total * 100.0),
            ("labor", self.labor / total * 100.0),
            ("equipment", self.equipment / total * 100.0),
            ("other", self.other / total * 100.0),
        ])
    }
}
