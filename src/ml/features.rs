//! Feature engineering for the profit model
//!
//! Turns crop-cycle records into a numeric training table and encodes
//! hypothetical scenarios against the schema frozen at fit time. Every row,
//! training or scenario, goes through [`FeatureSchema::encode`], so column
//! order cannot drift between fit and predict.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ProfitModelError, Result};
use crate::domain::{CropCycleRecord, Scenario};

pub const AREA_ID_COLUMN: &str = "area_id";
pub const DURATION_COLUMN: &str = "duration_days";
pub const TOTAL_COST_COLUMN: &str = "total_cost";

const NUMERIC_COLUMNS: [&str; 3] = [AREA_ID_COLUMN, DURATION_COLUMN, TOTAL_COST_COLUMN];
const CROP_COLUMN_PREFIX: &str = "crop_type_";

/// Ordered feature layout established when a model is fitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    crop_columns: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from crop labels, keeping first-observed order and
    /// dropping repeats
    pub fn from_crops<I, S>(crops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            crop_columns: crops
                .into_iter()
                .map(|crop| -> String { crop.into() })
                .unique()
                .collect(),
        }
    }

    /// Crop labels with an indicator column, in column order
    pub fn crop_columns(&self) -> &[String] {
        &self.crop_columns
    }

    pub fn crop_count(&self) -> usize {
        self.crop_columns.len()
    }

    /// Total number of feature columns
    pub fn width(&self) -> usize {
        NUMERIC_COLUMNS.len() + self.crop_columns.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        NUMERIC_COLUMNS
            .iter()
            .map(|name| name.to_string())
            .chain(
                self.crop_columns
                    .iter()
                    .map(|crop| format!("{}{}", CROP_COLUMN_PREFIX, crop)),
            )
            .collect()
    }

    /// Position of a crop among the indicator columns
    pub fn crop_index(&self, crop_type: &str) -> Option<usize> {
        self.crop_columns.iter().position(|crop| crop == crop_type)
    }

    pub fn contains_crop(&self, crop_type: &str) -> bool {
        self.crop_index(crop_type).is_some()
    }

    /// Lay out one row. Unknown crops leave every indicator at zero.
    fn encode(&self, area_id: i64, duration_days: f64, total_cost: f64, crop_type: &str) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        row.push(area_id as f64);
        row.push(duration_days);
        row.push(total_cost);
        row.resize(self.width(), 0.0);

        if let Some(idx) = self.crop_index(crop_type) {
            row[NUMERIC_COLUMNS.len() + idx] = 1.0;
        }

        row
    }
}

/// Feature table with its parallel profit target
#[derive(Debug, Clone)]
pub struct TrainingTable {
    pub schema: FeatureSchema,
    pub features: Vec<Vec<f64>>,
    pub target: Vec<f64>,
    /// Records skipped because they had no harvest date
    pub dropped_open_cycles: usize,
}

impl TrainingTable {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Build the training table from historical records.
///
/// Open cycles are skipped. Any record with impossible values, open or
/// harvested, fails the whole table rather than being dropped.
pub fn build_training_table(records: &[CropCycleRecord]) -> Result<TrainingTable> {
    if records.is_empty() {
        return Err(ProfitModelError::InsufficientData(
            "no crop cycle records supplied".to_string(),
        ));
    }

    let mut usable: Vec<(&CropCycleRecord, i64)> = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        // Open cycles still feed the cost baseline, so their money fields count
        record
            .validate()
            .map_err(|reason| ProfitModelError::CorruptRecord { index, reason })?;

        let Some(duration) = record.duration_days() else {
            debug!(index, crop = %record.crop_type, "skipping crop cycle without harvest date");
            continue;
        };

        usable.push((record, duration));
    }

    if usable.is_empty() {
        return Err(ProfitModelError::InsufficientData(
            "no harvested crop cycles to learn from".to_string(),
        ));
    }

    let schema = FeatureSchema::from_crops(usable.iter().map(|(record, _)| record.crop_type.as_str()));
    if schema.crop_count() < 2 {
        return Err(ProfitModelError::InsufficientData(format!(
            "need at least 2 crop types with harvested history, found {}",
            schema.crop_count()
        )));
    }

    let (features, target): (Vec<Vec<f64>>, Vec<f64>) = usable
        .iter()
        .map(|(record, duration)| {
            let row = schema.encode(
                record.area_id,
                *duration as f64,
                record.total_cost(),
                &record.crop_type,
            );
            (row, record.profit())
        })
        .unzip();

    Ok(TrainingTable {
        schema,
        features,
        target,
        dropped_open_cycles: records.len() - usable.len(),
    })
}

/// Encode a hypothetical cycle against a frozen schema
pub fn build_scenario_row(scenario: &Scenario, schema: &FeatureSchema) -> Result<Vec<f64>> {
    scenario.validate().map_err(ProfitModelError::InvalidScenario)?;

    Ok(schema.encode(
        scenario.area_id,
        scenario.duration_days,
        scenario.total_cost,
        &scenario.crop_type,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Record for area 1 with the whole cost in `labor_cost`
    fn cycle(crop: &str, duration: i64, total_cost: f64, profit: f64) -> CropCycleRecord {
        let start = date(2024, 3, 1);
        CropCycleRecord::new(1, crop, start, Some(start + chrono::Duration::days(duration)))
            .with_costs(0.0, 0.0, total_cost, 0.0, 0.0)
            .with_revenue(total_cost + profit)
    }

    #[test]
    fn test_build_training_table() {
        let records = vec![
            cycle("Wheat", 90, 500.0, 200.0),
            cycle("Corn", 100, 600.0, 150.0),
            cycle("Wheat", 95, 550.0, 250.0),
        ];

        let table = build_training_table(&records).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.schema.crop_columns(), ["Wheat", "Corn"]);
        assert_eq!(table.target, vec![200.0, 150.0, 250.0]);
        assert_eq!(table.features[0], vec![1.0, 90.0, 500.0, 1.0, 0.0]);
        assert_eq!(table.features[1], vec![1.0, 100.0, 600.0, 0.0, 1.0]);
        assert_eq!(table.features[2], vec![1.0, 95.0, 550.0, 1.0, 0.0]);
        assert_eq!(table.dropped_open_cycles, 0);
    }

    #[test]
    fn test_column_names() {
        let schema = FeatureSchema::from_crops(["Wheat", "Corn"]);
        assert_eq!(
            schema.column_names(),
            vec![
                "area_id",
                "duration_days",
                "total_cost",
                "crop_type_Wheat",
                "crop_type_Corn"
            ]
        );
        assert_eq!(schema.width(), 5);
    }

    #[test]
    fn test_open_cycles_are_dropped_in_lockstep() {
        let mut open = cycle("Barley", 0, 100.0, 10.0);
        open.harvest_date = None;

        let records = vec![cycle("Wheat", 90, 500.0, 200.0), open, cycle("Corn", 100, 600.0, 150.0)];
        let table = build_training_table(&records).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.target.len(), 2);
        assert_eq!(table.dropped_open_cycles, 1);
        assert!(!table.schema.contains_crop("Barley"));
    }

    #[test]
    fn test_single_crop_is_insufficient() {
        let records = vec![cycle("Wheat", 90, 500.0, 200.0), cycle("Wheat", 95, 550.0, 250.0)];
        assert!(matches!(
            build_training_table(&records),
            Err(ProfitModelError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_second_crop_only_in_open_cycles_is_insufficient() {
        let mut open = cycle("Corn", 0, 100.0, 10.0);
        open.harvest_date = None;

        let records = vec![cycle("Wheat", 90, 500.0, 200.0), open];
        assert!(matches!(
            build_training_table(&records),
            Err(ProfitModelError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_empty_input_is_insufficient() {
        assert!(matches!(
            build_training_table(&[]),
            Err(ProfitModelError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let records = vec![
            cycle("Wheat", 90, 500.0, 200.0),
            cycle("Corn", -3, 600.0, 150.0),
        ];

        match build_training_table(&records) {
            Err(ProfitModelError::CorruptRecord { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected corrupt record error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_cycle_with_negative_cost_is_rejected() {
        let mut open = cycle("Oats", 0, 100.0, 10.0);
        open.harvest_date = None;
        open.seed_cost = -50.0;

        let records = vec![cycle("Wheat", 90, 500.0, 200.0), cycle("Corn", 100, 600.0, 150.0), open];

        match build_training_table(&records) {
            Err(ProfitModelError::CorruptRecord { index, reason }) => {
                assert_eq!(index, 2);
                assert!(reason.contains("seed_cost"));
            }
            other => panic!("expected corrupt record error, got {:?}", other),
        }
    }

    #[test]
    fn test_scenario_row_for_known_crop() {
        let schema = FeatureSchema::from_crops(["Wheat", "Corn"]);
        let row = build_scenario_row(&Scenario::new(2, "Corn", 80.0, 450.0), &schema).unwrap();
        assert_eq!(row, vec![2.0, 80.0, 450.0, 0.0, 1.0]);
    }

    #[test]
    fn test_scenario_row_for_unknown_crop() {
        let schema = FeatureSchema::from_crops(["Wheat", "Corn"]);
        let row = build_scenario_row(&Scenario::new(2, "Rice", 80.0, 450.0), &schema).unwrap();
        assert_eq!(row, vec![2.0, 80.0, 450.0, 0.0, 0.0]);
    }

    #[test]
    fn test_scenario_row_rejects_negative_duration() {
        let schema = FeatureSchema::from_crops(["Wheat", "Corn"]);
        let result = build_scenario_row(&Scenario::new(1, "Wheat", -5.0, 450.0), &schema);
        assert!(matches!(result, Err(ProfitModelError::InvalidScenario(_))));
    }

    proptest! {
        #[test]
        fn prop_scenario_row_matches_training_layout(
            crops in prop::collection::vec("[A-Za-z]{1,8}", 2..8),
            pick in any::<prop::sample::Index>(),
            area_id in 0i64..500,
            duration in 0i64..400,
            cost in 0.0f64..10_000.0,
        ) {
            let crop = pick.get(&crops).clone();
            let start = date(2024, 1, 1);

            // Every crop appears once so the training table builds
            let records: Vec<CropCycleRecord> = crops
                .iter()
                .map(|c| {
                    CropCycleRecord::new(area_id, c.clone(), start, Some(start + chrono::Duration::days(duration)))
                        .with_costs(cost, 0.0, 0.0, 0.0, 0.0)
                })
                .collect();
            prop_assume!(records.iter().map(|r| &r.crop_type).unique().count() >= 2);

            let table = build_training_table(&records).unwrap();
            let position = records.iter().position(|r| r.crop_type == crop).unwrap();
            let scenario = Scenario::new(area_id, crop, duration as f64, cost);
            let row = build_scenario_row(&scenario, &table.schema).unwrap();

            prop_assert_eq!(row.len(), table.schema.width());
            prop_assert_eq!(&row, &table.features[position]);
        }
    }
}
