//! Machine Learning Module
//!
//! Crop profitability prediction:
//! - Feature engineering over crop-cycle records with a frozen schema
//! - Random forest profit regression (SmartCore)
//! - Canonical-scenario crop recommendations
//!
//! # Architecture
//! - `features` builds training tables and scenario rows
//! - `smartcore` wraps the estimator
//! - `profitability` owns the published model and answers queries

pub mod error;
pub mod features;
pub mod profitability;
pub mod smartcore;
pub mod statistics;
pub mod training;

pub use error::ProfitModelError;
pub use features::{build_scenario_row, build_training_table, FeatureSchema, TrainingTable};
pub use profitability::{
    rank_by_profit, CanonicalBaseline, CropRecommendation, ModelProvenance, ProfitabilityModel,
    TrainedModel,
};
pub use training::TrainingMetrics;
