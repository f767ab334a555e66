//! Crop profitability prediction engine
//!
//! Learns how crop choice, cycle duration, spend and farm area relate to
//! realized profit, then prices hypothetical cycles and ranks crop types
//! under matched conditions.

pub mod analytics;
pub mod config;
pub mod domain;
pub mod ml;
pub mod telemetry;

pub use domain::{CropCycleRecord, Scenario};
pub use ml::{CropRecommendation, ProfitModelError, ProfitabilityModel};
