use anyhow::{Context, Result};
use crop_profit_engine::analytics::{CostBreakdown, PredictionComparison, ProfitSummary};
use crop_profit_engine::ml::ModelProvenance;
use crop_profit_engine::{config, telemetry};
use crop_profit_engine::{CropCycleRecord, CropRecommendation, ProfitModelError, ProfitabilityModel};
use config::Config;
use serde::Serialize;
use telemetry::init_tracing;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<ModelProvenance>,
    recommendations: Vec<CropRecommendation>,
    /// Top recommendation against its historical average
    #[serde(skip_serializing_if = "Option::is_none")]
    top_pick: Option<PredictionComparison>,
    summary: ProfitSummary,
    costs: CostBreakdown,
    /// Percent of total spend per cost category
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_shares_percent: Option<[(&'static str, f64); 5]>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    let path = &cfg.data.records_path;

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read crop cycle records from {}", path.display()))?;
    let records: Vec<CropCycleRecord> =
        serde_json::from_str(&raw).context("failed to parse crop cycle records")?;

    info!(records = records.len(), path = %path.display(), "loaded crop cycle records");

    let summary = ProfitSummary::from_records(&records);
    let costs = CostBreakdown::from_records(&records);
    let cost_shares_percent = costs.shares_percent();
    let engine = ProfitabilityModel::new(cfg.forest.clone());

    let report = match engine.fit(&records) {
        Ok(trained) => {
            let recommendations = trained.recommend_crops(&records)?;
            let top_pick = recommendations
                .first()
                .and_then(|top| summary.compare_prediction(&top.crop_type, top.predicted_profit));

            Report {
                model: Some(trained.provenance().clone()),
                recommendations,
                top_pick,
                summary,
                costs,
                cost_shares_percent,
            }
        }
        Err(ProfitModelError::InsufficientData(reason)) => {
            warn!(%reason, "not enough history for profit predictions");
            Report {
                model: None,
                recommendations: Vec::new(),
                top_pick: None,
                summary,
                costs,
                cost_shares_percent,
            }
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &report)?;
    println!();

    Ok(())
}
