use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One planting-to-harvest cycle on a farm area, joined with its owning area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropCycleRecord {
    /// Store key of the cycle, if the supplier has one
    #[serde(default)]
    pub cycle_id: Option<i64>,

    /// Owning farm area
    pub area_id: i64,

    /// Free-text crop label as entered historically
    pub crop_type: String,

    pub start_date: NaiveDate,

    /// Absent for cycles that have not been harvested yet
    #[serde(default)]
    pub harvest_date: Option<NaiveDate>,

    #[serde(default)]
    pub seed_cost: f64,
    #[serde(default)]
    pub fertilizer_cost: f64,
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub equipment_cost: f64,
    #[serde(default)]
    pub other_costs: f64,

    #[serde(default)]
    pub total_revenue: f64,

    #[serde(default)]
    pub notes: Option<String>,
}

impl CropCycleRecord {
    /// Create a record with zero costs and revenue
    pub fn new(
        area_id: i64,
        crop_type: impl Into<String>,
        start_date: NaiveDate,
        harvest_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            cycle_id: None,
            area_id,
            crop_type: crop_type.into(),
            start_date,
            harvest_date,
            seed_cost: 0.0,
            fertilizer_cost: 0.0,
            labor_cost: 0.0,
            equipment_cost: 0.0,
            other_costs: 0.0,
            total_revenue: 0.0,
            notes: None,
        }
    }

    /// Set the five cost categories (seed, fertilizer, labor, equipment, other)
    pub fn with_costs(
        mut self,
        seed: f64,
        fertilizer: f64,
        labor: f64,
        equipment: f64,
        other: f64,
    ) -> Self {
        self.seed_cost = seed;
        self.fertilizer_cost = fertilizer;
        self.labor_cost = labor;
        self.equipment_cost = equipment;
        self.other_costs = other;
        self
    }

    pub fn with_revenue(mut self, total_revenue: f64) -> Self {
        self.total_revenue = total_revenue;
        self
    }

    /// Sum of all cost categories
    pub fn total_cost(&self) -> f64 {
        self.seed_cost + self.fertilizer_cost + self.labor_cost + self.equipment_cost + self.other_costs
    }

    /// Realized profit (revenue minus total cost)
    pub fn profit(&self) -> f64 {
        self.total_revenue - self.total_cost()
    }

    /// Whole days from start to harvest, or `None` for an open cycle.
    ///
    /// May be negative when the dates were entered in the wrong order; callers
    /// that train on the value must reject that case.
    pub fn duration_days(&self) -> Option<i64> {
        self.harvest_date
            .map(|harvest| harvest.signed_duration_since(self.start_date).num_days())
    }

    /// Check money fields and, for harvested cycles, date ordering
    pub fn validate(&self) -> Result<(), String> {
        let money = [
            ("seed_cost", self.seed_cost),
            ("fertilizer_cost", self.fertilizer_cost),
            ("labor_cost", self.labor_cost),
            ("equipment_cost", self.equipment_cost),
            ("other_costs", self.other_costs),
            ("total_revenue", self.total_revenue),
        ];

        for (name, value) in money {
            if !value.is_finite() {
                return Err(format!("{} must be a finite amount", name));
            }
            if value < 0.0 {
                return Err(format!("{} cannot be negative ({:.2})", name, value));
            }
        }

        if let Some(days) = self.duration_days() {
            if days < 0 {
                return Err(format!(
                    "harvest_date precedes start_date by {} days",
                    days.abs()
                ));
            }
        }

        Ok(())
    }
}
