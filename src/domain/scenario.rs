use serde::{Deserialize, Serialize};

/// A hypothetical future crop cycle to price with the trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub area_id: i64,
    pub crop_type: String,
    /// Planned days from planting to harvest (may be fractional for medians)
    pub duration_days: f64,
    /// Planned spend across all cost categories
    pub total_cost: f64,
}

impl Scenario {
    pub fn new(area_id: i64, crop_type: impl Into<String>, duration_days: f64, total_cost: f64) -> Self {
        Self {
            area_id,
            crop_type: crop_type.into(),
            duration_days,
            total_cost,
        }
    }

    /// Validate inputs for sanity
    pub fn validate(&self) -> Result<(), String> {
        if !self.duration_days.is_finite() {
            return Err("duration_days must be finite".to_string());
        }

        if self.duration_days < 0.0 {
            return Err(format!("duration_days cannot be negative ({})", self.duration_days));
        }

        if !self.total_cost.is_finite() {
            return Err("total_cost must be finite".to_string());
        }

        if self.total_cost < 0.0 {
            return Err(format!("total_cost cannot be negative ({:.2})", self.total_cost));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_valid_scenario() {
        let scenario = Scenario::new(1, "Wheat", 90.0, 500.0);
        assert!(scenario.validate().is_ok());
    }

    #[rstest]
    #[case(-5.0, 500.0)]
    #[case(90.0, -0.01)]
    #[case(f64::NAN, 500.0)]
    #[case(90.0, f64::INFINITY)]
    fn test_invalid_scenario(#[case] duration_days: f64, #[case] total_cost: f64) {
        let scenario = Scenario::new(1, "Wheat", duration_days, total_cost);
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_zero_values_are_allowed() {
        assert!(Scenario::new(1, "Wheat", 0.0, 0.0).validate().is_ok());
    }
}
