use thiserror::Error;

/// Failures reported by the profitability engine
#[derive(Debug, Error)]
pub enum ProfitModelError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Corrupt record at position {index}: {reason}")]
    CorruptRecord { index: usize, reason: String },

    #[error("Model has not been trained")]
    ModelNotTrained,

    #[error("Model fitting failed")]
    ModelFitting(#[source] smartcore::error::Failed),

    #[error("Inference failed")]
    Inference(#[source] smartcore::error::Failed),
}

pub type Result<T> = std::result::Result<T, ProfitModelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let error = ProfitModelError::CorruptRecord {
            index: 4,
            reason: "harvest_date precedes start_date by 5 days".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Corrupt record at position 4: harvest_date precedes start_date by 5 days"
        );
        assert_eq!(ProfitModelError::ModelNotTrained.to_string(), "Model has not been trained");
    }

    #[test]
    fn test_fitting_error_keeps_cause() {
        let cause = smartcore::error::Failed::fit("degenerate input");
        let error = ProfitModelError::ModelFitting(cause);
        assert!(error.source().is_some());
    }
}
