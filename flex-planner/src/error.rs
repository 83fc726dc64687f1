//! Top-level error type.

use crate::request::ParameterError;
use crate::transit::DataError;

/// Anything that can stop a plan request from being answered.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The request parameters are invalid
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// The data needed to answer the request is missing or broken
    #[error(transparent)]
    Data(#[from] DataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_without_changing_message() {
        let err: PlannerError = ParameterError::MissingParameter("fromPlace").into();
        assert!(matches!(err, PlannerError::Parameter(_)));
        assert_eq!(
            err.to_string(),
            ParameterError::MissingParameter("fromPlace").to_string()
        );

        let err: PlannerError = DataError::RouterNotFound("nyc".into()).into();
        assert_eq!(err.to_string(), "unknown router: nyc");
    }
}
