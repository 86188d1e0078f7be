use thiserror::Error;

/// Why a single form submission failed.
///
/// Every variant is terminal for the submission it came from; the form stays
/// usable and the user resubmits after fixing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Latitude or longitude was blank; no request was issued.
    #[error("Please enter both latitude and longitude.")]
    MissingCoordinates,

    /// Latitude, longitude or API key was blank; no request was issued.
    #[error("Please enter latitude, longitude, and API key.")]
    MissingCoordinatesOrKey,

    /// The request did not complete with a 2xx status.
    #[error("Failed to fetch solar data.")]
    TransportFailure,

    /// The response parsed but carried no DNI value for the location.
    #[error("Data not available for the specified location.")]
    DataUnavailable,

    #[error("{0}")]
    Unexpected(String),
}

impl QueryError {
    pub fn is_missing_input(&self) -> bool {
        matches!(self, QueryError::MissingCoordinates | QueryError::MissingCoordinatesOrKey)
    }
}

impl From<anyhow::Error> for QueryError {
    fn from(err: anyhow::Error) -> Self {
        QueryError::Unexpected(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages() {
        assert_eq!(
            QueryError::MissingCoordinates.to_string(),
            "Please enter both latitude and longitude."
        );
        assert_eq!(QueryError::TransportFailure.to_string(), "Failed to fetch solar data.");
        assert_eq!(
            QueryError::DataUnavailable.to_string(),
            "Data not available for the specified location."
        );
    }

    #[test]
    fn unexpected_keeps_context_chain() {
        let err = anyhow::anyhow!("expected value at line 1 column 1")
            .context("Failed to parse NREL solar resource JSON");
        let query_err = QueryError::from(err);

        let msg = query_err.to_string();
        assert!(msg.starts_with("Failed to parse NREL solar resource JSON"));
        assert!(msg.contains("expected value"));
        assert!(!query_err.is_missing_input());
    }
}
