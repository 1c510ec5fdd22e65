//! Failure reporting at the service boundary.

use tenderhub_core::error::TenderHubResult;
use tracing::error;

pub(crate) trait LogUnknown<T> {
    /// Log an unclassified store or internal failure once, then pass the
    /// result through unchanged.
    fn log_unknown(self, operation: &'static str) -> TenderHubResult<T>;
}

impl<T> LogUnknown<T> for TenderHubResult<T> {
    fn log_unknown(self, operation: &'static str) -> TenderHubResult<T> {
        if let Err(err) = &self {
            if err.is_unknown() {
                error!(operation, error = %err, "Operation failed");
            }
        }
        self
    }
}
