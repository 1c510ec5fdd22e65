//! Closed value sets and the document status state machine.
//!
//! Every enumerated value that crosses the request boundary (statuses,
//! author types, decisions) is parsed against its allowed set before any
//! store access. Transitions among non-terminal statuses are
//! unconditional; a terminal status accepts no further transitions.

use crate::error::{TenderHubError, TenderHubResult};

/// A string-encoded enumeration with a fixed set of allowed values.
pub trait StringEnum: Sized + Copy + PartialEq + 'static {
    /// Request field name used in `InvalidValue` errors.
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> TenderHubResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| TenderHubError::invalid_value(Self::FIELD, value))
    }
}

/// Status of a versioned document.
pub trait DocumentStatus: StringEnum {
    fn is_terminal(&self) -> bool {
        false
    }

    /// Whether a document currently in `self` may move to `next`.
    fn can_transition_to(&self, _next: Self) -> bool {
        !self.is_terminal()
    }
}
