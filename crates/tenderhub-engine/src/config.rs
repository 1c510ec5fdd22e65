//! Engine configuration.

use tenderhub_core::repository::Pagination;

/// Configuration for the lifecycle engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Page size used when a list request gives none (default: 5).
    pub default_page_limit: u64,
    /// Upper bound on any requested page size (default: 100).
    pub max_page_limit: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_limit: 5,
            max_page_limit: 100,
        }
    }
}

impl EngineConfig {
    /// Resolve request paging into store pagination. A missing or zero
    /// limit falls back to the default; larger limits are clamped.
    pub fn page(&self, limit: Option<u64>, offset: Option<u64>) -> Pagination {
        let limit = match limit {
            None | Some(0) => self.default_page_limit,
            Some(limit) => limit.min(self.max_page_limit),
        };
        Pagination {
            offset: offset.unwrap_or(0),
            limit,
        }
    }
}
