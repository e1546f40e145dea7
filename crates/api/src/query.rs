//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Largest page a client may request.
const MAX_LIMIT: i64 = 50;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Used by every listing handler. The limit defaults to the configured
/// page size and is clamped to `1..=50`; negative offsets collapse to 0.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Resolve to a concrete `(limit, offset)` pair.
    pub fn resolve(&self, default_limit: i64) -> (i64, i64) {
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let params = PaginationParams::default();
        assert_eq!(params.resolve(6), (6, 0));
    }

    #[test]
    fn limit_is_clamped() {
        let params = PaginationParams {
            limit: Some(500),
            offset: Some(-3),
        };
        assert_eq!(params.resolve(6), (50, 0));

        let params = PaginationParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(params.resolve(6), (1, 0));
    }
}
