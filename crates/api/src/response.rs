//! Shared response types for API handlers.

use serde::Serialize;

/// Paginated listing envelope.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
