//! Paged list parameters.

use crate::errors::Result;
use crate::request::Request;
use crate::validation::{validate_identifier, validate_lower_bound, validate_option, Bound};
use serde_json::json;

/// Accepted sort directions.
pub const SORT_DIRECTIONS: &[&str] = &["asc", "desc"];

/// Page, page size and ordering of a list endpoint.
pub trait Pagination: Request {
    /// Sets the 1-based page number.
    fn set_page(&mut self, page: i64) -> Result<()> {
        validate_lower_bound(&json!(page), 1.0, Bound::Inclusive, "page")?;
        self.core_mut().set_param("page", json!(page))
    }

    /// Sets the number of records per page.
    fn set_page_size(&mut self, page_size: i64) -> Result<()> {
        validate_lower_bound(&json!(page_size), 0.0, Bound::Exclusive, "pagesize")?;
        self.core_mut().set_param("pagesize", json!(page_size))
    }

    /// Sets the field to sort by.
    fn set_sort_by(&mut self, field: &str) -> Result<()> {
        validate_identifier(field, "sort")?;
        self.core_mut().set_param("sort", json!(field))
    }

    /// Sets the sort direction, `asc` or `desc` (case-insensitive).
    fn set_sort_direction(&mut self, direction: &str) -> Result<()> {
        let direction = validate_option(&direction.to_ascii_lowercase(), "direction", SORT_DIRECTIONS)?;
        self.core_mut().set_param("direction", json!(direction))
    }
}
