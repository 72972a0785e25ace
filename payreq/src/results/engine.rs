//! Filtering, searching and sorting of list replies.

use super::{FilterSpec, SortDirection, StatusLookup};
use crate::response::Response;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::LazyLock;
use tracing::{debug, warn};

#[allow(clippy::expect_used)]
static ORDER_NUMBER_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(\d+)$").expect("order number pattern is valid"));

/// Record key holding the customer-facing order number.
pub const ORDER_NUMBER_FIELD: &str = "order_number";
/// Record key holding the customer name.
pub const CUSTOMER_NAME_FIELD: &str = "customer_name";

/// A record left out because its status could not be derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position in the input list.
    pub index: usize,
    /// Error code of the failed lookup.
    pub code: String,
    /// Error message of the failed lookup.
    pub reason: String,
}

/// Output of [`process`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedResults {
    /// Matching records in output order.
    pub records: Vec<serde_json::Value>,
    /// Records dropped by lookup failures.
    pub skipped: Vec<SkippedRecord>,
}

impl ProcessedResults {
    /// Number of records kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if any record was dropped by a lookup failure.
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Wraps the kept records in a read-only response.
    #[must_use]
    pub fn into_response(self) -> Response {
        Response::from_records(self.records)
    }
}

/// Filters `records` to `spec.bucket`, applies the search terms and sorts.
///
/// A record whose status lookup fails is logged, reported in
/// [`ProcessedResults::skipped`] and left out; the rest of the list is
/// still returned.
pub fn process(
    records: Vec<serde_json::Value>,
    spec: &FilterSpec,
    lookup: &dyn StatusLookup,
) -> ProcessedResults {
    let total = records.len();
    let mut kept = Vec::with_capacity(total);
    let mut skipped = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let status = match lookup.derive_status(&record) {
            Ok(status) => status,
            Err(e) => {
                warn!(index, error = %e, code = e.code(), "Skipping record: status lookup failed");
                skipped.push(SkippedRecord {
                    index,
                    code: e.code().to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if spec.bucket.contains(status) && matches_search(&record, &spec.search) {
            kept.push(record);
        }
    }

    if let Some(key) = &spec.sort_by {
        sort_records(&mut kept, key, spec.direction);
    }

    debug!(
        total,
        kept = kept.len(),
        skipped = skipped.len(),
        bucket = spec.bucket.as_str(),
        "Processed list results"
    );
    ProcessedResults {
        records: kept,
        skipped,
    }
}

/// True if `terms` is empty or any term matches the record.
///
/// `#<digits>` matches the order number exactly; any other term is a
/// case-insensitive substring of the customer name.
pub fn matches_search(record: &serde_json::Value, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    terms.iter().any(|term| match ORDER_NUMBER_TERM.captures(term) {
        Some(caps) => order_number(record).is_some_and(|n| n == caps[1]),
        None => record
            .get(CUSTOMER_NAME_FIELD)
            .and_then(serde_json::Value::as_str)
            .is_some_and(|name| name.to_lowercase().contains(&term.to_lowercase())),
    })
}

fn order_number(record: &serde_json::Value) -> Option<String> {
    match record.get(ORDER_NUMBER_FIELD)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stable sort by `key`.
///
/// Records missing the key (or holding `null`) keep their positions; the
/// others are ordered among the remaining slots. Equal keys keep their
/// input order in both directions.
pub fn sort_records(records: &mut [serde_json::Value], key: &str, direction: SortDirection) {
    let slots: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.get(key).is_some_and(|v| !v.is_null()))
        .map(|(i, _)| i)
        .collect();

    let mut keyed: Vec<serde_json::Value> = slots
        .iter()
        .map(|&i| std::mem::take(&mut records[i]))
        .collect();
    keyed.sort_by(|a, b| {
        let ordering = compare_values(&a[key], &b[key]);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    for (slot, record) in slots.into_iter().zip(keyed) {
        records[slot] = record;
    }
}

/// Total order over JSON scalars: booleans, then numbers, then strings,
/// then composite values.
fn compare_values(a: &serde_json::Value, b: &serde_json::Value) -> Ordering {
    fn rank(value: &serde_json::Value) -> u8 {
        match value {
            serde_json::Value::Null => 0,
            serde_json::Value::Bool(_) => 1,
            serde_json::Value::Number(_) => 2,
            serde_json::Value::String(_) => 3,
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => 4,
        }
    }

    match (a, b) {
        (serde_json::Value::Bool(x), serde_json::Value::Bool(y)) => x.cmp(y),
        (serde_json::Value::Number(x), serde_json::Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (serde_json::Value::String(x), serde_json::Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
