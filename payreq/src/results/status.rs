//! Derived statuses and the buckets they are filtered by.

use crate::capabilities::OrderLookup;
use crate::errors::{InvalidRequestParameterError, PayreqError, Result};
use crate::validation::validate_option;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Status of a fraud outcome once the order it belongs to is taken into
/// account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    /// Held for review, no decision yet.
    Review,
    /// Held for review, then approved by the merchant.
    ReviewAllowed,
    /// Held for review, then cancelled or failed.
    ReviewBlocked,
    /// Blocked outright.
    Blocked,
}

impl DerivedStatus {
    /// Returns the snake case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::ReviewAllowed => "review_allowed",
            Self::ReviewBlocked => "review_blocked",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The status group a list is filtered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    /// Outcomes still waiting on the merchant.
    Review,
    /// Outcomes that ended up blocking the payment.
    Block,
}

impl StatusBucket {
    /// Wire names of every bucket.
    pub const NAMES: &'static [&'static str] = &["review", "block"];

    /// Parses a `status` parameter, failing with an invalid option error.
    pub fn from_param(value: &str) -> Result<Self, InvalidRequestParameterError> {
        let name = validate_option(value, "status", Self::NAMES)?;
        Ok(if name == "block" { Self::Block } else { Self::Review })
    }

    /// Parses the wire name (`review` or `block`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "review" => Some(Self::Review),
            "block" => Some(Self::Block),
            _ => None,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Block => "block",
        }
    }

    /// True if `status` belongs to this bucket.
    #[must_use]
    pub fn contains(self, status: DerivedStatus) -> bool {
        match self {
            Self::Review => status == DerivedStatus::Review,
            Self::Block => matches!(status, DerivedStatus::Blocked | DerivedStatus::ReviewBlocked),
        }
    }
}

/// Computes the derived status of a raw record.
pub trait StatusLookup: Send + Sync {
    /// Derives the status of `record`.
    fn derive_status(&self, record: &serde_json::Value) -> Result<DerivedStatus>;
}

/// Derives statuses by joining fraud outcome records with their orders.
///
/// `block` outcomes are [`DerivedStatus::Blocked`]. `review` outcomes
/// follow the order: cancelled or failed orders make them
/// [`DerivedStatus::ReviewBlocked`], paid orders
/// [`DerivedStatus::ReviewAllowed`], anything else stays
/// [`DerivedStatus::Review`].
pub struct OrderStatusLookup {
    orders: Arc<dyn OrderLookup>,
}

impl OrderStatusLookup {
    /// Creates a lookup over `orders`.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderLookup>) -> Self {
        Self { orders }
    }
}

impl fmt::Debug for OrderStatusLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderStatusLookup").finish_non_exhaustive()
    }
}

impl StatusLookup for OrderStatusLookup {
    fn derive_status(&self, record: &serde_json::Value) -> Result<DerivedStatus> {
        let status = record
            .get("status")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| malformed("Fraud outcome has no status"))?;
        if status == "block" {
            return Ok(DerivedStatus::Blocked);
        }
        if status != "review" {
            return Err(malformed(&format!("Unknown fraud outcome status '{status}'")));
        }

        let order_id = order_id(record)
            .ok_or_else(|| malformed("Fraud outcome has no order id"))?;
        let order = self.orders.find_order(order_id)?;
        Ok(match order.status.as_str() {
            "cancelled" | "failed" => DerivedStatus::ReviewBlocked,
            "processing" | "completed" => DerivedStatus::ReviewAllowed,
            _ => DerivedStatus::Review,
        })
    }
}

fn malformed(message: &str) -> PayreqError {
    PayreqError::Serialization(message.to_string())
}

/// Reads `order_id` as a number or a numeric string.
pub(crate) fn order_id(record: &serde_json::Value) -> Option<u64> {
    match record.get("order_id")? {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
