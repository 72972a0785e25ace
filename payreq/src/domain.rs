//! Domain objects some requests format their replies into.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Summary of a charge as embedded in other objects or fetched on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Charge id (`ch_` or `py_`).
    pub id: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Lower-case currency code.
    pub currency: String,
    /// Remote status string.
    pub status: String,
    /// Amount refunded so far.
    #[serde(default)]
    pub amount_refunded: i64,
    /// Creation time.
    #[serde(deserialize_with = "timestamp")]
    pub created: DateTime<Utc>,
}

/// A payment intention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntention {
    /// Intention id (`pi_`).
    pub id: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Lower-case currency code.
    pub currency: String,
    /// Remote status string.
    pub status: String,
    /// Client secret for front-end confirmation.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Customer id.
    #[serde(default)]
    pub customer: Option<String>,
    /// Payment method id.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Latest charge, when expanded.
    #[serde(default)]
    pub charge: Option<Charge>,
    /// Creation time.
    #[serde(deserialize_with = "timestamp")]
    pub created: DateTime<Utc>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl PaymentIntention {
    /// True once the remote side has captured the funds.
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }

    /// True while the customer still has to act.
    #[must_use]
    pub fn requires_action(&self) -> bool {
        self.status == "requires_action"
    }
}

/// Accepts either a unix timestamp or an RFC 3339 string.
fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Unix(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Unix(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp {secs} out of range"))),
        Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intention_from_reply() {
        let intention: PaymentIntention = serde_json::from_value(json!({
            "id": "pi_1",
            "amount": 1500,
            "currency": "usd",
            "status": "succeeded",
            "created": 1_700_000_000,
            "charge": {
                "id": "ch_1",
                "amount": 1500,
                "currency": "usd",
                "status": "succeeded",
                "created": "2023-11-14T22:13:20Z"
            }
        }))
        .unwrap();

        assert!(intention.is_succeeded());
        assert!(!intention.requires_action());
        let charge = intention.charge.unwrap();
        assert_eq!(charge.created, intention.created);
        assert_eq!(charge.amount_refunded, 0);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let result: Result<Charge, _> = serde_json::from_value(json!({
            "id": "ch_1", "amount": 1, "currency": "usd", "status": "x", "created": "yesterday"
        }));
        assert!(result.is_err());
    }
}
