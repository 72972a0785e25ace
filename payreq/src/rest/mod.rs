//! Adapters from inbound REST parameters to requests.
//!
//! Handlers hand over either the raw query string or the JSON body. Only
//! parameters the caller actually sent reach a setter; absent and `null`
//! values leave the request's defaults alone.

use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

use crate::capabilities::{DateFilters, Pagination};
use crate::errors::{codes, InvalidRequestParameterError, PayreqError, Result};
use crate::request::{RequestType, Transport};
use crate::requests::ListFraudOutcomeTransactions;
use crate::results::{StatusBucket, StatusLookup};

/// Parameters of an inbound REST call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestParameters {
    values: IndexMap<String, Value>,
}

impl RestParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string.
    ///
    /// `key[]=a&key[]=b` and repeated keys collect into an array.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let (key, is_list) = match key.strip_suffix("[]") {
                Some(stripped) => (stripped.to_string(), true),
                None => (key.into_owned(), false),
            };
            let value = Value::String(value.into_owned());
            match params.values.get_mut(&key) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None if is_list => {
                    params.values.insert(key, Value::Array(vec![value]));
                }
                None => {
                    params.values.insert(key, value);
                }
            }
        }
        params
    }

    /// Parses a JSON body, which must be an object.
    pub fn from_json(body: &str) -> Result<Self> {
        match serde_json::from_str(body)? {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            other => Err(PayreqError::Serialization(format!(
                "Expected a JSON object body, got {other}"
            ))),
        }
    }

    /// Sets a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns the value of `name` unless it is absent or `null`.
    #[must_use]
    pub fn present(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// Calls `setter` with the value of `name` if present.
    ///
    /// Returns whether the setter ran.
    pub fn apply<F>(&self, name: &str, setter: F) -> Result<bool>
    where
        F: FnOnce(&Value) -> Result<()>,
    {
        match self.present(name) {
            Some(value) => setter(value).map(|()| true),
            None => Ok(false),
        }
    }

    /// Returns the number of parameters, `null` ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameters were sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn text<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value.as_str().ok_or_else(|| {
        InvalidRequestParameterError::new(
            codes::OPTION,
            format!("The value of {field} must be a string, got {value}"),
        )
        .with_field(field)
        .with_value(value.clone())
        .into()
    })
}

fn integer(value: &Value, field: &str) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        InvalidRequestParameterError::new(
            codes::INTEGER,
            format!("The value of {field} must be a whole number, got {value}"),
        )
        .with_field(field)
        .with_value(value.clone())
        .into()
    })
}

/// Search terms arrive as a list or a single comma-separated string.
fn terms(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => items.iter().map(|item| text(item, "search").map(str::to_string)).collect(),
        other => Ok(text(other, "search")?
            .split(',')
            .map(str::to_string)
            .collect()),
    }
}

/// Builds a fraud outcome listing from REST parameters.
///
/// Maps `status`, `search`, `sort`, `direction`, `page`, `pagesize`,
/// `date_before` and `date_after`. A missing `status` surfaces later as a
/// missing parameter when the request is prepared.
pub fn list_fraud_outcomes_from_rest(
    transport: Transport,
    params: &RestParameters,
    lookup: Option<Arc<dyn StatusLookup>>,
) -> Result<ListFraudOutcomeTransactions> {
    let mut request = ListFraudOutcomeTransactions::create(transport, None)?;

    params.apply("status", |v| {
        let bucket = StatusBucket::from_param(text(v, "status")?)?;
        request.set_status(bucket)
    })?;
    params.apply("search", |v| request.set_search(&terms(v)?))?;
    params.apply("sort", |v| request.set_sort_by(text(v, "sort")?))?;
    params.apply("direction", |v| request.set_sort_direction(text(v, "direction")?))?;
    params.apply("page", |v| request.set_page(integer(v, "page")?))?;
    params.apply("pagesize", |v| request.set_page_size(integer(v, "pagesize")?))?;
    params.apply("date_before", |v| request.set_date_before(text(v, "date_before")?))?;
    params.apply("date_after", |v| request.set_date_after(text(v, "date_after")?))?;

    if let Some(lookup) = lookup {
        request.set_status_lookup(lookup);
    }
    Ok(request)
}
