//! Fraud outcome listing with client-side status derivation.

use super::BASE_REQUEST;
use crate::capabilities::{DateFilters, Pagination, SORT_DIRECTIONS};
use crate::contracts::{HttpMethod, RequestDescriptor};
use crate::errors::{codes, InvalidRequestParameterError, PayreqError, Result};
use crate::request::{FormattedReply, Request, RequestCore, RequestType, Transport};
use crate::results::{process, FilterSpec, SortDirection, StatusBucket, StatusLookup};
use crate::validation::validate_option;
use serde_json::{json, Value};
use std::sync::Arc;

static LIST_FRAUD_OUTCOMES: RequestDescriptor = RequestDescriptor {
    name: "list_fraud_outcome_transactions",
    parent: Some(&BASE_REQUEST),
    required: &["status"],
    method: Some(HttpMethod::Get),
    endpoint: Some("fraud_outcomes/status"),
    extension_point: Some("payreq_list_fraud_outcome_transactions_request"),
    ..RequestDescriptor::BLANK
};

/// Lists fraud outcomes of one status bucket.
///
/// The remote endpoint returns the raw outcomes of the bucket's base
/// status. With a [`StatusLookup`] attached, the reply is re-filtered by
/// derived status, searched and sorted before it is returned.
#[derive(Debug)]
pub struct ListFraudOutcomeTransactions {
    core: RequestCore,
}

type SharedLookup = Arc<dyn StatusLookup>;

impl ListFraudOutcomeTransactions {
    /// Creates a listing for `bucket`.
    pub fn for_bucket(transport: Transport, bucket: StatusBucket) -> Result<Self> {
        let mut request = Self::create(transport, None)?;
        request.set_status(bucket)?;
        Ok(request)
    }

    /// Sets the status bucket.
    pub fn set_status(&mut self, bucket: StatusBucket) -> Result<()> {
        self.core_mut().set_param("status", json!(bucket.as_str()))
    }

    /// Sets the search terms.
    pub fn set_search(&mut self, terms: &[String]) -> Result<()> {
        self.core_mut().set_param("search", json!(terms))
    }

    /// Attaches the lookup used to derive record statuses.
    ///
    /// The lookup is kept on the core, so it survives `extend`.
    pub fn set_status_lookup(&mut self, lookup: Arc<dyn StatusLookup>) {
        self.core.attach::<SharedLookup>(lookup);
    }

    /// The attached status lookup, if any.
    pub fn status_lookup(&self) -> Option<&Arc<dyn StatusLookup>> {
        self.core.attachments().get::<SharedLookup>()
    }

    fn text_param(&self, key: &str) -> Result<Option<String>> {
        if !self.core.has_param(key) {
            return Ok(None);
        }
        match self.get_param(key)? {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text)),
            other => Err(not_text(key, other)),
        }
    }

    /// A single string counts as one search term.
    fn search_terms(&self) -> Result<Vec<String>> {
        if !self.core.has_param("search") {
            return Ok(Vec::new());
        }
        match self.get_param("search")? {
            Value::Null => Ok(Vec::new()),
            Value::String(term) => Ok(vec![term]),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(term) => Ok(term),
                    other => Err(not_text("search", other)),
                })
                .collect(),
            other => Err(not_text("search", other)),
        }
    }

    /// Builds the post-processing spec from the current parameters.
    ///
    /// Malformed `search`, `sort` or `direction` values are errors.
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        let status = self.get_param("status")?;
        let bucket = StatusBucket::from_param(
            status.as_str().ok_or_else(|| not_text("status", status.clone()))?,
        )?;
        let mut spec = FilterSpec::new(bucket).with_search(self.search_terms()?);

        if let Some(key) = self.text_param("sort")? {
            let direction = match self.text_param("direction")? {
                Some(direction) => {
                    let name = validate_option(&direction.to_ascii_lowercase(), "direction", SORT_DIRECTIONS)?;
                    SortDirection::parse(name).unwrap_or_default()
                }
                None => SortDirection::default(),
            };
            spec = spec.with_sort(key, direction);
        }
        Ok(spec)
    }
}

fn not_text(field: &str, value: Value) -> PayreqError {
    InvalidRequestParameterError::new(
        codes::OPTION,
        format!("The value of {field} must be a string, got {value}"),
    )
    .with_field(field)
    .with_value(value)
    .into()
}

impl Request for ListFraudOutcomeTransactions {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }

    /// `fraud_outcomes/status/<bucket>`.
    fn get_api(&self) -> Result<String> {
        let spec = self.filter_spec()?;
        Ok(format!("{}/{}", self.core.default_api()?, spec.bucket.as_str()))
    }

    fn format_response(&self, reply: Result<serde_json::Value>) -> Result<FormattedReply> {
        let reply = reply?;
        let Some(lookup) = self.status_lookup() else {
            return Ok(FormattedReply::Response(reply.into()));
        };
        let records: Vec<serde_json::Value> = serde_json::from_value(reply)?;
        let spec = self.filter_spec()?;
        Ok(FormattedReply::Results(process(records, &spec, lookup.as_ref())))
    }
}

impl RequestType for ListFraudOutcomeTransactions {
    fn type_descriptor() -> &'static RequestDescriptor {
        &LIST_FRAUD_OUTCOMES
    }

    fn from_core(core: RequestCore) -> Self {
        Self { core }
    }
}

impl Pagination for ListFraudOutcomeTransactions {}
impl DateFilters for ListFraudOutcomeTransactions {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::codes;
    use crate::results::DerivedStatus;
    use crate::testing::{assert_invalid_parameter, mock_transport, StaticStatusLookup};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_required() {
        let request = ListFraudOutcomeTransactions::create(mock_transport(), None).unwrap();
        assert_invalid_parameter(&request.get_params(), codes::MISSING_PARAMETERS);
        assert!(request.get_api().is_err());
    }

    #[test]
    fn test_api_and_params() {
        let mut request =
            ListFraudOutcomeTransactions::for_bucket(mock_transport(), StatusBucket::Block).unwrap();
        request.set_page(1).unwrap();
        request.set_page_size(20).unwrap();
        request.set_sort_by("created").unwrap();
        request.set_sort_direction("desc").unwrap();
        request.set_search(&["#42".to_string()]).unwrap();

        assert_eq!(request.get_api().unwrap(), "fraud_outcomes/status/block");
        let params = request.get_params().unwrap();
        assert_eq!(params["status"], json!("block"));
        assert_eq!(params["search"], json!(["#42"]));

        let spec = request.filter_spec().unwrap();
        assert_eq!(spec.bucket, StatusBucket::Block);
        assert_eq!(spec.search, vec!["#42"]);
        assert_eq!(spec.sort_by.as_deref(), Some("created"));
        assert_eq!(spec.direction, SortDirection::Descending);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut request = ListFraudOutcomeTransactions::create(mock_transport(), None).unwrap();
        request.core_mut().set_param("status", json!("allow")).unwrap();
        assert_invalid_parameter(&request.filter_spec(), codes::OPTION);
    }

    #[test]
    fn test_format_without_lookup_wraps_raw() {
        let request =
            ListFraudOutcomeTransactions::for_bucket(mock_transport(), StatusBucket::Review).unwrap();
        let reply = request.format_response(Ok(json!([{"id": "a"}]))).unwrap();
        assert_eq!(reply.as_response().unwrap()[0]["id"], json!("a"));
    }

    #[test]
    fn test_format_with_lookup_processes() {
        let mut request =
            ListFraudOutcomeTransactions::for_bucket(mock_transport(), StatusBucket::Review).unwrap();
        request.set_status_lookup(Arc::new(
            StaticStatusLookup::new()
                .with_status("a", DerivedStatus::Review)
                .with_status("b", DerivedStatus::ReviewBlocked)
                .with_status("c", DerivedStatus::Review),
        ));
        request.set_sort_by("amount").unwrap();
        request.set_sort_direction("desc").unwrap();

        let reply = request
            .format_response(Ok(json!([
                {"id": "a", "amount": 2},
                {"id": "b", "amount": 3},
                {"id": "c", "amount": 5},
                {"id": "d", "amount": 1}
            ])))
            .unwrap();
        let results = reply.as_results().unwrap();
        let ids: Vec<_> = results.records.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!("c"), json!("a")]);
        assert_eq!(results.skipped.len(), 1);
        assert_eq!(results.skipped[0].index, 3);
    }

    #[test]
    fn test_format_with_lookup_rejects_non_list() {
        let mut request =
            ListFraudOutcomeTransactions::for_bucket(mock_transport(), StatusBucket::Review).unwrap();
        request.set_status_lookup(Arc::new(StaticStatusLookup::new()));
        let err = request.format_response(Ok(json!({"data": []}))).unwrap_err();
        assert_eq!(err.code(), codes::SERIALIZATION);
    }

    #[test]
    fn test_single_search_string_is_one_term() {
        let mut request =
            ListFraudOutcomeTransactions::for_bucket(mock_transport(), StatusBucket::Review).unwrap();
        request.core_mut().set_param("search", json!("jane")).unwrap();
        assert_eq!(request.filter_spec().unwrap().search, vec!["jane"]);
    }

    #[test]
    fn test_malformed_search_and_direction_rejected() {
        let mut request =
            ListFraudOutcomeTransactions::for_bucket(mock_transport(), StatusBucket::Review).unwrap();
        request.core_mut().set_param("search", json!(42)).unwrap();
        assert_invalid_parameter(&request.filter_spec(), codes::OPTION);

        request.core_mut().set_param("search", json!(["jane", 7])).unwrap();
        assert_invalid_parameter(&request.filter_spec(), codes::OPTION);

        request.core_mut().unset_param("search");
        request.set_sort_by("amount").unwrap();
        request.core_mut().set_param("direction", json!("sideways")).unwrap();
        assert_invalid_parameter(&request.filter_spec(), codes::OPTION);

        request.core_mut().set_param("direction", json!("DESC")).unwrap();
        assert_eq!(request.filter_spec().unwrap().direction, SortDirection::Descending);
    }

    #[test]
    fn test_extend_keeps_status_lookup() {
        let mut request =
            ListFraudOutcomeTransactions::for_bucket(mock_transport(), StatusBucket::Review).unwrap();
        request.set_status_lookup(Arc::new(
            StaticStatusLookup::new()
                .with_status("a", DerivedStatus::Review)
                .with_status("b", DerivedStatus::Blocked),
        ));

        let extended = ListFraudOutcomeTransactions::extend(&request).unwrap();
        assert!(extended.status_lookup().is_some());

        let reply = extended
            .format_response(Ok(json!([{"id": "a"}, {"id": "b"}])))
            .unwrap();
        let results = reply.as_results().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.records[0]["id"], json!("a"));
    }
}
