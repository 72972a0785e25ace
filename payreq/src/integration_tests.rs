//! End-to-end tests: building, extending, sending and shaping requests.

#[cfg(test)]
mod tests {
    use crate::capabilities::{ModeFlag, OrderInfo};
    use crate::config::SiteConfig;
    use crate::contracts::resolve;
    use crate::errors::{codes, PayreqError, TransportError};
    use crate::extensions::FilterRegistry;
    use crate::request::{send, Request, RequestType};
    use crate::requests::{
        ConfirmationFields, CreateAndConfirmIntention, CreateIntention, GetAccountLogin,
        GetCharge, IntentionFields, ListFraudOutcomeTransactions,
        PlatformCheckoutCreateAndConfirmIntention, RefundCharge,
    };
    use crate::rest::{list_fraud_outcomes_from_rest, RestParameters};
    use crate::results::{OrderStatusLookup, StatusBucket};
    use crate::testing::{
        assert_immutable, assert_invalid_parameter, assert_server_request, assert_server_response,
        mock_transport_with, sample_order, MockApiClient, StaticOrderLookup, TEST_SITE_URL,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    const CREATE_POINT: &str = "payreq_create_intention_request";

    fn intention_reply(status: &str) -> serde_json::Value {
        json!({
            "id": "pi_123",
            "amount": 2,
            "currency": "eur",
            "status": status,
            "payment_method": "pm_card",
            "created": 1_700_000_000
        })
    }

    fn base_intention(client: &Arc<MockApiClient>) -> CreateIntention {
        let mut request = CreateIntention::create(mock_transport_with(client.clone()), None).unwrap();
        request.set_amount(2).unwrap();
        request.set_currency_code("EUR").unwrap();
        request
    }

    #[test]
    fn test_platform_checkout_resolves_whole_chain() {
        let contract = resolve(PlatformCheckoutCreateAndConfirmIntention::type_descriptor());

        for key in [
            "capture_method",
            "metadata",
            "confirm",
            "off_session",
            "is_platform_payment_method",
            "save_payment_method_to_platform",
        ] {
            assert!(contract.default_for(key).is_some(), "missing default {key}");
        }
        assert!(contract.is_required("amount"));
        assert!(contract.is_required("payment_method"));
        assert!(contract.is_locked("amount"));
    }

    #[test]
    fn test_filter_upgrades_request_before_send() {
        let client = Arc::new(MockApiClient::new());
        client.push_reply(Ok(intention_reply("succeeded")));

        let filters = FilterRegistry::new();
        filters.add_filter(CREATE_POINT, |request: Box<dyn Request>| {
            let mut upgraded = CreateAndConfirmIntention::extend(request.as_ref())?;
            upgraded.set_payment_method("pm_card")?;
            Ok(upgraded.boxed())
        });

        let mut request = base_intention(&client);
        request.set_order(&sample_order(77, "pending")).unwrap();

        let reply = send(request.boxed(), &filters).unwrap();
        let intention = reply.as_intention().unwrap();
        assert!(intention.is_succeeded());

        let sent = client.sent_requests();
        assert_eq!(sent.len(), 1);
        let prepared = &sent[0];
        assert_eq!(prepared.request_type, "create_and_confirm_intention");
        assert_eq!(prepared.api, "intentions");
        assert_eq!(prepared.params["amount"], json!(2));
        assert_eq!(prepared.params["currency"], json!("eur"));
        assert_eq!(prepared.params["confirm"], json!("true"));
        assert_eq!(prepared.params["off_session"], json!("false"));
        assert_eq!(prepared.params["payment_method"], json!("pm_card"));
        assert_eq!(prepared.params["metadata"]["order_number"], json!("77"));
    }

    #[test]
    fn test_lock_survives_extension() {
        let client = Arc::new(MockApiClient::new());
        let filters = FilterRegistry::new();
        filters.add_filter(CREATE_POINT, |request: Box<dyn Request>| {
            let mut upgraded = CreateAndConfirmIntention::extend(request.as_ref())?;
            upgraded.set_amount(3)?;
            Ok(upgraded.boxed())
        });

        let result = send(base_intention(&client).boxed(), &filters);
        assert_immutable(&result, "amount");
        assert_eq!(client.call_count(), 0);

        let mut upgraded =
            CreateAndConfirmIntention::extend(&base_intention(&client)).unwrap();
        upgraded.set_amount(2).unwrap();
    }

    #[test]
    fn test_fresh_replacement_cannot_drop_lock() {
        let client = Arc::new(MockApiClient::new());
        let filters = FilterRegistry::new();
        let transport = mock_transport_with(client.clone());
        filters.add_filter(CREATE_POINT, move |_request: Box<dyn Request>| {
            let mut fresh = CreateAndConfirmIntention::create(transport.clone(), None)?;
            fresh.set_amount(999)?;
            fresh.set_currency_code("EUR")?;
            fresh.set_payment_method("pm_card")?;
            Ok(fresh.boxed())
        });

        let result = send(base_intention(&client).boxed(), &filters);
        assert_immutable(&result, "amount");
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_missing_required_after_extension_blocks_send() {
        let client = Arc::new(MockApiClient::new());
        let filters = FilterRegistry::new();
        filters.add_filter(CREATE_POINT, |request: Box<dyn Request>| {
            Ok(CreateAndConfirmIntention::extend(request.as_ref())?.boxed())
        });

        let result = send(base_intention(&client).boxed(), &filters);
        assert_invalid_parameter(&result, codes::MISSING_PARAMETERS);
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_unrelated_replacement_rejected() {
        let client = Arc::new(MockApiClient::new());
        let filters = FilterRegistry::new();
        let transport = mock_transport_with(client.clone());
        filters.add_filter(CREATE_POINT, move |_request: Box<dyn Request>| {
            Ok(RefundCharge::create(transport.clone(), None)?.boxed())
        });

        let result = send(base_intention(&client).boxed(), &filters);
        assert_server_request(&result);
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_get_params_is_idempotent() {
        let client = Arc::new(MockApiClient::new());
        let mut request = CreateAndConfirmIntention::extend(&base_intention(&client)).unwrap();
        request.set_payment_method("pm_card").unwrap();
        request.set_off_session(true).unwrap();

        let first = request.get_params().unwrap();
        let second = request.get_params().unwrap();
        assert_eq!(first, second);
        assert_eq!(first["off_session"], json!("true"));
    }

    #[test]
    fn test_transport_error_passes_through() {
        let client = Arc::new(MockApiClient::new());
        client.push_reply(Err(TransportError::new("card_declined", "Declined", 402).into()));

        let err = send(base_intention(&client).boxed(), &FilterRegistry::new()).unwrap_err();
        match err {
            PayreqError::Transport(e) => {
                assert_eq!(e.code, "card_declined");
                assert_eq!(e.http_status, 402);
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_is_read_only() {
        let client = Arc::new(MockApiClient::new());
        client.push_reply(Ok(json!({"url": "https://dashboard.example.com/login/abc"})));

        let mut request = GetAccountLogin::create(mock_transport_with(client.clone()), None).unwrap();
        request.set_redirect_url(&format!("{TEST_SITE_URL}/wp-admin/")).unwrap();

        let reply = send(request.boxed(), &FilterRegistry::new()).unwrap();
        let response = reply.as_response().unwrap();
        assert!(response.contains("url"));
        assert!(!response.contains("expires"));
        assert_server_response(
            &response
                .try_set("url", json!("https://evil.example"))
                .map_err(PayreqError::from),
        );
        assert_server_response(&response.try_remove("url").map_err(PayreqError::from));
        assert_eq!(client.sent_requests()[0].api, "sites/1/accounts/login_links");
    }

    #[test]
    fn test_charge_fetch_by_id() {
        let client = Arc::new(MockApiClient::new());
        client.push_reply(Ok(json!({
            "id": "py_9",
            "amount": 900,
            "currency": "usd",
            "status": "succeeded",
            "created": "2024-03-01T10:00:00Z"
        })));

        let request = GetCharge::create(mock_transport_with(client.clone()), Some("py_9")).unwrap();
        let reply = send(request.boxed(), &FilterRegistry::new()).unwrap();
        assert_eq!(reply.as_charge().unwrap().id, "py_9");
        assert_eq!(client.sent_requests()[0].api, "charges/py_9");
    }

    #[test]
    fn test_fraud_listing_from_rest_with_order_statuses() {
        let orders = Arc::new(
            StaticOrderLookup::new()
                .with_order(sample_order(1, "on-hold"))
                .with_order(sample_order(2, "cancelled"))
                .with_order(sample_order(3, "on-hold")),
        );
        let client = Arc::new(MockApiClient::new());
        client.push_reply(Ok(json!([
            {"status": "review", "order_id": 1, "order_number": "1", "customer_name": "Jane Doe", "amount": 20},
            {"status": "review", "order_id": 2, "order_number": "2", "customer_name": "Jane Doe", "amount": 50},
            {"status": "review", "order_id": "3", "order_number": "3", "customer_name": "John Roe", "amount": 30},
            {"status": "review", "order_id": 99, "order_number": "99", "customer_name": "Jane Doe", "amount": 10}
        ])));

        let params = RestParameters::from_query("status=review&search[]=jane&search[]=%233&sort=amount&direction=desc");
        let request = list_fraud_outcomes_from_rest(
            mock_transport_with(client.clone()),
            &params,
            Some(Arc::new(OrderStatusLookup::new(orders.clone()))),
        )
        .unwrap();

        let reply = send(request.boxed(), &FilterRegistry::new()).unwrap();
        let results = reply.as_results().unwrap();
        let numbers: Vec<_> = results.records.iter().map(|r| r["order_number"].clone()).collect();
        assert_eq!(numbers, vec![json!("3"), json!("1")]);
        assert_eq!(results.skipped.len(), 1);
        assert_eq!(results.skipped[0].index, 3);
        assert_eq!(orders.lookup_count(), 4);

        let sent = client.sent_requests();
        assert_eq!(sent[0].api, "fraud_outcomes/status/review");
    }

    #[test]
    fn test_blocked_outcomes_land_in_block_bucket() {
        let orders = Arc::new(StaticOrderLookup::new().with_order(sample_order(2, "failed")));
        let client = Arc::new(MockApiClient::new());
        let reply = json!([
            {"status": "block", "order_id": 1},
            {"status": "review", "order_id": 2}
        ]);
        client.push_reply(Ok(reply.clone()));
        client.push_reply(Ok(reply));

        for (bucket, expected) in [(StatusBucket::Block, 2), (StatusBucket::Review, 0)] {
            let mut request =
                ListFraudOutcomeTransactions::for_bucket(mock_transport_with(client.clone()), bucket)
                    .unwrap();
            request.set_status_lookup(Arc::new(OrderStatusLookup::new(orders.clone())));
            let reply = send(request.boxed(), &FilterRegistry::new()).unwrap();
            assert_eq!(reply.as_results().unwrap().len(), expected, "bucket {bucket:?}");
        }
    }

    #[test]
    fn test_mode_flag_follows_site() {
        let client = Arc::new(MockApiClient::for_site(
            SiteConfig::new(TEST_SITE_URL).with_dev_mode(true),
        ));
        let mut request = base_intention(&client);
        request.apply_mode_flag().unwrap();
        let _ = send(request.boxed(), &FilterRegistry::new());

        client.set_site(SiteConfig::new(TEST_SITE_URL));
        let mut request = base_intention(&client);
        request.apply_mode_flag().unwrap();
        let _ = send(request.boxed(), &FilterRegistry::new());

        let sent = client.sent_requests();
        assert_eq!(sent[0].params["test_mode"], json!("true"));
        assert!(!sent[1].params.contains_key("test_mode"));
    }
}
