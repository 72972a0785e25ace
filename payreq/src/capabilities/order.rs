//! Order details attached to payment requests as metadata.

use crate::errors::Result;
use crate::request::Request;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// The store order a payment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Internal order id.
    pub id: u64,
    /// Customer-facing order number.
    pub number: String,
    /// Order key used in order links.
    pub key: String,
    /// Order status in the store, e.g. `processing` or `cancelled`.
    pub status: String,
    /// Billing name.
    #[serde(default)]
    pub customer_name: String,
    /// Billing email.
    #[serde(default)]
    pub customer_email: String,
}

/// Read access to store orders.
pub trait OrderLookup: Send + Sync {
    /// Finds an order by id.
    fn find_order(&self, order_id: u64) -> Result<OrderDetails>;
}

/// Writes order identity and customer details into the `metadata` param.
///
/// Existing metadata entries are kept unless an order field overwrites them.
pub trait OrderInfo: Request {
    /// Attaches `order` to the request.
    fn set_order(&mut self, order: &OrderDetails) -> Result<()> {
        let mut metadata = match self.get_param("metadata") {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        metadata.insert("order_id".to_string(), json!(order.id));
        metadata.insert("order_number".to_string(), json!(order.number));
        metadata.insert("order_key".to_string(), json!(order.key));
        metadata.insert("customer_name".to_string(), json!(order.customer_name));
        metadata.insert("customer_email".to_string(), json!(order.customer_email));
        self.core_mut().set_param("metadata", serde_json::Value::Object(metadata))
    }

    /// Looks the order up and attaches it.
    fn set_order_id(&mut self, order_id: u64, orders: &dyn OrderLookup) -> Result<()> {
        let order = orders.find_order(order_id)?;
        self.set_order(&order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{DefaultValue, RequestDescriptor};
    use crate::request::{RequestCore, RequestType};
    use crate::testing::{mock_transport, sample_order, StaticOrderLookup};
    use pretty_assertions::assert_eq;

    static ORDERED: RequestDescriptor = RequestDescriptor {
        name: "order_info_test",
        defaults: &[("metadata", DefaultValue::EmptyMap)],
        ..RequestDescriptor::BLANK
    };

    #[derive(Debug)]
    struct Ordered {
        core: RequestCore,
    }

    impl Request for Ordered {
        fn core(&self) -> &RequestCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut RequestCore {
            &mut self.core
        }
    }

    impl RequestType for Ordered {
        fn type_descriptor() -> &'static RequestDescriptor {
            &ORDERED
        }

        fn from_core(core: RequestCore) -> Self {
            Self { core }
        }
    }

    impl OrderInfo for Ordered {}

    #[test]
    fn test_set_order_merges_metadata() {
        let mut request = Ordered::create(mock_transport(), None).unwrap();
        request.core_mut().set_param("metadata", json!({"source": "checkout"})).unwrap();
        request.set_order(&sample_order(42, "processing")).unwrap();

        assert_eq!(
            request.get_param("metadata").unwrap(),
            json!({
                "source": "checkout",
                "order_id": 42,
                "order_number": "42",
                "order_key": "wc_order_42",
                "customer_name": "Jane Doe",
                "customer_email": "jane@example.com"
            })
        );
    }

    #[test]
    fn test_set_order_id_uses_lookup() {
        let orders = StaticOrderLookup::new().with_order(sample_order(7, "completed"));
        let mut request = Ordered::create(mock_transport(), None).unwrap();
        request.set_order_id(7, &orders).unwrap();
        assert_eq!(request.get_param("metadata").unwrap()["order_number"], json!("7"));

        assert!(request.set_order_id(8, &orders).is_err());
    }
}
