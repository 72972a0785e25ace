//! Payment intention requests.

use super::BASE_REQUEST;
use crate::capabilities::{ModeFlag, OrderInfo};
use crate::contracts::{DefaultValue, HttpMethod, RequestDescriptor};
use crate::domain::PaymentIntention;
use crate::errors::Result;
use crate::request::{FormattedReply, Request, RequestCore, RequestType};
use crate::validation::{
    validate_currency_code, validate_lower_bound, validate_object_id_with_prefixes,
    validate_redirect_url, Bound,
};
use serde_json::json;

/// Payment method id prefixes accepted on intentions.
pub const PAYMENT_METHOD_PREFIXES: &[&str] = &["pm", "src", "card"];

static CREATE_INTENTION: RequestDescriptor = RequestDescriptor {
    name: "create_intention",
    parent: Some(&BASE_REQUEST),
    defaults: &[
        ("capture_method", DefaultValue::Str("automatic")),
        ("metadata", DefaultValue::EmptyMap),
    ],
    required: &["amount", "currency"],
    locked: &["amount"],
    method: Some(HttpMethod::Post),
    endpoint: Some("intentions"),
    extension_point: Some("payreq_create_intention_request"),
    ..RequestDescriptor::BLANK
};

static CREATE_AND_CONFIRM_INTENTION: RequestDescriptor = RequestDescriptor {
    name: "create_and_confirm_intention",
    parent: Some(&CREATE_INTENTION),
    defaults: &[
        ("confirm", DefaultValue::Bool(true)),
        ("off_session", DefaultValue::Bool(false)),
    ],
    required: &["payment_method"],
    extension_point: Some("payreq_create_and_confirm_intention_request"),
    ..RequestDescriptor::BLANK
};

static PLATFORM_CHECKOUT_INTENTION: RequestDescriptor = RequestDescriptor {
    name: "platform_checkout_create_and_confirm_intention",
    parent: Some(&CREATE_AND_CONFIRM_INTENTION),
    defaults: &[
        ("is_platform_payment_method", DefaultValue::Bool(true)),
        ("save_payment_method_to_platform", DefaultValue::Bool(false)),
    ],
    ..RequestDescriptor::BLANK
};

static GET_INTENTION: RequestDescriptor = RequestDescriptor {
    name: "get_intention",
    parent: Some(&BASE_REQUEST),
    method: Some(HttpMethod::Get),
    endpoint: Some("intentions"),
    extension_point: Some("payreq_get_intention_request"),
    ..RequestDescriptor::BLANK
};

fn format_intention(reply: Result<serde_json::Value>) -> Result<FormattedReply> {
    let intention: PaymentIntention = serde_json::from_value(reply?)?;
    Ok(FormattedReply::Intention(Box::new(intention)))
}

/// Setters shared by every intention creating request.
pub trait IntentionFields: Request {
    /// Amount in the smallest currency unit. Locked once set.
    fn set_amount(&mut self, amount: i64) -> Result<()> {
        validate_lower_bound(&json!(amount), 0.0, Bound::Inclusive, "amount")?;
        self.core_mut().set_param("amount", json!(amount))
    }

    /// Currency, from the site's supported set.
    fn set_currency_code(&mut self, currency: &str) -> Result<()> {
        let site = self.core().site();
        let currency = validate_currency_code(currency, "currency", &site)?;
        self.core_mut().set_param("currency", json!(currency))
    }

    /// Capture manually instead of on confirmation.
    fn set_capture_method(&mut self, manual: bool) -> Result<()> {
        let method = if manual { "manual" } else { "automatic" };
        self.core_mut().set_param("capture_method", json!(method))
    }

    /// Customer id (`cus_`).
    fn set_customer(&mut self, customer: &str) -> Result<()> {
        validate_object_id_with_prefixes(customer, "customer", &["cus"])?;
        self.core_mut().set_param("customer", json!(customer))
    }

    /// Free-form description.
    fn set_description(&mut self, description: &str) -> Result<()> {
        self.core_mut().set_param("description", json!(description))
    }

    /// Replaces the metadata map.
    fn set_metadata(&mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Result<()> {
        self.core_mut().set_param("metadata", serde_json::Value::Object(metadata))
    }
}

/// Setters for requests that confirm the intention they create.
pub trait ConfirmationFields: IntentionFields {
    /// Payment method id.
    fn set_payment_method(&mut self, payment_method: &str) -> Result<()> {
        validate_object_id_with_prefixes(payment_method, "payment_method", PAYMENT_METHOD_PREFIXES)?;
        self.core_mut().set_param("payment_method", json!(payment_method))
    }

    /// Whether the customer is absent from the flow.
    fn set_off_session(&mut self, off_session: bool) -> Result<()> {
        self.core_mut().set_param("off_session", json!(off_session))
    }

    /// Where the customer returns after an authentication step.
    fn set_return_url(&mut self, url: &str) -> Result<()> {
        let site = self.core().site();
        let url = validate_redirect_url(url, "return_url", &site)?;
        self.core_mut().set_param("return_url", json!(url.as_str()))
    }

    /// Payment method types allowed for the intention.
    fn set_payment_method_types(&mut self, types: &[&str]) -> Result<()> {
        self.core_mut().set_param("payment_method_types", json!(types))
    }
}

macro_rules! request_type {
    ($ty:ident, $descriptor:expr) => {
        impl RequestType for $ty {
            fn type_descriptor() -> &'static RequestDescriptor {
                &$descriptor
            }

            fn from_core(core: RequestCore) -> Self {
                Self { core }
            }
        }
    };
}

/// Creates a payment intention without confirming it.
#[derive(Debug)]
pub struct CreateIntention {
    core: RequestCore,
}

impl Request for CreateIntention {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }

    fn format_response(&self, reply: Result<serde_json::Value>) -> Result<FormattedReply> {
        format_intention(reply)
    }
}

request_type!(CreateIntention, CREATE_INTENTION);
impl IntentionFields for CreateIntention {}
impl OrderInfo for CreateIntention {}
impl ModeFlag for CreateIntention {}

/// Creates and confirms a payment intention in one call.
#[derive(Debug)]
pub struct CreateAndConfirmIntention {
    core: RequestCore,
}

impl Request for CreateAndConfirmIntention {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }

    fn format_response(&self, reply: Result<serde_json::Value>) -> Result<FormattedReply> {
        format_intention(reply)
    }
}

request_type!(CreateAndConfirmIntention, CREATE_AND_CONFIRM_INTENTION);
impl IntentionFields for CreateAndConfirmIntention {}
impl ConfirmationFields for CreateAndConfirmIntention {}
impl OrderInfo for CreateAndConfirmIntention {}
impl ModeFlag for CreateAndConfirmIntention {}

/// Create-and-confirm for payment methods saved on the checkout platform.
#[derive(Debug)]
pub struct PlatformCheckoutCreateAndConfirmIntention {
    core: RequestCore,
}

impl PlatformCheckoutCreateAndConfirmIntention {
    /// Whether to save the payment method to the platform account.
    pub fn set_save_payment_method_to_platform(&mut self, save: bool) -> Result<()> {
        self.core_mut().set_param("save_payment_method_to_platform", json!(save))
    }
}

impl Request for PlatformCheckoutCreateAndConfirmIntention {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }

    fn format_response(&self, reply: Result<serde_json::Value>) -> Result<FormattedReply> {
        format_intention(reply)
    }
}

request_type!(PlatformCheckoutCreateAndConfirmIntention, PLATFORM_CHECKOUT_INTENTION);
impl IntentionFields for PlatformCheckoutCreateAndConfirmIntention {}
impl ConfirmationFields for PlatformCheckoutCreateAndConfirmIntention {}
impl OrderInfo for PlatformCheckoutCreateAndConfirmIntention {}
impl ModeFlag for PlatformCheckoutCreateAndConfirmIntention {}

/// Fetches a payment intention by id (`pi_`).
#[derive(Debug)]
pub struct GetIntention {
    core: RequestCore,
}

impl Request for GetIntention {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }

    fn format_response(&self, reply: Result<serde_json::Value>) -> Result<FormattedReply> {
        format_intention(reply)
    }
}

impl RequestType for GetIntention {
    fn type_descriptor() -> &'static RequestDescriptor {
        &GET_INTENTION
    }

    fn from_core(core: RequestCore) -> Self {
        Self { core }
    }

    fn validate_id(id: &str) -> Result<()> {
        validate_object_id_with_prefixes(id, "intention_id", &["pi"])?;
        Ok(())
    }
}
