//! Charge and refund requests.

use super::BASE_REQUEST;
use crate::capabilities::OrderInfo;
use crate::contracts::{DefaultValue, HttpMethod, RequestDescriptor};
use crate::domain::Charge;
use crate::errors::Result;
use crate::request::{FormattedReply, Request, RequestCore, RequestType};
use crate::validation::{
    validate_lower_bound, validate_object_id_with_prefixes, validate_option, Bound,
    CHARGE_ID_PREFIXES,
};
use serde_json::json;

/// Refund reasons the remote API accepts.
pub const REFUND_REASONS: &[&str] = &["duplicate", "fraudulent", "requested_by_customer"];

static GET_CHARGE: RequestDescriptor = RequestDescriptor {
    name: "get_charge",
    parent: Some(&BASE_REQUEST),
    method: Some(HttpMethod::Get),
    endpoint: Some("charges"),
    extension_point: Some("payreq_get_charge_request"),
    ..RequestDescriptor::BLANK
};

static REFUND_CHARGE: RequestDescriptor = RequestDescriptor {
    name: "refund_charge",
    parent: Some(&BASE_REQUEST),
    defaults: &[("metadata", DefaultValue::EmptyMap)],
    required: &["charge"],
    locked: &["charge"],
    method: Some(HttpMethod::Post),
    endpoint: Some("refunds"),
    extension_point: Some("payreq_refund_charge_request"),
    ..RequestDescriptor::BLANK
};

/// Fetches a charge by id (`ch_` or `py_`).
#[derive(Debug)]
pub struct GetCharge {
    core: RequestCore,
}

impl Request for GetCharge {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }

    fn format_response(&self, reply: Result<serde_json::Value>) -> Result<FormattedReply> {
        let charge: Charge = serde_json::from_value(reply?)?;
        Ok(FormattedReply::Charge(Box::new(charge)))
    }
}

impl RequestType for GetCharge {
    fn type_descriptor() -> &'static RequestDescriptor {
        &GET_CHARGE
    }

    fn from_core(core: RequestCore) -> Self {
        Self { core }
    }

    fn validate_id(id: &str) -> Result<()> {
        validate_object_id_with_prefixes(id, "charge_id", CHARGE_ID_PREFIXES)?;
        Ok(())
    }
}

/// Refunds all or part of a charge.
///
/// Without an amount the remote side refunds whatever is left.
#[derive(Debug)]
pub struct RefundCharge {
    core: RequestCore,
}

impl RefundCharge {
    /// The charge to refund (`ch_` or `py_`). Locked once set.
    pub fn set_charge(&mut self, charge_id: &str) -> Result<()> {
        validate_object_id_with_prefixes(charge_id, "charge", CHARGE_ID_PREFIXES)?;
        self.core_mut().set_param("charge", json!(charge_id))
    }

    /// Amount to refund in the smallest currency unit.
    pub fn set_amount(&mut self, amount: i64) -> Result<()> {
        validate_lower_bound(&json!(amount), 0.0, Bound::Exclusive, "amount")?;
        self.core_mut().set_param("amount", json!(amount))
    }

    /// Reason reported to the card network.
    pub fn set_reason(&mut self, reason: &str) -> Result<()> {
        let reason = validate_option(reason, "reason", REFUND_REASONS)?;
        self.core_mut().set_param("reason", json!(reason))
    }
}

impl Request for RefundCharge {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }
}

impl RequestType for RefundCharge {
    fn type_descriptor() -> &'static RequestDescriptor {
        &REFUND_CHARGE
    }

    fn from_core(core: RequestCore) -> Self {
        Self { core }
    }
}

impl OrderInfo for RefundCharge {}
