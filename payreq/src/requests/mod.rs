//! Concrete request types.
//!
//! Every type descends from [`BASE_REQUEST`] and declares only what it adds:
//! its endpoint, defaults, required and locked keys. Setters validate their
//! input before it reaches the parameter map.

mod account;
mod charges;
mod fraud;
mod intentions;

use crate::contracts::RequestDescriptor;

pub use account::GetAccountLogin;
pub use charges::{GetCharge, RefundCharge, REFUND_REASONS};
pub use fraud::ListFraudOutcomeTransactions;
pub use intentions::{
    ConfirmationFields, CreateAndConfirmIntention, CreateIntention, GetIntention, IntentionFields,
    PlatformCheckoutCreateAndConfirmIntention, PAYMENT_METHOD_PREFIXES,
};

/// Root of the request type hierarchy.
pub static BASE_REQUEST: RequestDescriptor = RequestDescriptor {
    name: "request",
    ..RequestDescriptor::BLANK
};
