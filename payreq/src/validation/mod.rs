//! Stateless parameter validators.
//!
//! Every validator fails with an
//! [`InvalidRequestParameterError`](crate::errors::InvalidRequestParameterError)
//! carrying the failed check's code, the field name and the offending value.

mod ids;
mod urls;
mod values;

pub use ids::{
    validate_object_id, validate_object_id_with_prefixes, CHARGE_ID_PREFIXES,
    DEFAULT_OBJECT_ID_PREFIXES,
};
pub use urls::{validate_redirect_url, validate_route};
pub use values::{
    validate_currency_code, validate_date, validate_identifier, validate_lower_bound,
    validate_option, Bound,
};
