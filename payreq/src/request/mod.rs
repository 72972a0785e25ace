//! Request entity and lifecycle.
//!
//! A request is built from its static descriptor, mutated through setters,
//! optionally replaced by extension subscribers, then finalized with
//! `get_params` and handed to the API client.

mod attachments;
mod core;
mod dispatch;
mod generic;
mod params;
mod traits;
mod transport;

pub use self::core::RequestCore;
pub use attachments::Attachments;
pub use dispatch::send;
pub use generic::GenericRequest;
pub use params::{ParamBag, ParamMap};
pub use traits::{FormattedReply, Request, RequestType};
pub use transport::{ApiClient, HttpTransport, PreparedRequest, Transport};
