//! Request traits.
//!
//! [`Request`] is the object-safe surface the filter registry and dispatcher
//! work with. [`RequestType`] adds the static side: construction, id
//! validation and `extend`.

use super::{ParamMap, PreparedRequest, RequestCore, Transport};
use crate::contracts::{HttpMethod, RequestDescriptor};
use crate::domain::{Charge, PaymentIntention};
use crate::errors::{Result, ServerRequestError};
use crate::response::Response;
use crate::results::ProcessedResults;
use crate::validation::validate_route;
use std::fmt;
use uuid::Uuid;

/// What `format_response` turns a decoded reply into.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedReply {
    /// Read-only wrapper over the raw payload.
    Response(Response),
    /// A payment intention.
    Intention(Box<PaymentIntention>),
    /// A charge.
    Charge(Box<Charge>),
    /// A post-processed list.
    Results(ProcessedResults),
}

impl FormattedReply {
    /// The wrapped response, if the reply was not turned into a domain object.
    #[must_use]
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }

    /// The payment intention, if any.
    #[must_use]
    pub fn as_intention(&self) -> Option<&PaymentIntention> {
        match self {
            Self::Intention(intention) => Some(&**intention),
            _ => None,
        }
    }

    /// The charge, if any.
    #[must_use]
    pub fn as_charge(&self) -> Option<&Charge> {
        match self {
            Self::Charge(charge) => Some(&**charge),
            _ => None,
        }
    }

    /// The post-processed list, if any.
    #[must_use]
    pub fn as_results(&self) -> Option<&ProcessedResults> {
        match self {
            Self::Results(results) => Some(results),
            _ => None,
        }
    }
}

/// An outbound call under construction.
///
/// Implementors only provide access to their [`RequestCore`]; everything
/// else has a default that leaf types override where their endpoint needs
/// it.
///
/// Parameters are written through the validated setters of each type.
/// The raw core setter is not reachable from outside the crate:
///
/// ```compile_fail
/// use payreq::prelude::*;
///
/// let mut request = CreateIntention::create(payreq::testing::mock_transport(), None).unwrap();
/// request.core_mut().set_param("amount", serde_json::json!(-5)).unwrap();
/// ```
pub trait Request: fmt::Debug + Send {
    /// Shared request state.
    fn core(&self) -> &RequestCore;

    /// Shared request state, mutably.
    fn core_mut(&mut self) -> &mut RequestCore;

    /// Endpoint path, with the resource id appended when present.
    fn get_api(&self) -> Result<String> {
        self.core().default_api()
    }

    /// HTTP method.
    fn get_method(&self) -> Result<HttpMethod> {
        self.core().default_method()
    }

    /// Whether the call must be signed with the user's token.
    fn should_use_user_token(&self) -> bool {
        false
    }

    /// Whether the endpoint lives under the site's remote id.
    fn is_site_specific(&self) -> bool {
        false
    }

    /// Turns the decoded reply into its domain form.
    ///
    /// Errors are returned unchanged.
    fn format_response(&self, reply: Result<serde_json::Value>) -> Result<FormattedReply> {
        reply.map(|data| FormattedReply::Response(Response::new(data)))
    }

    /// Static descriptor of the concrete type.
    fn descriptor(&self) -> &'static RequestDescriptor {
        self.core().descriptor()
    }

    /// Explicit value, else default.
    fn get_param(&self, key: &str) -> Result<serde_json::Value> {
        self.core().get_param(key)
    }

    /// Finalized wire parameters.
    fn get_params(&self) -> Result<ParamMap> {
        self.core().get_params()
    }

    /// Finalizes the request for the transport.
    fn prepare(&self) -> Result<PreparedRequest> {
        let params = self.get_params()?;
        let method = self.get_method()?;
        let mut api = self.get_api()?;

        let site_specific = self.is_site_specific();
        if site_specific {
            let blog_id = self.core().transport().http.blog_id().ok_or_else(|| {
                ServerRequestError::new(format!(
                    "{} is site specific but the site is not connected",
                    self.descriptor().name
                ))
            })?;
            api = format!("sites/{blog_id}/{api}");
        }

        Ok(PreparedRequest {
            request_type: self.descriptor().name,
            method,
            api,
            params,
            use_user_token: self.should_use_user_token(),
            site_specific,
            idempotency_key: Uuid::new_v4(),
        })
    }
}

/// A concrete request type with a static descriptor.
pub trait RequestType: Request + Sized + 'static {
    /// Descriptor of this type.
    fn type_descriptor() -> &'static RequestDescriptor;

    /// Wraps a core built for [`RequestType::type_descriptor`].
    fn from_core(core: RequestCore) -> Self;

    /// Validates a resource id before it is stored.
    fn validate_id(id: &str) -> Result<()> {
        validate_route(id, "id")?;
        Ok(())
    }

    /// Creates a request, validating `id` when given.
    fn create(transport: Transport, id: Option<&str>) -> Result<Self> {
        let mut core = RequestCore::new(Self::type_descriptor(), transport);
        if let Some(id) = id {
            Self::validate_id(id)?;
            core.set_id(id);
        }
        Ok(Self::from_core(core))
    }

    /// Builds a more specific request from `existing`.
    ///
    /// Collaborators and resource id are carried over and every explicit
    /// parameter is replayed through `set_param`, so locked values stay
    /// locked.
    fn extend(existing: &dyn Request) -> Result<Self> {
        let target = Self::type_descriptor();
        let source = existing.descriptor();
        if !target.is_a(source) {
            return Err(ServerRequestError::new(format!(
                "{} cannot extend {}: it is not a descendant",
                target.name, source.name
            ))
            .into());
        }

        let core = RequestCore::derive_from(target, existing.core())?;
        if let Some(id) = core.id() {
            Self::validate_id(id)?;
        }
        Ok(Self::from_core(core))
    }

    /// Boxes the request for the filter registry.
    fn boxed(self) -> Box<dyn Request> {
        Box::new(self)
    }
}
