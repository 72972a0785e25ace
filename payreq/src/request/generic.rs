//! A request for endpoints without a dedicated type.

use super::{Request, RequestCore, RequestType, Transport};
use crate::contracts::{HttpMethod, RequestDescriptor};
use crate::errors::{Result, ServerRequestError};

static GENERIC: RequestDescriptor = RequestDescriptor {
    name: "generic",
    extension_point: Some("payreq_generic_request"),
    ..RequestDescriptor::BLANK
};

/// Endpoint and method of a [`GenericRequest`], kept on its core.
#[derive(Debug, Clone, Default)]
struct GenericRoute {
    api: Option<String>,
    method: Option<HttpMethod>,
}

/// Request whose endpoint and method are supplied at runtime.
///
/// Both must be set before the request can be prepared. Any parameter may
/// be set; nothing is required or locked.
#[derive(Debug)]
pub struct GenericRequest {
    core: RequestCore,
}

impl GenericRequest {
    /// Creates a request for `api` with `method` and initial parameters.
    pub fn with_route(
        transport: Transport,
        api: impl Into<String>,
        method: HttpMethod,
        params: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> Result<Self> {
        let mut request = Self::create(transport, None)?;
        request.set_api(api);
        request.set_method(method);
        for (key, value) in params {
            request.set(key, value)?;
        }
        Ok(request)
    }

    fn route(&self) -> GenericRoute {
        self.core
            .attachments()
            .get::<GenericRoute>()
            .cloned()
            .unwrap_or_default()
    }

    /// Sets the endpoint path.
    pub fn set_api(&mut self, api: impl Into<String>) {
        let route = GenericRoute {
            api: Some(api.into()),
            ..self.route()
        };
        self.core.attach(route);
    }

    /// Sets the HTTP method.
    pub fn set_method(&mut self, method: HttpMethod) {
        let route = GenericRoute {
            method: Some(method),
            ..self.route()
        };
        self.core.attach(route);
    }

    /// Sets any parameter. Generic endpoints declare no fields to validate.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Result<()> {
        self.core.set_param(key, value)
    }

    /// Removes an explicit parameter.
    pub fn unset(&mut self, key: &str) {
        self.core.unset_param(key);
    }
}

impl Request for GenericRequest {
    fn core(&self) -> &RequestCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RequestCore {
        &mut self.core
    }

    fn get_api(&self) -> Result<String> {
        self.route().api.ok_or_else(|| {
            ServerRequestError::new("Generic request requires an explicit endpoint").into()
        })
    }

    fn get_method(&self) -> Result<HttpMethod> {
        self.route().method.ok_or_else(|| {
            ServerRequestError::new("Generic request requires an explicit HTTP method").into()
        })
    }
}

impl RequestType for GenericRequest {
    fn type_descriptor() -> &'static RequestDescriptor {
        &GENERIC
    }

    fn from_core(core: RequestCore) -> Self {
        Self { core }
    }
}
