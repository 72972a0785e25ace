//! State shared by every request type.

use super::{Attachments, ParamBag, ParamMap, Transport};
use crate::config::SiteConfig;
use crate::contracts::{self, Contract, HttpMethod, RequestDescriptor};
use crate::errors::{
    ImmutableParameterError, InvalidRequestParameterError, Result, ServerRequestError,
};
use std::sync::Arc;
use tracing::debug;

/// Explicit parameter state of one request instance, checked against the
/// resolved contract of its type.
#[derive(Debug, Clone)]
pub struct RequestCore {
    descriptor: &'static RequestDescriptor,
    contract: Arc<Contract>,
    params: ParamBag,
    transport: Transport,
    id: Option<String>,
    attachments: Attachments,
}

impl RequestCore {
    /// Creates an empty core for `descriptor`.
    #[must_use]
    pub fn new(descriptor: &'static RequestDescriptor, transport: Transport) -> Self {
        Self {
            descriptor,
            contract: contracts::resolve(descriptor),
            params: ParamBag::new(),
            transport,
            id: None,
            attachments: Attachments::new(),
        }
    }

    /// Creates a core for `descriptor` seeded from `existing`.
    ///
    /// Collaborators, resource id, attachments and lock records are carried
    /// over, then every explicit parameter is replayed through
    /// [`RequestCore::set_param`] against the new contract.
    pub fn derive_from(descriptor: &'static RequestDescriptor, existing: &RequestCore) -> Result<Self> {
        let mut core = Self::new(descriptor, existing.transport.clone());
        core.id.clone_from(&existing.id);
        core.attachments = existing.attachments.clone();
        core.params.seed_locks(existing.params.locked());
        for (key, value) in existing.params.explicit() {
            core.set_param(key, value.clone())?;
        }
        Ok(core)
    }

    /// The type descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &'static RequestDescriptor {
        self.descriptor
    }

    /// The resolved contract.
    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// The transport collaborators.
    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// The site configuration reported by the API client.
    #[must_use]
    pub fn site(&self) -> SiteConfig {
        self.transport.api_client.site()
    }

    /// The resource id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Stores an already validated resource id.
    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Explicit parameters and lock records.
    #[must_use]
    pub fn params(&self) -> &ParamBag {
        &self.params
    }

    /// Sets a parameter, enforcing locks.
    ///
    /// Crate-internal: callers go through the validated setters of the
    /// concrete request types.
    pub(crate) fn set_param(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        let lock = self.contract.is_locked(&key);
        debug!(
            request_type = self.descriptor.name,
            key = %key,
            locked = lock,
            "Setting request parameter"
        );
        self.params.set(key, value, lock)?;
        Ok(())
    }

    /// Removes an explicit value. Defaults are unaffected.
    pub(crate) fn unset_param(&mut self, key: &str) {
        self.params.unset(key);
    }

    /// Takes over the locks of a request this one replaces.
    ///
    /// A locked key holding a different value here fails; a locked key this
    /// request dropped gets its locked value back.
    pub(crate) fn inherit_locks(&mut self, locks: &ParamMap) -> Result<()> {
        for (key, locked) in locks {
            let conflict = [self.params.get(key), self.params.locked_value(key)]
                .into_iter()
                .flatten()
                .find(|value| *value != locked)
                .cloned();
            if let Some(current) = conflict {
                return Err(ImmutableParameterError::new(key, locked.clone(), current).into());
            }
            if !self.params.contains_key(key) {
                self.params.set(key.clone(), locked.clone(), false)?;
            }
        }
        self.params.seed_locks(locks);
        Ok(())
    }

    /// Type-local state carried across `extend`.
    #[must_use]
    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    pub(crate) fn attach<T: Send + Sync + 'static>(&mut self, value: T) {
        self.attachments.insert(value);
    }

    /// True if `key` has an explicit value or a default.
    #[must_use]
    pub fn has_param(&self, key: &str) -> bool {
        self.params.contains_key(key) || self.contract.defaults.contains_key(key)
    }

    /// Returns the explicit value, else the default.
    pub fn get_param(&self, key: &str) -> Result<serde_json::Value> {
        self.params
            .get(key)
            .or_else(|| self.contract.default_for(key))
            .cloned()
            .ok_or_else(|| InvalidRequestParameterError::uninitialized(key).into())
    }

    /// Merges defaults and explicit values, enforces required keys and
    /// normalizes top-level booleans to `"true"` / `"false"`.
    pub fn get_params(&self) -> Result<ParamMap> {
        let mut effective = self.contract.defaults.clone();
        for (key, value) in self.params.explicit() {
            effective.insert(key.clone(), value.clone());
        }

        let missing: Vec<String> = self
            .contract
            .required
            .iter()
            .filter(|key| effective.get(key.as_str()).map_or(true, serde_json::Value::is_null))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(InvalidRequestParameterError::missing(&missing).into());
        }

        for value in effective.values_mut() {
            if let serde_json::Value::Bool(flag) = value {
                *value = serde_json::Value::String(flag.to_string());
            }
        }
        Ok(effective)
    }

    /// Declared endpoint with the resource id appended as a path segment.
    pub fn default_api(&self) -> Result<String> {
        let endpoint = self.descriptor.resolved_endpoint().ok_or_else(|| {
            ServerRequestError::new(format!(
                "{} does not declare an endpoint",
                self.descriptor.name
            ))
        })?;
        Ok(match &self.id {
            Some(id) => format!("{}/{id}", endpoint.trim_end_matches('/')),
            None => endpoint.to_string(),
        })
    }

    /// Declared HTTP method.
    pub fn default_method(&self) -> Result<HttpMethod> {
        self.descriptor.resolved_method().ok_or_else(|| {
            ServerRequestError::new(format!(
                "{} does not declare an HTTP method",
                self.descriptor.name
            ))
            .into()
        })
    }
}
