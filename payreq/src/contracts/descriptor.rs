//! Static per-type request descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method of an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns the canonical upper-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A default parameter value that can live in a `static` descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    Str(&'static str),
    /// `[]`.
    EmptyList,
    /// `{}`.
    EmptyMap,
}

impl DefaultValue {
    /// Converts to a JSON value.
    #[must_use]
    pub fn to_value(self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(b),
            Self::Int(i) => serde_json::Value::from(i),
            Self::Str(s) => serde_json::Value::from(s),
            Self::EmptyList => serde_json::Value::Array(Vec::new()),
            Self::EmptyMap => serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Declarative metadata of one request type.
///
/// A descriptor only lists what its type adds or overrides; everything else
/// is inherited from `parent`. Names must be unique across the hierarchy,
/// they are the identity used by [`RequestDescriptor::is_a`] and the
/// contract cache.
#[derive(Debug)]
pub struct RequestDescriptor {
    /// Unique type name.
    pub name: &'static str,
    /// Immediate ancestor.
    pub parent: Option<&'static RequestDescriptor>,
    /// Default values declared by this type.
    pub defaults: &'static [(&'static str, DefaultValue)],
    /// Keys this type makes required.
    pub required: &'static [&'static str],
    /// Keys this type locks after their first assignment.
    pub locked: &'static [&'static str],
    /// HTTP method, if this type declares one.
    pub method: Option<HttpMethod>,
    /// Endpoint path, if this type declares one.
    pub endpoint: Option<&'static str>,
    /// Extension point subscribers can hook into.
    pub extension_point: Option<&'static str>,
}

impl RequestDescriptor {
    /// A descriptor declaring nothing; use with struct update syntax.
    pub const BLANK: Self = Self {
        name: "",
        parent: None,
        defaults: &[],
        required: &[],
        locked: &[],
        method: None,
        endpoint: None,
        extension_point: None,
    };

    /// Returns the ancestor chain, root first and `self` last.
    ///
    /// Stops at the first repeated name so a malformed chain cannot loop.
    #[must_use]
    pub fn ancestry(&'static self) -> Vec<&'static RequestDescriptor> {
        let mut chain: Vec<&'static RequestDescriptor> = Vec::new();
        let mut current = Some(self);
        while let Some(descriptor) = current {
            if chain.iter().any(|d| d.name == descriptor.name) {
                break;
            }
            chain.push(descriptor);
            current = descriptor.parent;
        }
        chain.reverse();
        chain
    }

    /// True if `self` is `other` or descends from it.
    #[must_use]
    pub fn is_a(&'static self, other: &RequestDescriptor) -> bool {
        self.ancestry().iter().any(|d| d.name == other.name)
    }

    /// The nearest declared HTTP method.
    #[must_use]
    pub fn resolved_method(&'static self) -> Option<HttpMethod> {
        self.ancestry().iter().rev().find_map(|d| d.method)
    }

    /// The nearest declared endpoint.
    #[must_use]
    pub fn resolved_endpoint(&'static self) -> Option<&'static str> {
        self.ancestry().iter().rev().find_map(|d| d.endpoint)
    }

    /// The nearest declared extension point.
    #[must_use]
    pub fn resolved_extension_point(&'static self) -> Option<&'static str> {
        self.ancestry().iter().rev().find_map(|d| d.extension_point)
    }
}
