//! Parameter contracts for request types.
//!
//! This module provides:
//! - Static per-type descriptors declaring only their own delta
//! - Resolution of a descriptor's effective contract across its ancestors

mod descriptor;
mod resolver;

pub use descriptor::{DefaultValue, HttpMethod, RequestDescriptor};
pub use resolver::{resolve, resolve_uncached, Contract, ContractResolver, RESOLVER};
