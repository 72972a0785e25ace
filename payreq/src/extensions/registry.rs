//! Ordered subscriber lists keyed by extension point.

use crate::errors::{Result, ServerRequestError};
use crate::request::Request;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Priority subscribers get when registered without one.
pub const DEFAULT_PRIORITY: i32 = 10;

/// A subscriber to an extension point.
///
/// Returns the request unchanged or a replacement built with
/// [`crate::request::RequestType::extend`].
pub trait RequestFilter: Send + Sync {
    /// Processes the request.
    fn filter(&self, request: Box<dyn Request>) -> Result<Box<dyn Request>>;
}

impl<F> RequestFilter for F
where
    F: Fn(Box<dyn Request>) -> Result<Box<dyn Request>> + Send + Sync,
{
    fn filter(&self, request: Box<dyn Request>) -> Result<Box<dyn Request>> {
        self(request)
    }
}

struct Subscriber {
    priority: i32,
    filter: Arc<dyn RequestFilter>,
}

/// Registry of request filters.
///
/// Subscribers for a point run in ascending priority; equal priorities run
/// in registration order.
#[derive(Default)]
pub struct FilterRegistry {
    points: RwLock<HashMap<String, Vec<Subscriber>>>,
}

impl FilterRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `filter` to `point` at [`DEFAULT_PRIORITY`].
    pub fn add_filter<F>(&self, point: impl Into<String>, filter: F)
    where
        F: Fn(Box<dyn Request>) -> Result<Box<dyn Request>> + Send + Sync + 'static,
    {
        self.subscribe(point, DEFAULT_PRIORITY, Arc::new(filter));
    }

    /// Subscribes `filter` to `point` at `priority`.
    pub fn add_filter_with_priority<F>(&self, point: impl Into<String>, priority: i32, filter: F)
    where
        F: Fn(Box<dyn Request>) -> Result<Box<dyn Request>> + Send + Sync + 'static,
    {
        self.subscribe(point, priority, Arc::new(filter));
    }

    /// Subscribes a filter object to `point` at `priority`.
    pub fn subscribe(
        &self,
        point: impl Into<String>,
        priority: i32,
        filter: Arc<dyn RequestFilter>,
    ) {
        let point = point.into();
        let mut points = self.points.write();
        let subscribers = points.entry(point.clone()).or_default();
        let position = subscribers.partition_point(|s| s.priority <= priority);
        subscribers.insert(position, Subscriber { priority, filter });
        debug!(point = %point, priority, "Registered request filter");
    }

    /// Number of subscribers to `point`.
    #[must_use]
    pub fn subscriber_count(&self, point: &str) -> usize {
        self.points.read().get(point).map_or(0, Vec::len)
    }

    /// True if anything subscribes to `point`.
    #[must_use]
    pub fn has_filters(&self, point: &str) -> bool {
        self.subscriber_count(point) > 0
    }

    /// Removes every subscriber of `point`.
    pub fn remove_all(&self, point: &str) {
        self.points.write().remove(point);
    }

    /// Clears the registry.
    pub fn clear(&self) {
        self.points.write().clear();
    }

    /// Runs `request` through the subscribers of its extension point.
    ///
    /// Requests whose type declares no extension point are returned as is.
    pub fn apply_filters(&self, request: Box<dyn Request>) -> Result<Box<dyn Request>> {
        match request.descriptor().resolved_extension_point() {
            Some(point) => self.apply_filters_at(point, request),
            None => Ok(request),
        }
    }

    /// Runs `request` through the subscribers of `point`.
    ///
    /// The first failing subscriber aborts the chain and its error is
    /// returned unchanged. Every replacement must be the original type or a
    /// descendant of it, and must keep every value locked before it ran.
    pub fn apply_filters_at(
        &self,
        point: &str,
        mut request: Box<dyn Request>,
    ) -> Result<Box<dyn Request>> {
        // Snapshot so subscribers may register filters without deadlocking.
        let filters: Vec<Arc<dyn RequestFilter>> = match self.points.read().get(point) {
            Some(subscribers) => subscribers.iter().map(|s| Arc::clone(&s.filter)).collect(),
            None => return Ok(request),
        };

        let original = request.descriptor();
        for filter in filters {
            let before = request.descriptor().name;
            let locks = request.core().params().locked().clone();
            request = filter.filter(request)?;

            let after = request.descriptor();
            if !after.is_a(original) {
                return Err(ServerRequestError::new(format!(
                    "Filter for {point} returned {}, which does not extend {}",
                    after.name, original.name
                ))
                .into());
            }
            request.core_mut().inherit_locks(&locks)?;
            if after.name != before {
                info!(
                    point = %point,
                    from = before,
                    to = after.name,
                    "Request replaced by extension"
                );
            }
        }
        Ok(request)
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let points = self.points.read();
        f.debug_struct("FilterRegistry")
            .field("point_count", &points.len())
            .field(
                "subscriber_count",
                &points.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}
