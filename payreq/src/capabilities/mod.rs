//! Capabilities shared by several request types.
//!
//! Each capability is a trait with default methods over [`crate::request::Request`];
//! a request type opts in with an empty `impl`.

mod dates;
mod mode;
mod order;
mod pagination;

pub use dates::DateFilters;
pub use mode::ModeFlag;
pub use order::{OrderDetails, OrderInfo, OrderLookup};
pub use pagination::{Pagination, SORT_DIRECTIONS};
