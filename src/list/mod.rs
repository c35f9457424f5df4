//! List pages
//!
//! Query state, pagination and the controller that drives a list endpoint.

mod controller;
mod pagination;
mod query;

pub use controller::ListController;
pub use pagination::{PageLink, Pagination};
pub use query::{ListQuery, SortDirection, DEFAULT_PAGE_SIZE, RESERVED_PARAMS};
