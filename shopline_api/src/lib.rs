//! Read-only client for the customer endpoints of the Shopline Open API.

mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, ClientConfig, DEFAULT_BASE_URL};
pub use self::errors::{Error, ErrorBody};
pub use self::query::{
    CustomerListQuery, CustomerQuery, CustomerSearchQuery, ExtraFilters, PagedQuery,
    PromotionQuery, Query, QueryCommon, SortDirection, DEFAULT_LIST_PER_PAGE,
    DEFAULT_SEARCH_PER_PAGE, MAX_SEARCH_PER_PAGE,
};
