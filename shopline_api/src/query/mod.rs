mod common;
pub use self::common::{ExtraFilters, PagedQuery, Query, QueryCommon, SortDirection};

mod customer;
pub use self::customer::{CustomerListQuery, CustomerQuery, DEFAULT_LIST_PER_PAGE};

mod search;
pub use self::search::{CustomerSearchQuery, DEFAULT_SEARCH_PER_PAGE, MAX_SEARCH_PER_PAGE};

mod promotion;
pub use self::promotion::PromotionQuery;
