//! Query-string handling for the customer list.
//!
//! Input is never rejected: malformed numbers fall back to defaults and
//! unrecognised filter values are treated as absent.

use std::collections::HashMap;

use shopline_api::types::CustomerPage;
use shopline_api::{
    CustomerListQuery, CustomerSearchQuery, PagedQuery, SortDirection, MAX_SEARCH_PER_PAGE,
};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 24;

/// Parsed and clamped parameters of `GET /portal/customers/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// At least 1.
    pub page: i64,
    /// Within `1..=999`.
    pub per_page: i64,
    /// Trimmed search text; empty means no search.
    pub query: String,
    /// Trimmed, lower-cased `is_member` as given, echoed back to the form.
    pub is_member: String,
    pub sort_by: SortDirection,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            query: String::new(),
            is_member: String::new(),
            sort_by: SortDirection::Desc,
        }
    }
}

impl ListParams {
    /// Parses a raw query string. Repeated keys keep the last value.
    pub fn parse(raw_query: &str) -> Self {
        let values: HashMap<String, String> = url::form_urlencoded::parse(raw_query.as_bytes())
            .into_owned()
            .collect();
        let get = |key: &str| values.get(key).map(String::as_str);

        let (page, per_page) = parse_paging(
            get("page").unwrap_or("1"),
            get("per_page").unwrap_or("24"),
        );

        Self {
            page,
            per_page,
            query: get("query").unwrap_or_default().trim().to_string(),
            is_member: get("is_member")
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
            sort_by: get("sort_by")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// `Some` only for exactly `true` or `false`.
    pub fn is_member_filter(&self) -> Option<bool> {
        match self.is_member.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// The search request to send, or `None` when a plain listing will do.
    pub fn search_query(&self) -> Option<CustomerSearchQuery> {
        let is_member = self.is_member_filter();
        if self.query.is_empty() && is_member.is_none() {
            return None;
        }
        let mut query = CustomerSearchQuery::default()
            .with_page(self.page)
            .with_per_page(self.per_page);
        if !self.query.is_empty() {
            query = query.with_query(&self.query);
        }
        if let Some(is_member) = is_member {
            query = query.with_is_member(is_member);
        }
        Some(query)
    }

    pub fn list_query(&self) -> CustomerListQuery {
        CustomerListQuery::default()
            .with_page(self.page)
            .with_per_page(self.per_page)
            .with_sort_by(self.sort_by)
    }
}

/// Both values parse or both fall back; never a partial default.
fn parse_paging(page: &str, per_page: &str) -> (i64, i64) {
    match (parse_int(page), parse_int(per_page)) {
        (Some(page), Some(per_page)) => (page.max(1), per_page.clamp(1, MAX_SEARCH_PER_PAGE)),
        _ => (DEFAULT_PAGE, DEFAULT_PER_PAGE),
    }
}

/// An optionally signed run of digits. Values outside `i64` saturate so
/// they clamp like any other out-of-range number.
fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(raw.parse().unwrap_or(if raw.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Pagination shown on the list page: the remote values when present,
/// otherwise derived from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

impl PageInfo {
    pub fn resolve(page: &CustomerPage, requested_page: i64) -> Self {
        let remote = page.pagination.clone().unwrap_or_default();
        Self {
            total_count: remote
                .total_count
                .unwrap_or(i64::try_from(page.items.len()).unwrap_or(i64::MAX)),
            total_pages: remote.total_pages.unwrap_or(1),
            current_page: remote.current_page.unwrap_or(requested_page),
        }
    }

    pub fn previous_page(&self) -> Option<i64> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<i64> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }
}

#[cfg(test)]
mod tests {
    use shopline_api::types::RemotePagination;
    use shopline_api::Query;

    use super::*;

    #[test]
    fn defaults_when_empty() {
        assert_eq!(ListParams::parse(""), ListParams::default());
    }

    #[test]
    fn page_and_per_page_are_clamped() {
        let params = ListParams::parse("page=0&per_page=0");
        assert_eq!((params.page, params.per_page), (1, 1));

        let params = ListParams::parse("page=-3&per_page=5000");
        assert_eq!((params.page, params.per_page), (1, 999));

        let params = ListParams::parse("page=7&per_page=48");
        assert_eq!((params.page, params.per_page), (7, 48));
    }

    #[test]
    fn malformed_paging_resets_both() {
        for raw in [
            "page=abc&per_page=50",
            "page=3&per_page=lots",
            "page=&per_page=50",
            "page=2.5",
            "page=-",
            "per_page=1e3",
        ] {
            let params = ListParams::parse(raw);
            assert_eq!((params.page, params.per_page), (1, 24), "query: {}", raw);
        }
    }

    #[test]
    fn overlong_numbers_clamp_instead_of_resetting() {
        let params = ListParams::parse("page=3&per_page=99999999999999999999");
        assert_eq!((params.page, params.per_page), (3, 999));

        let params = ListParams::parse("page=99999999999999999999&per_page=-99999999999999999999");
        assert_eq!((params.page, params.per_page), (i64::MAX, 1));

        let params = ListParams::parse("page=-99999999999999999999&per_page=10");
        assert_eq!((params.page, params.per_page), (1, 10));
    }

    #[test]
    fn numbers_tolerate_surrounding_whitespace() {
        let params = ListParams::parse("page=%2B2%20&per_page=%2010");
        assert_eq!((params.page, params.per_page), (2, 10));
    }

    #[test]
    fn is_member_only_accepts_true_or_false() {
        assert_eq!(ListParams::parse("is_member=TRUE").is_member_filter(), Some(true));
        assert_eq!(ListParams::parse("is_member=%20False%20").is_member_filter(), Some(false));
        for raw in ["is_member=yes", "is_member=1", "is_member=", ""] {
            let params = ListParams::parse(raw);
            assert_eq!(params.is_member_filter(), None);
            assert!(params.search_query().is_none(), "query: {}", raw);
        }
    }

    #[test]
    fn search_is_used_for_query_or_membership() {
        let params = ListParams::parse("query=%20jane%20&page=2&per_page=10");
        let search = params.search_query().unwrap();
        assert_eq!(search.query.as_deref(), Some("jane"));
        assert_eq!(search.is_member, None);
        assert_eq!((search.common.page, search.common.per_page), (2, 10));

        let params = ListParams::parse("is_member=false");
        let search = params.search_query().unwrap();
        assert_eq!(search.query, None);
        assert_eq!(search.is_member, Some(false));

        assert!(ListParams::parse("query=%20%20").search_query().is_none());
    }

    #[test]
    fn list_query_carries_sort_direction() {
        let pairs = ListParams::parse("sort_by=asc&page=4").list_query().to_query_pairs();
        assert!(pairs.contains(&("sort_by".to_string(), "asc".to_string())));
        assert!(pairs.contains(&("page".to_string(), "4".to_string())));

        let params = ListParams::parse("sort_by=sideways");
        assert_eq!(params.sort_by, SortDirection::Desc);
    }

    #[test]
    fn last_repeated_value_wins() {
        let params = ListParams::parse("page=2&page=5");
        assert_eq!(params.page, 5);
    }

    #[test]
    fn page_info_prefers_remote_values() {
        let page = CustomerPage {
            items: Vec::new(),
            pagination: Some(RemotePagination {
                current_page: Some(3),
                total_count: Some(120),
                total_pages: Some(5),
                ..Default::default()
            }),
        };
        let info = PageInfo::resolve(&page, 1);
        assert_eq!(
            info,
            PageInfo {
                total_count: 120,
                total_pages: 5,
                current_page: 3
            }
        );
        assert_eq!(info.previous_page(), Some(2));
        assert_eq!(info.next_page(), Some(4));
    }

    #[test]
    fn page_info_falls_back_to_request() {
        let page: CustomerPage =
            serde_json::from_str(r#"{"items": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
        let info = PageInfo::resolve(&page, 4);
        assert_eq!(
            info,
            PageInfo {
                total_count: 2,
                total_pages: 1,
                current_page: 4
            }
        );
        assert_eq!(info.next_page(), None);
    }
}
