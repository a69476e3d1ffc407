use super::{
    common::{ExtraFilters, QueryCommon},
    PagedQuery, Query,
};

/// Largest page size the search endpoint accepts.
pub const MAX_SEARCH_PER_PAGE: i64 = 999;

/// Default page size of `GET /customers/search`.
pub const DEFAULT_SEARCH_PER_PAGE: i64 = 30;

/// Parameters for `GET /customers/search`.
///
/// `query` matches name, email, phones and mobile phone on the vendor side.
/// `per_page` is capped at [`MAX_SEARCH_PER_PAGE`] when serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerSearchQuery {
    pub common: QueryCommon,
    pub query: Option<String>,
    pub is_member: Option<bool>,
    pub membership_tier_id: Option<String>,
    pub extra: ExtraFilters,
}

impl Default for CustomerSearchQuery {
    fn default() -> Self {
        CustomerSearchQuery {
            common: QueryCommon::new(DEFAULT_SEARCH_PER_PAGE),
            query: None,
            is_member: None,
            membership_tier_id: None,
            extra: ExtraFilters::default(),
        }
    }
}

impl Query for CustomerSearchQuery {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.common.page.to_string()),
            (
                "per_page".to_string(),
                self.common.per_page.min(MAX_SEARCH_PER_PAGE).to_string(),
            ),
        ];
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("query".to_string(), query.to_string()));
        }
        if let Some(is_member) = self.is_member {
            pairs.push(("is_member".to_string(), is_member.to_string()));
        }
        if let Some(tier_id) = &self.membership_tier_id {
            pairs.push(("membership_tier_id".to_string(), tier_id.clone()));
        }
        self.extra.apply(&mut pairs);
        pairs
    }
}

impl PagedQuery for CustomerSearchQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
}

impl CustomerSearchQuery {
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    pub fn with_is_member(mut self, is_member: bool) -> Self {
        self.is_member = Some(is_member);
        self
    }

    pub fn with_membership_tier_id(mut self, tier_id: &str) -> Self {
        self.membership_tier_id = Some(tier_id.to_string());
        self
    }

    /// Adds a pass-through filter. `None` values are not sent.
    pub fn with_filter(mut self, key: &str, value: Option<&str>) -> Self {
        self.extra.insert(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{CustomerSearchQuery, PagedQuery, Query};

    #[test]
    fn test_customer_search_query() {
        let url = Url::parse("https://example.com/customers/search").unwrap();

        insta::assert_snapshot!(CustomerSearchQuery::default()
            .with_page(2)
            .with_per_page(50)
            .with_query("jane doe")
            .with_is_member(false)
            .with_membership_tier_id("tier_gold")
            .with_filter("created_after", Some("2024-01-01"))
            .with_filter("gender", None)
            .add_to_url(&url)
            .to_string(), @"https://example.com/customers/search?page=2&per_page=50&query=jane+doe&is_member=false&membership_tier_id=tier_gold&created_after=2024-01-01");
    }

    #[test]
    fn per_page_is_capped() {
        for requested in [999, 1000, 5000, i64::MAX] {
            let pairs = CustomerSearchQuery::default()
                .with_per_page(requested)
                .to_query_pairs();
            assert!(pairs.contains(&("per_page".to_string(), "999".to_string())));
        }
        let pairs = CustomerSearchQuery::default().with_per_page(12).to_query_pairs();
        assert!(pairs.contains(&("per_page".to_string(), "12".to_string())));
    }

    #[test]
    fn is_member_is_lowercase_literal() {
        let pairs = CustomerSearchQuery::default()
            .with_is_member(true)
            .to_query_pairs();
        assert!(pairs.contains(&("is_member".to_string(), "true".to_string())));
    }

    #[test]
    fn empty_query_is_not_sent() {
        let pairs = CustomerSearchQuery::default().with_query("").to_query_pairs();
        assert!(pairs.iter().all(|(k, _)| k != "query"));
    }

    #[test]
    fn extra_filter_overrides_builtin_parameter() {
        let pairs = CustomerSearchQuery::default()
            .with_page(1)
            .with_filter("page", Some("7"))
            .to_query_pairs();
        assert_eq!(pairs[0], ("page".to_string(), "7".to_string()));
        assert_eq!(pairs.iter().filter(|(k, _)| k == "page").count(), 1);
    }
}
