//! Shared query infrastructure: the [`Query`] and [`PagedQuery`] traits,
//! [`QueryCommon`] fields, and [`SortDirection`].

use std::str::FromStr;

use url::Url;

/// Trait implemented by all query builders. Provides URL serialization.
pub trait Query {
    /// Returns the query parameters in the order they are sent.
    fn to_query_pairs(&self) -> Vec<(String, String)>;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let pairs = self.to_query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs.iter());
        }
        url
    }
}

/// Query builders addressed by page number.
pub trait PagedQuery: Query {
    /// Returns a mutable reference to the common pagination fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the page number (1-indexed).
    fn with_page(mut self, page: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = page;
        self
    }

    /// Sets the number of results per page.
    fn with_per_page(mut self, per_page: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().per_page = per_page;
        self
    }
}

/// Sort order for the customer list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first. This is the default.
    #[default]
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            }
        )
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

/// Page-number pagination shared by the list and search queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryCommon {
    /// Page number (1-indexed). Defaults to 1.
    pub page: i64,
    /// Results per page.
    pub per_page: i64,
}

impl QueryCommon {
    pub fn new(per_page: i64) -> Self {
        QueryCommon { page: 1, per_page }
    }
}

/// Sets `key` to `value`, replacing an earlier pair with the same key in place.
pub(crate) fn set_pair(pairs: &mut Vec<(String, String)>, key: &str, value: String) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some(existing) => existing.1 = value,
        None => pairs.push((key.to_string(), value)),
    }
}

/// Extra pass-through filters. Entries without a value are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtraFilters(Vec<(String, String)>);

impl ExtraFilters {
    pub fn insert(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            set_pair(&mut self.0, key, value.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies the filters over already-built parameters, overriding on name clashes.
    pub(crate) fn apply(&self, pairs: &mut Vec<(String, String)>) {
        for (key, value) in &self.0 {
            set_pair(pairs, key, value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_parses_case_insensitively() {
        assert_eq!("ASC".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!(" desc ".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("newest".parse::<SortDirection>().is_err());
    }

    #[test]
    fn set_pair_replaces_in_place() {
        let mut pairs = vec![
            ("page".to_string(), "1".to_string()),
            ("per_page".to_string(), "30".to_string()),
        ];
        set_pair(&mut pairs, "page", "4".to_string());
        set_pair(&mut pairs, "created_after", "2024-01-01".to_string());
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "4".to_string()),
                ("per_page".to_string(), "30".to_string()),
                ("created_after".to_string(), "2024-01-01".to_string()),
            ]
        );
    }

    #[test]
    fn extra_filters_skip_missing_values() {
        let mut extra = ExtraFilters::default();
        extra.insert("gender", None);
        assert!(extra.is_empty());
        extra.insert("gender", Some("female"));
        assert!(!extra.is_empty());
    }
}
