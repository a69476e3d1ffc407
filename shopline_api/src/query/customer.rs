use super::{
    common::{QueryCommon, SortDirection},
    PagedQuery, Query,
};

/// Default page size of `GET /customers`.
pub const DEFAULT_LIST_PER_PAGE: i64 = 24;

/// Parameters for `GET /customers`.
///
/// Setting [`previous_id`](Self::with_previous_id) switches to cursor-based
/// pagination, and `page` is then left out of the request entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerListQuery {
    pub common: QueryCommon,
    pub sort_by: SortDirection,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    pub previous_id: Option<String>,
}

impl Default for CustomerListQuery {
    fn default() -> Self {
        CustomerListQuery {
            common: QueryCommon::new(DEFAULT_LIST_PER_PAGE),
            sort_by: SortDirection::Desc,
            updated_after: None,
            updated_before: None,
            previous_id: None,
        }
    }
}

impl Query for CustomerListQuery {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let previous_id = self.previous_id.as_deref().filter(|id| !id.is_empty());
        if previous_id.is_none() {
            pairs.push(("page".to_string(), self.common.page.to_string()));
        }
        pairs.push(("per_page".to_string(), self.common.per_page.to_string()));
        pairs.push(("sort_by".to_string(), self.sort_by.to_string()));
        if let Some(updated_after) = self.updated_after.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("updated_after".to_string(), updated_after.to_string()));
        }
        if let Some(updated_before) = self.updated_before.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("updated_before".to_string(), updated_before.to_string()));
        }
        if let Some(previous_id) = previous_id {
            pairs.push(("previous_id".to_string(), previous_id.to_string()));
        }
        pairs
    }
}

impl PagedQuery for CustomerListQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
}

impl CustomerListQuery {
    pub fn with_sort_by(mut self, sort_by: SortDirection) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_updated_after(mut self, updated_after: &str) -> Self {
        self.updated_after = Some(updated_after.to_string());
        self
    }

    pub fn with_updated_before(mut self, updated_before: &str) -> Self {
        self.updated_before = Some(updated_before.to_string());
        self
    }

    pub fn with_previous_id(mut self, previous_id: &str) -> Self {
        self.previous_id = Some(previous_id.to_string());
        self
    }
}

/// Parameters for `GET /customers/{id}`. Each list goes out as a repeated
/// `name[]` parameter, one per element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerQuery {
    pub excludes: Vec<String>,
    pub fields: Vec<String>,
    pub include_fields: Vec<String>,
}

impl Query for CustomerQuery {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for exclude in self.excludes.iter() {
            pairs.push(("excludes[]".to_string(), exclude.clone()));
        }
        for field in self.fields.iter() {
            pairs.push(("fields[]".to_string(), field.clone()));
        }
        for field in self.include_fields.iter() {
            pairs.push(("include_fields[]".to_string(), field.clone()));
        }
        pairs
    }
}

impl CustomerQuery {
    pub fn with_exclude(mut self, exclude: &str) -> Self {
        self.excludes.push(exclude.to_string());
        self
    }
    pub fn with_excludes(mut self, excludes: &[&str]) -> Self {
        self.excludes.extend(excludes.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.fields.push(field.to_string());
        self
    }
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields.extend(fields.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_include_field(mut self, field: &str) -> Self {
        self.include_fields.push(field.to_string());
        self
    }
    pub fn with_include_fields(mut self, fields: &[&str]) -> Self {
        self.include_fields.extend(fields.iter().map(|s| s.to_string()));
        self
    }
}
