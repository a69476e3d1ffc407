use serde::{Deserialize, Deserializer, Serialize};

use super::{Customer, Document};

/// Pagination block of a list or search response. Every field is optional;
/// the vendor omits some of them depending on the endpoint and mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemotePagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    #[serde(flatten)]
    pub other: Document,
}

/// `{items, pagination}` envelope returned by the list and search endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Customer>,
    #[serde(default)]
    pub pagination: Option<RemotePagination>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
