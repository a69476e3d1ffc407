use super::{common::ExtraFilters, Query};

/// Parameters for `GET /customers/{id}/promotions`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromotionQuery {
    pub status: Option<String>,
    pub platform: Option<String>,
    pub extra: ExtraFilters,
}

impl Query for PromotionQuery {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status".to_string(), status.to_string()));
        }
        if let Some(platform) = self.platform.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("platform".to_string(), platform.to_string()));
        }
        self.extra.apply(&mut pairs);
        pairs
    }
}

impl PromotionQuery {
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_platform(mut self, platform: &str) -> Self {
        self.platform = Some(platform.to_string());
        self
    }

    /// Adds a pass-through filter. `None` values are not sent.
    pub fn with_filter(mut self, key: &str, value: Option<&str>) -> Self {
        self.extra.insert(key, value);
        self
    }
}
