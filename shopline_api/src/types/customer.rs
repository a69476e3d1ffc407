use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loosely-typed JSON object as returned by the vendor, in response order.
pub type Document = serde_json::Map<String, Value>;

/// Key under which the derived tier display name is stored.
pub const TIER_DISPLAY_KEY: &str = "membership_tier_display";

/// A customer record. Kept as the vendor's document; only the fields the
/// portal reads get typed accessors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Customer(Document);

impl Customer {
    pub fn new(document: Document) -> Self {
        Customer(document)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }

    /// The customer id as text, or an empty string when missing.
    pub fn id(&self) -> String {
        self.get("id").map(value_text).unwrap_or_default()
    }

    /// The membership tier, when the customer has a non-empty tier object.
    pub fn membership_tier(&self) -> Option<MembershipTier<'_>> {
        match self.get("membership_tier") {
            Some(Value::Object(tier)) if !tier.is_empty() => Some(MembershipTier(tier)),
            _ => None,
        }
    }

    /// Display name of the membership tier.
    ///
    /// The first entry of `name_translations` in response order wins; no
    /// locale is consulted. A tier without usable translations shows its id,
    /// and a customer without a tier shows nothing.
    pub fn membership_tier_display(&self) -> String {
        let Some(tier) = self.membership_tier() else {
            return String::new();
        };
        tier.name_translations()
            .and_then(|names| names.values().next())
            .filter(|first| !is_blank(first))
            .map(value_text)
            .unwrap_or_else(|| tier.id())
    }

    /// Stores [`membership_tier_display`](Self::membership_tier_display)
    /// in the document under [`TIER_DISPLAY_KEY`].
    pub fn with_tier_display(mut self) -> Self {
        let display = self.membership_tier_display();
        self.0.insert(TIER_DISPLAY_KEY.to_string(), Value::String(display));
        self
    }
}

impl From<Document> for Customer {
    fn from(document: Document) -> Self {
        Customer(document)
    }
}

/// Borrowed view of a customer's `membership_tier` object.
#[derive(Clone, Copy, Debug)]
pub struct MembershipTier<'a>(&'a Document);

impl<'a> MembershipTier<'a> {
    pub fn id(&self) -> String {
        self.0.get("id").map(value_text).unwrap_or_default()
    }

    /// Locale-keyed names, if the tier carries them as an object.
    pub fn name_translations(&self) -> Option<&'a Document> {
        match self.0.get("name_translations") {
            Some(Value::Object(names)) => Some(names),
            _ => None,
        }
    }
}

/// Renders a JSON value as plain text: strings unquoted, null as empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Empty strings and containers, `null`, `false` and zero all count as blank.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn customer(value: Value) -> Customer {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn display_name_is_first_translation_in_response_order() {
        let c = customer(json!({
            "id": "c1",
            "membership_tier": {
                "id": "tier_gold",
                "name_translations": {"zh-hant": "金卡", "en": "Gold"}
            }
        }));
        assert_eq!(c.membership_tier_display(), "金卡");

        let c = customer(json!({
            "id": "c1",
            "membership_tier": {
                "id": "tier_gold",
                "name_translations": {"en": "Gold", "zh": "金卌"}
            }
        }));
        assert_eq!(c.membership_tier_display(), "Gold");
    }

    #[test]
    fn display_name_falls_back_to_tier_id() {
        let empty_map = customer(json!({
            "membership_tier": {"id": "tier_silver", "name_translations": {}}
        }));
        assert_eq!(empty_map.membership_tier_display(), "tier_silver");

        let missing_map = customer(json!({"membership_tier": {"id": "tier_silver"}}));
        assert_eq!(missing_map.membership_tier_display(), "tier_silver");

        let not_a_map = customer(json!({
            "membership_tier": {"id": "tier_silver", "name_translations": "Silver"}
        }));
        assert_eq!(not_a_map.membership_tier_display(), "tier_silver");

        let blank_first = customer(json!({
            "membership_tier": {"id": "tier_silver", "name_translations": {"en": ""}}
        }));
        assert_eq!(blank_first.membership_tier_display(), "tier_silver");

        for falsy in [json!(0), json!(0.0), json!(false), json!([])] {
            let c = customer(json!({
                "membership_tier": {"id": "tier_silver", "name_translations": {"en": falsy}}
            }));
            assert_eq!(c.membership_tier_display(), "tier_silver");
        }

        let truthy_number = customer(json!({
            "membership_tier": {"id": "tier_silver", "name_translations": {"en": 7}}
        }));
        assert_eq!(truthy_number.membership_tier_display(), "7");
    }

    #[test]
    fn display_name_is_empty_without_tier() {
        assert_eq!(customer(json!({"id": "c1"})).membership_tier_display(), "");
        assert_eq!(
            customer(json!({"id": "c1", "membership_tier": null})).membership_tier_display(),
            ""
        );
        assert_eq!(
            customer(json!({"id": "c1", "membership_tier": {}})).membership_tier_display(),
            ""
        );
    }

    #[test]
    fn with_tier_display_adds_the_derived_field() {
        let c = customer(json!({
            "id": 42,
            "membership_tier": {"id": "vip", "name_translations": {"en": "VIP"}}
        }))
        .with_tier_display();
        assert_eq!(c.get(TIER_DISPLAY_KEY), Some(&json!("VIP")));
        assert_eq!(c.id(), "42");
    }
}
