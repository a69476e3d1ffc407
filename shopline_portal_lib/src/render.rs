//! HTML pages. Every dynamic value goes through [`esc`] before it is written.

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use quick_xml::escape::escape;
use serde_json::Value;
use shopline_api::types::{value_text, Customer, Document, TIER_DISPLAY_KEY};
use url::Url;

use crate::auth::{LOGIN_PATH, LOGOUT_PATH};
use crate::params::{ListParams, PageInfo};
use crate::views::CUSTOMER_LIST_PATH;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;color:#222}\
header{background:#1f2937;color:#fff;padding:.75rem 1.5rem;display:flex;justify-content:space-between}\
header a{color:#fff;text-decoration:none}main{padding:1.5rem}\
table{border-collapse:collapse;width:100%}th,td{border-bottom:1px solid #ddd;padding:.4rem .6rem;text-align:left;vertical-align:top}\
form.filters{display:flex;gap:.5rem;margin-bottom:1rem}.pager{margin-top:1rem;display:flex;gap:1rem}\
.error{border-left:4px solid #b91c1c;padding:.5rem 1rem;background:#fef2f2}pre{margin:0;white-space:pre-wrap}";

fn esc(raw: &str) -> Cow<'_, str> {
    escape(raw)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | Shopline Admin Portal</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><a href=\"/portal/customers/\">Shopline Admin Portal</a>\
         <a href=\"{LOGOUT_PATH}\">Log out</a></header>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = esc(title),
    )
}

/// Renders a field for a table cell: scalars as text, containers as JSON.
fn cell(value: Option<&Value>) -> String {
    match value {
        Some(v @ (Value::Object(_) | Value::Array(_))) => {
            let pretty = serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
            format!("<pre>{}</pre>", esc(&pretty))
        }
        Some(v) => esc(&value_text(v)).into_owned(),
        None => String::new(),
    }
}

/// First entry of a `*_translations` map, else the plain field.
fn translated(doc: &Document, key: &str) -> String {
    doc.get(&format!("{}_translations", key))
        .and_then(Value::as_object)
        .and_then(|names| names.values().next())
        .map(value_text)
        .filter(|name| !name.is_empty())
        .or_else(|| doc.get(key).map(value_text))
        .unwrap_or_default()
}

/// Detail path for `customer_id`, encoded as a single path segment.
fn customer_href(customer_id: &str) -> String {
    let Ok(mut url) = Url::parse("http://portal.invalid/portal/customers/") else {
        return CUSTOMER_LIST_PATH.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(customer_id).push("");
    }
    url.path().to_string()
}

/// In-portal error page. API failures keep HTTP 200 unless the page says
/// otherwise; the upstream status is displayed, not returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    pub title: String,
    pub message: String,
    pub status_code: Option<u16>,
    pub http_status: StatusCode,
}

impl ErrorPage {
    pub fn config_missing(message: &str) -> Self {
        Self {
            title: "Configuration missing".to_string(),
            message: message.to_string(),
            status_code: None,
            http_status: StatusCode::OK,
        }
    }

    pub fn customer_not_found(customer_id: &str) -> Self {
        Self {
            title: "Customer not found".to_string(),
            message: format!("No customer with ID {}.", customer_id),
            status_code: None,
            http_status: StatusCode::NOT_FOUND,
        }
    }

    pub fn api_error(err: &shopline_api::Error) -> Self {
        Self {
            title: "Shopline API error".to_string(),
            message: err.to_string(),
            status_code: err.status_code(),
            http_status: StatusCode::OK,
        }
    }

    pub fn render(&self) -> String {
        let mut body = format!(
            "<h1>{}</h1>\n<div class=\"error\">\n<p>{}</p>\n",
            esc(&self.title),
            esc(&self.message)
        );
        if let Some(status) = self.status_code {
            body.push_str(&format!("<p class=\"status\">Status code: {}</p>\n", status));
        }
        body.push_str("</div>\n<p><a href=\"/portal/customers/\">Back to customers</a></p>");
        layout(&self.title, &body)
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        (self.http_status, Html(self.render())).into_response()
    }
}

/// The paginated, filterable customer list.
pub struct CustomerListPage {
    pub customers: Vec<Customer>,
    pub info: PageInfo,
    pub params: ListParams,
}

impl CustomerListPage {
    fn page_href(&self, page: i64) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("page", &page.to_string());
        query.append_pair("per_page", &self.params.per_page.to_string());
        if !self.params.query.is_empty() {
            query.append_pair("query", &self.params.query);
        }
        if !self.params.is_member.is_empty() {
            query.append_pair("is_member", &self.params.is_member);
        }
        query.append_pair("sort_by", &self.params.sort_by.to_string());
        format!("/portal/customers/?{}", query.finish())
    }

    fn filters(&self) -> String {
        let selected = |value: &str| {
            if self.params.is_member == value {
                " selected"
            } else {
                ""
            }
        };
        let sort_selected = |value: &str| {
            if self.params.sort_by.to_string() == value {
                " selected"
            } else {
                ""
            }
        };
        format!(
            "<form class=\"filters\" method=\"get\" action=\"/portal/customers/\">\n\
             <input type=\"search\" name=\"query\" value=\"{query}\" placeholder=\"Name, email or phone\">\n\
             <select name=\"is_member\"><option value=\"\"{any}>All customers</option>\
             <option value=\"true\"{yes}>Members</option><option value=\"false\"{no}>Non-members</option></select>\n\
             <select name=\"sort_by\"><option value=\"desc\"{desc}>Newest first</option>\
             <option value=\"asc\"{asc}>Oldest first</option></select>\n\
             <input type=\"number\" name=\"per_page\" min=\"1\" max=\"999\" value=\"{per_page}\">\n\
             <button type=\"submit\">Filter</button>\n</form>",
            query = esc(&self.params.query),
            any = selected(""),
            yes = selected("true"),
            no = selected("false"),
            desc = sort_selected("desc"),
            asc = sort_selected("asc"),
            per_page = self.params.per_page,
        )
    }

    pub fn render(&self) -> String {
        let mut body = String::from("<h1>Customers</h1>\n");
        body.push_str(&self.filters());
        body.push_str(&format!(
            "\n<p class=\"summary\">{} customers &middot; page {} of {}</p>\n",
            self.info.total_count, self.info.current_page, self.info.total_pages
        ));

        if self.customers.is_empty() {
            body.push_str("<p>No customers found.</p>\n");
        } else {
            body.push_str(
                "<table>\n<thead><tr><th>Name</th><th>Email</th><th>Phone</th>\
                 <th>Member</th><th>Tier</th><th>Updated</th></tr></thead>\n<tbody>\n",
            );
            for customer in &self.customers {
                let id = customer.id();
                let name = customer.get("name").map(value_text).unwrap_or_default();
                let label = if name.is_empty() { id.clone() } else { name };
                body.push_str(&format!(
                    "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    esc(&customer_href(&id)),
                    esc(&label),
                    cell(customer.get("email")),
                    cell(customer.get("mobile_phone").or_else(|| customer.get("phone"))),
                    cell(customer.get("is_member")),
                    esc(&customer.membership_tier_display()),
                    cell(customer.get("updated_at")),
                ));
            }
            body.push_str("</tbody>\n</table>\n");
        }

        body.push_str("<nav class=\"pager\">");
        if let Some(previous) = self.info.previous_page() {
            body.push_str(&format!(
                "<a rel=\"prev\" href=\"{}\">&laquo; Previous</a>",
                esc(&self.page_href(previous))
            ));
        }
        if let Some(next) = self.info.next_page() {
            body.push_str(&format!(
                "<a rel=\"next\" href=\"{}\">Next &raquo;</a>",
                esc(&self.page_href(next))
            ));
        }
        body.push_str("</nav>");
        layout("Customers", &body)
    }
}

impl IntoResponse for CustomerListPage {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}

/// One customer, with the derived tier display name already attached.
pub struct CustomerDetailPage {
    pub customer: Customer,
}

impl CustomerDetailPage {
    pub fn new(customer: Customer) -> Self {
        Self {
            customer: customer.with_tier_display(),
        }
    }

    pub fn render(&self) -> String {
        let id = self.customer.id();
        let name = self.customer.get("name").map(value_text).unwrap_or_default();
        let heading = if name.is_empty() { id.clone() } else { name };

        let mut body = format!("<h1>{}</h1>\n<dl>\n", esc(&heading));
        for (label, key) in [
            ("Customer ID", "id"),
            ("Email", "email"),
            ("Phone", "mobile_phone"),
            ("Member", "is_member"),
            ("Membership tier", TIER_DISPLAY_KEY),
            ("Created", "created_at"),
        ] {
            body.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>\n",
                label,
                cell(self.customer.get(key))
            ));
        }
        body.push_str(&format!(
            "</dl>\n<p><a href=\"{}promotions/\">Promotions</a> &middot; \
             <a href=\"/portal/customers/\">Back to customers</a></p>\n",
            esc(&customer_href(&id))
        ));

        body.push_str("<h2>All fields</h2>\n<table>\n<tbody>\n");
        for (key, value) in self.customer.document() {
            body.push_str(&format!(
                "<tr><th>{}</th><td>{}</td></tr>\n",
                esc(key),
                cell(Some(value))
            ));
        }
        body.push_str("</tbody>\n</table>");
        layout(&heading, &body)
    }
}

impl IntoResponse for CustomerDetailPage {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}

/// Promotions and coupons available to one customer.
pub struct PromotionsPage {
    pub customer_id: String,
    pub promotions: Vec<Document>,
    pub status: String,
    pub platform: String,
}

impl PromotionsPage {
    /// Takes the `items` array of the response; anything else means none.
    pub fn new(customer_id: &str, response: Document, status: &str, platform: &str) -> Self {
        let promotions = match response.get("items") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            _ => Vec::new(),
        };
        Self {
            customer_id: customer_id.to_string(),
            promotions,
            status: status.to_string(),
            platform: platform.to_string(),
        }
    }

    pub fn render(&self) -> String {
        let mut body = format!(
            "<h1>Promotions</h1>\n<p>Customer <a href=\"{href}\">{id}</a></p>\n\
             <form class=\"filters\" method=\"get\">\n\
             <input type=\"text\" name=\"status\" value=\"{status}\" placeholder=\"Status\">\n\
             <input type=\"text\" name=\"platform\" value=\"{platform}\" placeholder=\"Platform\">\n\
             <button type=\"submit\">Filter</button>\n</form>\n",
            href = esc(&customer_href(&self.customer_id)),
            id = esc(&self.customer_id),
            status = esc(&self.status),
            platform = esc(&self.platform),
        );

        if self.promotions.is_empty() {
            body.push_str("<p>No promotions found.</p>");
        } else {
            body.push_str(
                "<table>\n<thead><tr><th>ID</th><th>Title</th><th>Status</th>\
                 <th>Discount</th><th>Starts</th><th>Ends</th></tr></thead>\n<tbody>\n",
            );
            for promotion in &self.promotions {
                body.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    cell(promotion.get("id")),
                    esc(&translated(promotion, "title")),
                    cell(promotion.get("status")),
                    cell(promotion.get("discount_type")),
                    cell(promotion.get("start_at")),
                    cell(promotion.get("end_at")),
                ));
            }
            body.push_str("</tbody>\n</table>");
        }
        layout("Promotions", &body)
    }
}

impl IntoResponse for PromotionsPage {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}

/// Staff login form.
pub struct LoginPage {
    pub next: String,
    pub username: String,
    pub error: Option<String>,
}

impl LoginPage {
    pub fn new(next: &str) -> Self {
        Self {
            next: next.to_string(),
            username: String::new(),
            error: None,
        }
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn render(&self) -> String {
        let error = self
            .error
            .as_deref()
            .map(|e| format!("<div class=\"error\"><p>{}</p></div>\n", esc(e)))
            .unwrap_or_default();
        let body = format!(
            "<h1>Staff login</h1>\n{error}\
             <form method=\"post\" action=\"{LOGIN_PATH}\">\n\
             <p><label>Username <input type=\"text\" name=\"username\" value=\"{username}\" autofocus required></label></p>\n\
             <p><label>Password <input type=\"password\" name=\"password\" required></label></p>\n\
             <input type=\"hidden\" name=\"next\" value=\"{next}\">\n\
             <button type=\"submit\">Log in</button>\n</form>",
            username = esc(&self.username),
            next = esc(&self.next),
        );
        layout("Log in", &body)
    }
}

impl IntoResponse for LoginPage {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_page_shows_status_only_when_present() {
        let page = ErrorPage {
            title: "Shopline API error".to_string(),
            message: "boom".to_string(),
            status_code: Some(500),
            http_status: StatusCode::OK,
        };
        assert!(page.render().contains("Status code: 500"));

        let page = ErrorPage::config_missing("SHOPLINE_ACCESS_TOKEN is not set.");
        let html = page.render();
        assert!(html.contains("Configuration missing"));
        assert!(!html.contains("Status code"));
        assert_eq!(page.http_status, StatusCode::OK);
    }

    #[test]
    fn customer_links_encode_the_id_as_a_path_segment() {
        assert_eq!(customer_href("cust_1"), "/portal/customers/cust_1/");
        assert_eq!(customer_href("a b+c"), "/portal/customers/a%20b+c/");
        assert_eq!(customer_href("x/y?z#w"), "/portal/customers/x%2Fy%3Fz%23w/");
    }

    #[test]
    fn customer_not_found_is_a_404() {
        let page = ErrorPage::customer_not_found("abc");
        assert_eq!(page.http_status, StatusCode::NOT_FOUND);
        assert!(page.render().contains("No customer with ID abc."));
    }

    #[test]
    fn values_are_escaped() {
        let customer: Customer =
            serde_json::from_value(json!({"id": "c1", "name": "<script>alert(1)</script>"}))
                .unwrap();
        let html = CustomerDetailPage::new(customer).render();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn detail_page_shows_tier_display() {
        let customer: Customer = serde_json::from_value(json!({
            "id": "c1",
            "membership_tier": {"id": "tier_gold", "name_translations": {"en": "Gold", "zh": "金卌"}}
        }))
        .unwrap();
        let page = CustomerDetailPage::new(customer);
        assert_eq!(page.customer.get(TIER_DISPLAY_KEY), Some(&json!("Gold")));
        assert!(page.render().contains("<dd>Gold</dd>"));
    }

    #[test]
    fn list_page_links_keep_filters() {
        let page = CustomerListPage {
            customers: Vec::new(),
            info: PageInfo {
                total_count: 60,
                total_pages: 3,
                current_page: 2,
            },
            params: ListParams::parse("page=2&per_page=20&query=jane&is_member=true"),
        };
        let html = page.render();
        assert!(html.contains(
            "href=\"/portal/customers/?page=1&amp;per_page=20&amp;query=jane&amp;is_member=true&amp;sort_by=desc\""
        ));
        assert!(html.contains("page=3&amp;per_page=20"));
        assert!(html.contains("No customers found."));
    }

    #[test]
    fn promotions_page_reads_items() {
        let response: Document = serde_json::from_value(json!({
            "items": [{"id": "p1", "title_translations": {"en": "Spring sale"}, "status": "available"}]
        }))
        .unwrap();
        let page = PromotionsPage::new("c1", response, "", "");
        assert_eq!(page.promotions.len(), 1);
        assert!(page.render().contains("Spring sale"));

        let page = PromotionsPage::new("c1", Document::new(), "", "");
        assert!(page.render().contains("No promotions found."));
    }

    #[test]
    fn login_page_keeps_next() {
        let html = LoginPage::new("/portal/customers/?page=2")
            .with_error("Please enter the correct username and password for a staff account.")
            .render();
        assert!(html.contains("value=\"/portal/customers/?page=2\""));
        assert!(html.contains("class=\"error\""));
        assert!(html.contains(&format!("action=\"{}\"", LOGIN_PATH)));
    }
}
