//! Staff-facing portal pages. Each handler makes at most one API call.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use shopline_api::{CustomerQuery, PromotionQuery};

use crate::auth::StaffUser;
use crate::params::{ListParams, PageInfo};
use crate::render::{CustomerDetailPage, CustomerListPage, ErrorPage, PromotionsPage};
use crate::state::PortalState;

pub const CUSTOMER_LIST_PATH: &str = "/portal/customers/";

const TOKEN_MISSING_LIST: &str =
    "SHOPLINE_ACCESS_TOKEN is not set. Add it in .env or environment.";
const TOKEN_MISSING: &str = "SHOPLINE_ACCESS_TOKEN is not set.";

/// Fields the detail page asks for on top of the default set.
const DETAIL_INCLUDE_FIELDS: &[&str] = &["subscription", "referrer_data"];

pub async fn portal_home(_staff: StaffUser) -> Redirect {
    Redirect::to(CUSTOMER_LIST_PATH)
}

pub async fn customer_list(
    State(state): State<Arc<PortalState>>,
    staff: StaffUser,
    RawQuery(raw): RawQuery,
) -> Response {
    if !state.has_access_token() {
        return ErrorPage::config_missing(TOKEN_MISSING_LIST).into_response();
    }

    let params = ListParams::parse(raw.as_deref().unwrap_or_default());
    let result = match params.search_query() {
        Some(search) => state.client.search_customers(&search).await,
        None => state.client.list_customers(&params.list_query()).await,
    };

    match result {
        Ok(page) => {
            let info = PageInfo::resolve(&page, params.page);
            let customers = page
                .items
                .into_iter()
                .map(|customer| customer.with_tier_display())
                .collect();
            CustomerListPage {
                customers,
                info,
                params,
            }
            .into_response()
        }
        Err(e) => {
            tracing::error!(staff = %staff.username, "Customer list failed: {}", e);
            ErrorPage::api_error(&e).into_response()
        }
    }
}

pub async fn customer_detail(
    State(state): State<Arc<PortalState>>,
    staff: StaffUser,
    Path(customer_id): Path<String>,
) -> Response {
    if !state.has_access_token() {
        return ErrorPage::config_missing(TOKEN_MISSING).into_response();
    }

    let query = CustomerQuery::default().with_include_fields(DETAIL_INCLUDE_FIELDS);
    match state.client.get_customer(&customer_id, &query).await {
        Ok(customer) => CustomerDetailPage::new(customer).into_response(),
        Err(e) if e.is_not_found() => ErrorPage::customer_not_found(&customer_id).into_response(),
        Err(e) => {
            tracing::error!(
                staff = %staff.username,
                "Customer {} detail failed: {}",
                customer_id,
                e
            );
            ErrorPage::api_error(&e).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PromotionParams {
    #[serde(default)]
    status: String,
    #[serde(default)]
    platform: String,
}

pub async fn customer_promotions(
    State(state): State<Arc<PortalState>>,
    staff: StaffUser,
    Path(customer_id): Path<String>,
    Query(params): Query<PromotionParams>,
) -> Response {
    if !state.has_access_token() {
        return ErrorPage::config_missing(TOKEN_MISSING).into_response();
    }

    let status = params.status.trim();
    let platform = params.platform.trim();
    let query = PromotionQuery::default()
        .with_status(status)
        .with_platform(platform);

    match state
        .client
        .get_customer_promotions(&customer_id, &query)
        .await
    {
        Ok(response) => {
            PromotionsPage::new(&customer_id, response, status, platform).into_response()
        }
        Err(e) if e.is_not_found() => ErrorPage::customer_not_found(&customer_id).into_response(),
        Err(e) => {
            tracing::error!(
                staff = %staff.username,
                "Customer {} promotions failed: {}",
                customer_id,
                e
            );
            ErrorPage::api_error(&e).into_response()
        }
    }
}
