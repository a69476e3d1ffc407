//! Library layer for the Shopline staff portal: configuration, staff
//! authentication, and the HTML views over the `shopline_api` client.
//!
//! [`app`] assembles the full router; the binary only binds and serves it.

pub mod auth;
pub mod config;
pub mod error;
pub mod params;
pub mod render;
pub mod session;
pub mod state;
pub mod views;

use std::sync::Arc;

use axum::{response::Redirect, routing::get, Router};
use tower_http::trace::TraceLayer;

pub use shopline_api;
pub use shopline_api::types;

pub use auth::{hash_password, LoginOptions, StaffAccounts, StaffUser};
pub use config::PortalConfig;
pub use error::PortalError;
pub use session::SessionStore;
pub use state::PortalState;

/// Builds the portal router. Staff pages accept GET only.
pub fn app(state: Arc<PortalState>, login: LoginOptions) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(auth::PORTAL_HOME) }))
        .route(auth::PORTAL_HOME, get(views::portal_home))
        .route(views::CUSTOMER_LIST_PATH, get(views::customer_list))
        .route("/portal/customers/{customer_id}/", get(views::customer_detail))
        .route(
            "/portal/customers/{customer_id}/promotions/",
            get(views::customer_promotions),
        )
        .merge(auth::routes(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
