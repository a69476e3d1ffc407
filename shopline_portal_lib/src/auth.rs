//! Staff authentication: accounts, the login surface, and the
//! [`StaffUser`] extractor that guards portal pages.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Form, Router,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::render::LoginPage;
use crate::state::PortalState;

pub const SESSION_COOKIE: &str = "portal_session";
pub const LOGIN_PATH: &str = "/admin/login/";
pub const LOGOUT_PATH: &str = "/admin/logout/";
/// Default landing page after a successful login.
pub const PORTAL_HOME: &str = "/portal/";

/// Staff usernames mapped to the hex SHA-256 of their password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffAccounts(HashMap<String, String>);

impl StaffAccounts {
    /// Parses `user:sha256hex` entries separated by commas. Malformed
    /// entries are skipped with a warning.
    pub fn parse(raw: &str) -> Self {
        let mut accounts = HashMap::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once(':') {
                Some((user, digest))
                    if !user.trim().is_empty()
                        && digest.len() == 64
                        && digest.chars().all(|c| c.is_ascii_hexdigit()) =>
                {
                    accounts.insert(user.trim().to_string(), digest.to_ascii_lowercase());
                }
                _ => tracing::warn!("Skipping malformed staff account entry: {:?}", entry),
            }
        }
        StaffAccounts(accounts)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.0.contains_key(username)
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.0.get(username) {
            Some(expected) => constant_time_eq(expected.as_bytes(), hash_password(password).as_bytes()),
            None => false,
        }
    }
}

/// Hex-encoded SHA-256 of `password`, as stored in `PORTAL_STAFF_USERS`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Options fixed when the login routes are registered.
#[derive(Debug, Clone)]
pub struct LoginOptions {
    /// Where a successful login lands when no `next` is given.
    pub post_login_redirect: String,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            post_login_redirect: PORTAL_HOME.to_string(),
        }
    }
}

/// A signed-in staff member. Extracting it redirects anonymous requests
/// to the login page with a `next` pointing back at the requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffUser {
    pub username: String,
}

impl FromRequestParts<Arc<PortalState>> for StaffUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<PortalState>,
    ) -> Result<Self, Self::Rejection> {
        match current_staff(&parts.headers, state) {
            Some(username) => Ok(StaffUser { username }),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or(PORTAL_HOME);
                Err(Redirect::to(&login_url(next)))
            }
        }
    }
}

/// Username behind the request's session cookie, if it is a live staff session.
fn current_staff(headers: &HeaderMap, state: &PortalState) -> Option<String> {
    let token = session_token(headers)?;
    let username = state.sessions.get(&token)?;
    state.config.staff.contains(&username).then_some(username)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
}

pub fn login_url(next: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    format!("{}?{}", LOGIN_PATH, query)
}

/// Accepts only same-site paths, so `next` can't bounce users elsewhere.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

/// Login and logout routes.
pub fn routes(options: LoginOptions) -> Router<Arc<PortalState>> {
    Router::new()
        .route(LOGIN_PATH, get(login_form).post(login_submit))
        .route(LOGOUT_PATH, get(logout).post(logout))
        .layer(Extension(Arc::new(options)))
}

#[derive(Debug, Deserialize)]
pub struct NextParam {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
    next: Option<String>,
}

async fn login_form(
    State(state): State<Arc<PortalState>>,
    Extension(options): Extension<Arc<LoginOptions>>,
    headers: HeaderMap,
    Query(params): Query<NextParam>,
) -> Response {
    if current_staff(&headers, &state).is_some() {
        return Redirect::to(&options.post_login_redirect).into_response();
    }
    let next = safe_next(params.next.as_deref()).unwrap_or(options.post_login_redirect.as_str());
    LoginPage::new(next).into_response()
}

async fn login_submit(
    State(state): State<Arc<PortalState>>,
    Extension(options): Extension<Arc<LoginOptions>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = safe_next(form.next.as_deref()).unwrap_or(options.post_login_redirect.as_str());
    let username = form.username.trim();

    if !state.config.staff.verify(username, &form.password) {
        tracing::warn!("Failed staff login for {:?}", username);
        return LoginPage::new(next)
            .with_username(username)
            .with_error("Please enter the correct username and password for a staff account.")
            .into_response();
    }

    let token = state.sessions.create(username);
    tracing::info!("Staff login: {}", username);
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        state.sessions.ttl().as_secs()
    );
    with_cookie(Redirect::to(next).into_response(), &cookie)
}

async fn logout(State(state): State<Arc<PortalState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }
    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    with_cookie(Redirect::to(LOGIN_PATH).into_response(), &cookie)
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Invalid session cookie header: {}", e),
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_HASH: &str = "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b";

    #[test]
    fn hash_password_is_hex_sha256() {
        assert_eq!(hash_password("secret"), SECRET_HASH);
    }

    #[test]
    fn staff_accounts_parse_and_verify() {
        let raw = format!(" alice:{} , broken, :{}, bob:xyz", SECRET_HASH.to_uppercase(), SECRET_HASH);
        let accounts = StaffAccounts::parse(&raw);
        assert!(accounts.contains("alice"));
        assert!(!accounts.contains("bob"));
        assert!(accounts.verify("alice", "secret"));
        assert!(!accounts.verify("alice", "Secret"));
        assert!(!accounts.verify("mallory", "secret"));
    }

    #[test]
    fn session_token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; portal_session=abc123; other=1"),
        );
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn next_must_be_a_local_path() {
        assert_eq!(safe_next(Some("/portal/customers/")), Some("/portal/customers/"));
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("https://evil.example/")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(None), None);
    }

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(
            login_url("/portal/customers/?page=2"),
            "/admin/login/?next=%2Fportal%2Fcustomers%2F%3Fpage%3D2"
        );
    }
}
