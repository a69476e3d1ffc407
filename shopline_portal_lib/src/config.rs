//! Portal configuration read from the process environment.
//!
//! The binary loads `.env` with `dotenvy` before calling
//! [`PortalConfig::from_env`], so values may come from either place.

use std::net::SocketAddr;
use std::time::Duration;

use shopline_api::{ClientConfig, DEFAULT_BASE_URL};

use crate::auth::StaffAccounts;
use crate::error::PortalError;

pub const ACCESS_TOKEN_VAR: &str = "SHOPLINE_ACCESS_TOKEN";
pub const BASE_URL_VAR: &str = "SHOPLINE_API_BASE_URL";
pub const BIND_ADDR_VAR: &str = "PORTAL_BIND_ADDR";
pub const STAFF_USERS_VAR: &str = "PORTAL_STAFF_USERS";
pub const SESSION_TTL_VAR: &str = "PORTAL_SESSION_TTL_SECS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
/// Two weeks, matching the usual admin session age.
const DEFAULT_SESSION_TTL_SECS: u64 = 1_209_600;
/// Ten years.
const MAX_SESSION_TTL_SECS: u64 = 315_360_000;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Empty when unset. The portal still starts and shows a configuration page.
    pub access_token: String,
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    pub staff: StaffAccounts,
    pub session_ttl: Duration,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, PortalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PortalError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ACCESS_TOKEN_VAR).unwrap_or_default();
        if access_token.is_empty() {
            tracing::warn!("{} is not set; customer pages will show a configuration notice", ACCESS_TOKEN_VAR);
        }

        let api_base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&api_base_url).map_err(|e| PortalError::InvalidConfig {
            key: BASE_URL_VAR.to_string(),
            message: e.to_string(),
        })?;

        let bind_addr = parse_var(&lookup, BIND_ADDR_VAR, DEFAULT_BIND_ADDR)?;
        let ttl_secs: u64 = parse_var(&lookup, SESSION_TTL_VAR, &DEFAULT_SESSION_TTL_SECS.to_string())?;
        if !(1..=MAX_SESSION_TTL_SECS).contains(&ttl_secs) {
            return Err(PortalError::InvalidConfig {
                key: SESSION_TTL_VAR.to_string(),
                message: format!("must be between 1 and {} seconds", MAX_SESSION_TTL_SECS),
            });
        }

        let staff = StaffAccounts::parse(&lookup(STAFF_USERS_VAR).unwrap_or_default());
        if staff.is_empty() {
            tracing::warn!("{} is empty; nobody can sign in", STAFF_USERS_VAR);
        }

        Ok(Self {
            access_token,
            api_base_url,
            bind_addr,
            staff,
            session_ttl: Duration::from_secs(ttl_secs),
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.access_token, &self.api_base_url)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, PortalError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        tracing::debug!("{} not set, using default: {}", key, default);
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| PortalError::InvalidConfig {
        key: key.to_string(),
        message: e.to_string(),
    })
}
