use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;
use shopline_portal_lib::{app, LoginOptions, PortalConfig, PortalState};

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides PORTAL_BIND_ADDR)
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Where staff land after logging in when no next page is given
    #[arg(long, default_value = "/portal/")]
    pub login_redirect: String,
}

pub async fn run(args: &ServeArgs) -> Result<()> {
    let mut config = PortalConfig::from_env().context("failed to load portal configuration")?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let bind_addr = config.bind_addr;

    let state = PortalState::new(config)?;
    let login = LoginOptions {
        post_login_redirect: args.login_redirect.clone(),
    };

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Shopline portal listening on http://{}", bind_addr);

    axum::serve(listener, app(state, login))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shopline portal stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
