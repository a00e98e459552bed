//! HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::WebConfig;
use crate::{DriveError, Result};

use super::handlers::AppState;
use super::middleware::RateLimitState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    cors_origins: Vec<String>,
    max_upload_bytes: usize,
}

impl WebServer {
    /// Create a server bound to `config.host:config.port` once run.
    pub fn new(config: &WebConfig, app_state: AppState, max_upload_bytes: usize) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                DriveError::Config(format!(
                    "invalid web address {}:{}: {e}",
                    config.host, config.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            rate_limit: Arc::new(RateLimitState::new(config.login_rate_limit)),
            cors_origins: config.cors_origins.clone(),
            max_upload_bytes,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn into_router(self) -> (Router, Arc<RateLimitState>) {
        let rate_limit = self.rate_limit.clone();
        let router = create_router(
            self.app_state,
            self.rate_limit,
            &self.cors_origins,
            self.max_upload_bytes,
        )
        .merge(create_health_router());
        (router, rate_limit)
    }

    async fn bind(self) -> Result<(TcpListener, Router)> {
        let listener = TcpListener::bind(self.addr).await?;
        let (router, rate_limit) = self.into_router();

        rate_limit.start_cleanup_task();
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        Ok((listener, router))
    }

    /// Run the server until it fails.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }

    /// Serve in the background and return the bound address.
    ///
    /// Binding to port 0 picks a free port.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
