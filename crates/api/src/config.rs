//! Process configuration, read from the environment.

use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
}

impl ApiConfig {
    pub fn new(bind_addr: SocketAddr, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// `BIND_ADDR` (default `0.0.0.0:8080`) and `JWT_SECRET`.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_addr}"))?;

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        Ok(Self::new(bind_addr, jwt_secret))
    }
}
