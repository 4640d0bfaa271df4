use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const PLACEHOLDER_SECRET: &str = "dev-secret-change-me";

/// Credentials for the admin account ensured at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub jwt_secret: String,
    pub admin: Option<AdminSeed>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = get("STACKIT_DB_PATH").unwrap_or_else(|| "stackit.db".into());
        let host = get("STACKIT_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("STACKIT_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("STACKIT_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let jwt_secret = get("STACKIT_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_SECRET.into());

        let admin = match (get("STACKIT_ADMIN_USERNAME"), get("STACKIT_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminSeed { username, password })
            }
            _ => None,
        };

        Ok(Self {
            db_path: db_path.into(),
            addr,
            jwt_secret,
            admin,
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret == PLACEHOLDER_SECRET
    }
}
