use std::net::{Ipv4Addr, SocketAddr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8000;

/// Settings read from the environment once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Server URL without a database path, e.g. `postgres://user:pw@localhost:5432`
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            database_url: non_empty("DATABASE_URL"),
            database_name: non_empty("DATABASE_NAME"),
            port,
        }
    }

    /// The full connection URL, or `None` when either half is missing.
    pub fn connection_url(&self) -> Option<String> {
        let url = self.database_url.as_deref()?;
        let name = self.database_name.as_deref()?;
        Some(format!("{}/{}", url.trim_end_matches('/'), name))
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
