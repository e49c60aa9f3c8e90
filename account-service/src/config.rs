use anyhow::{Context, Result};
use std::env;
use tracing::warn;

/// Insecure fallback so local development works without a .env file.
/// Production deployments must set JWT_SECRET; the startup warning makes
/// the fallback loud.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production";

const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

pub fn load_config() -> Result<ServiceConfig> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let jwt_secret = match env::var("JWT_SECRET") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            warn!("JWT_SECRET not set; falling back to the insecure development secret");
            DEV_JWT_SECRET.to_string()
        }
    };

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT")
        .ok()
        .map(|value| value.parse::<u16>().context("Failed to parse PORT"))
        .transpose()?
        .unwrap_or(DEFAULT_PORT);

    let cors_origins = env::var("CORS_ALLOW_ORIGINS")
        .ok()
        .map(|value| parse_origins(&value))
        .unwrap_or_else(default_origins);

    Ok(ServiceConfig {
        database_url,
        jwt_secret,
        host,
        port,
        cors_origins,
    })
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|item| {
            let origin = item.trim();
            if origin.is_empty() {
                None
            } else {
                Some(origin.to_string())
            }
        })
        .collect()
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}
