use std::env;

use anyhow::{Context, Result};
use url::Url;

use crate::db::DEFAULT_MAX_POOL_SIZE;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_COMPANY_NAME: &str = "BR";
pub const JSON_BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Identity printed in the header and footer of generated documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub org_number: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_pool_size: u32,
    pub server_host: String,
    pub server_port: u16,
    /// Shared secret for admin routes. Empty means every admin request is rejected.
    pub admin_api_key: String,
    pub company: CompanyProfile,
    pub cors_allowed_origin: Option<String>,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_pool_size = env::var("DATABASE_MAX_POOL_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_POOL_SIZE);
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = match env::var("PORT") {
            Ok(value) => value.parse().context("PORT must be a valid u16")?,
            Err(_) => DEFAULT_PORT,
        };
        let admin_api_key = env::var("ADMIN_API_KEY").unwrap_or_default();
        let company = CompanyProfile {
            name: env::var("COMPANY_NAME").unwrap_or_else(|_| DEFAULT_COMPANY_NAME.to_string()),
            address: env::var("COMPANY_ADDRESS").unwrap_or_default(),
            org_number: env::var("COMPANY_ORGNR").unwrap_or_default(),
        };
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN").ok();
        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            database_url,
            database_max_pool_size,
            server_host,
            server_port,
            admin_api_key,
            company,
            cors_allowed_origin,
            seed_demo_data,
        })
    }

    pub fn redacted_database_url(&self) -> String {
        redact_database_url(&self.database_url)
    }

    pub fn admin_routes_enabled(&self) -> bool {
        !self.admin_api_key.is_empty()
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

fn redact_database_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("*****"));
            }
            parsed.to_string()
        }
        Err(_) => "***".to_string(),
    }
}
