use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expires_in: i64,
    pub port: u16,
    /// Reject reservations that fall outside every available schedule of the workspace.
    pub enforce_schedule_window: bool,
    /// Admin account created at startup when it does not exist yet.
    pub admin_seed: Option<AdminSeed>,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expires_in: env::var("JWT_EXPIRES_IN")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .context("JWT_EXPIRES_IN must be a number of seconds")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid port")?,
            enforce_schedule_window: env::var("ENFORCE_SCHEDULE_WINDOW")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            admin_seed: admin_seed(
                env::var("ADMIN_EMAIL").ok(),
                env::var("ADMIN_PASSWORD").ok(),
                env::var("ADMIN_NAME").ok(),
            ),
        })
    }
}

/// Both email and password are needed to seed an admin.
fn admin_seed(
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
) -> Option<AdminSeed> {
    match (email, password) {
        (Some(email), Some(password)) if !email.trim().is_empty() => Some(AdminSeed {
            name: name.unwrap_or_else(|| "Administrator".to_string()),
            email: email.trim().to_lowercase(),
            password,
        }),
        _ => None,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
