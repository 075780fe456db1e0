use std::env;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    /// Yearly social security / tax bracket / allowance tables (JSON).
    pub rate_tables_path: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} is not a valid number: {raw}")),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_addr: required("SERVER_ADDR"),
            database_url: required("DATABASE_URL"),
            jwt_secret: required("JWT_SECRET"),

            access_token_ttl: parsed("ACCESS_TOKEN_TTL", 900), // 15 min
            refresh_token_ttl: parsed("REFRESH_TOKEN_TTL", 604_800), // 7 days

            rate_tables_path: or_default("RATE_TABLES_PATH", "config/tables_2025.json"),

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", 60),
            rate_register_per_min: parsed("RATE_REGISTER_PER_MIN", 30),
            rate_refresh_per_min: parsed("RATE_REFRESH_PER_MIN", 30),
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", 1000),

            api_prefix: or_default("API_PREFIX", "/api/v1"),
        }
    }
}
