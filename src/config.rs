use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,

    pub quote_base_url: String,

    pub token_secret: String,
    pub token_ttl_days: i64,

    pub default_commission_pct: f64,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "andinatrading".to_string());

    let quote_base_url = env::var("QUOTE_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());

    let token_secret = env::var("TOKEN_SECRET").unwrap_or_else(|_| "change-me-dev-secret".to_string());

    let token_ttl_days = env::var("TOKEN_TTL_DAYS")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(7);

    let default_commission_pct = env::var("DEFAULT_COMMISSION_PCT")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(5.0);

    Settings {
        mongodb_uri,
        mongodb_db,
        quote_base_url,
        token_secret,
        token_ttl_days,
        default_commission_pct,
    }
}
