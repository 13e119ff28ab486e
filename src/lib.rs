//! Library entrypoint for the AndinaTrading back-office.
//!
//! This file exists mainly to make service tests easy (integration tests
//! under `tests/` can import the app state, models and services). The
//! request-dispatch layer lives outside this crate and calls into
//! `services::*` with an explicit identity.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    // Keep the client around, not just the database: ledger and contract
    // writes open client sessions for multi-document transactions.
    pub client: mongodb::Client,
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub quotes: services::quotes::QuoteClient,
}

impl AppState {
    pub async fn connect(settings: config::Settings) -> error::Result<Self> {
        let client = mongodb::Client::with_uri_str(&settings.mongodb_uri).await?;
        let db = client.database(&settings.mongodb_db);
        let quotes = services::quotes::QuoteClient::new(settings.quote_base_url.clone());

        Ok(AppState {
            client,
            db,
            settings,
            quotes,
        })
    }
}
