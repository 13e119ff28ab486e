use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

#[derive(Clone)]
pub struct QuoteClient {
    http: Client,
    base_url: String,
}

impl QuoteClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Fetches the current market price for a symbol. Every transport,
    /// status or parse failure collapses into `QuoteUnavailable`.
    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        let url = format!("{}/precio/{}", self.base_url.trim_end_matches('/'), symbol);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::QuoteUnavailable(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ServiceError::QuoteUnavailable(format!(
                "quote request failed: {status} {body}"
            )));
        }

        res.json::<Quote>()
            .await
            .map_err(|e| ServiceError::QuoteUnavailable(e.to_string()))
    }
}

/// Wire format of the price feed; field names on the wire are the feed's.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Quote {
    pub symbol: String,

    #[serde(rename = "precio_actual")]
    pub current: f64,

    #[serde(rename = "alto_del_dia")]
    pub day_high: f64,

    #[serde(rename = "bajo_del_dia")]
    pub day_low: f64,

    #[serde(rename = "apertura")]
    pub open: f64,

    #[serde(rename = "precio_previo")]
    pub previous_close: f64,

    #[serde(rename = "fuente")]
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_parses_feed_payload() {
        let body = r#"{
            "symbol": "ACME",
            "precio_actual": 5.0,
            "alto_del_dia": 5.4,
            "bajo_del_dia": 4.8,
            "apertura": 4.9,
            "precio_previo": 4.95,
            "fuente": "simulador"
        }"#;

        let q: Quote = serde_json::from_str(body).unwrap();
        assert_eq!(q.symbol, "ACME");
        assert_eq!(q.current, 5.0);
        assert_eq!(q.previous_close, 4.95);
        assert_eq!(q.source, "simulador");
    }

    #[test]
    fn quote_rejects_missing_price() {
        let body = r#"{ "symbol": "ACME", "fuente": "simulador" }"#;
        assert!(serde_json::from_str::<Quote>(body).is_err());
    }
}
