use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use andinatrading::error::ServiceError;
use andinatrading::services::quotes::QuoteClient;

// One-shot HTTP stub standing in for the price feed.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn quote_fetches_and_parses_the_feed() {
    let base = serve_once(
        "200 OK",
        r#"{"symbol":"ACME","precio_actual":5.0,"alto_del_dia":5.4,"bajo_del_dia":4.8,"apertura":4.9,"precio_previo":4.95,"fuente":"simulador"}"#,
    )
    .await;

    let client = QuoteClient::new(base);
    let quote = client.quote("ACME").await.unwrap();

    assert_eq!(quote.symbol, "ACME");
    assert_eq!(quote.current, 5.0);
    assert_eq!(quote.day_high, 5.4);
    assert_eq!(quote.source, "simulador");
}

#[tokio::test]
async fn quote_unavailable_on_server_error() {
    let base = serve_once("500 Internal Server Error", "{}").await;

    let client = QuoteClient::new(base);
    let res = client.quote("ACME").await;

    assert!(matches!(res, Err(ServiceError::QuoteUnavailable(_))));
}

#[tokio::test]
async fn quote_unavailable_on_malformed_payload() {
    let base = serve_once("200 OK", "not-json").await;

    let client = QuoteClient::new(base);
    let res = client.quote("ACME").await;

    assert!(matches!(res, Err(ServiceError::QuoteUnavailable(_))));
}

#[tokio::test]
async fn quote_unavailable_when_feed_is_down() {
    // nothing listens on this port
    let client = QuoteClient::new("http://127.0.0.1:9".to_string());
    let res = client.quote("ACME").await;

    assert!(matches!(res, Err(ServiceError::QuoteUnavailable(_))));
}
