//! Input validation happens before any store or quote-source round trip, so
//! these tests run against an app state whose Mongo client never actually
//! connects.

use andinatrading::config::Settings;
use andinatrading::error::ServiceError;
use andinatrading::services::{agent_service, contract_service, investor_service, ledger_service};
use andinatrading::AppState;

async fn test_state() -> AppState {
    let settings = Settings {
        mongodb_uri: "mongodb://localhost:27017".to_string(),
        mongodb_db: "andinatrading_test".to_string(),
        quote_base_url: "http://127.0.0.1:9".to_string(),
        token_secret: "test-secret".to_string(),
        token_ttl_days: 7,
        default_commission_pct: 5.0,
    };

    AppState::connect(settings).await.expect("mongodb client")
}

#[tokio::test]
async fn purchase_rejects_zero_quantity() {
    let state = test_state().await;

    let res = ledger_service::record_purchase(&state, "ana", "ACME", 0).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn purchase_rejects_negative_quantity() {
    let state = test_state().await;

    let res = ledger_service::record_purchase(&state, "ana", "ACME", -3).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn purchase_rejects_blank_symbol() {
    let state = test_state().await;

    let res = ledger_service::record_purchase(&state, "ana", "   ", 5).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn sale_rejects_zero_quantity() {
    let state = test_state().await;

    let res = ledger_service::record_sale(&state, "ana", "ACME", 0).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn adjustment_rejects_blank_reference() {
    let state = test_state().await;

    let res = ledger_service::record_adjustment(&state, "ana", "  ", 10.0).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn contract_rejects_negative_percent() {
    let state = test_state().await;

    let res = contract_service::upsert_contract(&state, "ana", -1.0, 12).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn contract_rejects_zero_duration() {
    let state = test_state().await;

    let res = contract_service::upsert_contract(&state, "ana", 5.0, 0).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn registration_rejects_blank_username() {
    let state = test_state().await;

    let draft = investor_service::RegisterInvestor {
        first_name: "Ana".into(),
        last_name: "Mora".into(),
        document_id: "CC-1001".into(),
        email: "ana@example.com".into(),
        phone: "3001234567".into(),
        username: "  ".into(),
        password: "secret1".into(),
        city: "Bogotá".into(),
    };

    let res = investor_service::register(&state, &draft).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn registration_rejects_short_password() {
    let state = test_state().await;

    let draft = investor_service::RegisterInvestor {
        first_name: "Ana".into(),
        last_name: "Mora".into(),
        document_id: "CC-1001".into(),
        email: "ana@example.com".into(),
        phone: "3001234567".into(),
        username: "ana".into(),
        password: "abc".into(),
        city: "Bogotá".into(),
    };

    let res = investor_service::register(&state, &draft).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn contact_update_rejects_blank_phone() {
    let state = test_state().await;

    let res = investor_service::update_contact(&state, "ana", "ana2", "  ").await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn password_change_rejects_short_password() {
    let state = test_state().await;

    let res = investor_service::change_password(&state, "ana", "abc").await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn agent_creation_rejects_blank_username() {
    let state = test_state().await;

    let draft = agent_service::RegisterAgent {
        username: "".into(),
        password: "secret1".into(),
        full_name: "Carlos Pinzón".into(),
        email: "carlos@example.com".into(),
        city: None,
        country: None,
    };

    let res = agent_service::create_agent(&state, &draft).await;
    assert!(matches!(res, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn deleting_no_agents_is_a_no_op() {
    let state = test_state().await;

    let deleted = agent_service::delete_agents(&state, &[]).await.unwrap();
    assert_eq!(deleted, 0);
}
