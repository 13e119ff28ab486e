use andinatrading::config::Settings;
use andinatrading::error::ServiceError;
use andinatrading::models::{Identity, Role};
use andinatrading::services::auth_service::{self, Session};

fn test_settings() -> Settings {
    Settings {
        mongodb_uri: "mongodb://localhost:27017".to_string(),
        mongodb_db: "andinatrading_test".to_string(),
        quote_base_url: "http://127.0.0.1:9".to_string(),
        token_secret: "test-secret".to_string(),
        token_ttl_days: 7,
        default_commission_pct: 5.0,
    }
}

fn ana() -> Identity {
    Identity {
        username: "ana".to_string(),
        role: Role::Investor,
    }
}

#[test]
fn token_round_trip_preserves_identity() {
    let settings = test_settings();

    let token = auth_service::issue_token(&settings, &ana()).unwrap();
    let identity = auth_service::decode_token(&settings, &token).unwrap();

    assert_eq!(identity.username, "ana");
    assert_eq!(identity.role, Role::Investor);
}

#[test]
fn token_round_trip_preserves_agent_role() {
    let settings = test_settings();
    let agent = Identity {
        username: "carlos".to_string(),
        role: Role::Agent,
    };

    let token = auth_service::issue_token(&settings, &agent).unwrap();
    let identity = auth_service::decode_token(&settings, &token).unwrap();

    assert_eq!(identity.role, Role::Agent);
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let settings = test_settings();
    let mut other = test_settings();
    other.token_secret = "another-secret".to_string();

    let token = auth_service::issue_token(&other, &ana()).unwrap();

    assert!(matches!(
        auth_service::decode_token(&settings, &token),
        Err(ServiceError::InvalidCredentials)
    ));
}

#[test]
fn expired_token_is_rejected() {
    let mut settings = test_settings();
    settings.token_ttl_days = -1;

    let token = auth_service::issue_token(&settings, &ana()).unwrap();

    assert!(matches!(
        auth_service::decode_token(&settings, &token),
        Err(ServiceError::InvalidCredentials)
    ));
}

#[test]
fn garbage_token_is_rejected() {
    let settings = test_settings();

    assert!(matches!(
        auth_service::decode_token(&settings, "not-a-token"),
        Err(ServiceError::InvalidCredentials)
    ));
}

#[test]
fn logout_is_idempotent() {
    let mut session = Session::anonymous();
    assert!(!session.is_authenticated());

    session.logout();
    assert!(!session.is_authenticated());

    // a second logout is a no-op, not an error
    session.logout();
    assert!(!session.is_authenticated());
    assert!(session.identity().is_none());
}
