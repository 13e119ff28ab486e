use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::Settings,
    error::{Result, ServiceError},
    models::{Identity, Role},
    AppState,
};

use super::{passwords, user_store};

// Verified when the username does not exist, so the unknown-user and
// wrong-password paths pay the same hashing cost and return the same error.
const ABSENT_USER_DIGEST: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    // username
    pub sub: String,
    pub role: Role,
    // expiry (unix timestamp seconds)
    pub exp: usize,
}

/// Validates credentials against the stored digest. Unknown user and wrong
/// password are deliberately indistinguishable to the caller.
pub async fn login(state: &AppState, role: Role, username: &str, password: &str) -> Result<Identity> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ServiceError::InvalidCredentials);
    }

    let stored = match role {
        Role::Investor => user_store::find_investor_by_username(state, username)
            .await?
            .map(|i| i.password_hash),
        Role::Agent => user_store::find_agent_by_username(state, username)
            .await?
            .map(|a| a.password_hash),
    };

    let ok = match &stored {
        Some(digest) => passwords::verify_password(password, digest),
        None => {
            let _ = passwords::verify_password(password, ABSENT_USER_DIGEST);
            false
        }
    };

    if !ok {
        return Err(ServiceError::InvalidCredentials);
    }

    Ok(Identity {
        username: username.to_string(),
        role,
    })
}

/// Two-state authentication flow: Anonymous until a login succeeds,
/// Anonymous again after logout. A failed login leaves the state untouched.
#[derive(Debug, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session { identity: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub async fn login(
        &mut self,
        state: &AppState,
        role: Role,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let identity = login(state, role, username, password).await?;
        self.identity = Some(identity);
        Ok(())
    }

    /// Idempotent: logging out of an anonymous session is a no-op.
    pub fn logout(&mut self) {
        self.identity = None;
    }
}

/// Signed HS256 token the external dispatch layer carries between requests.
pub fn issue_token(settings: &Settings, identity: &Identity) -> Result<String> {
    let exp = (Utc::now() + Duration::days(settings.token_ttl_days)).timestamp() as usize;

    let claims = Claims {
        sub: identity.username.clone(),
        role: identity.role,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.token_secret.as_bytes()),
    )
    .map_err(|e| ServiceError::Store(e.to_string()))
}

/// Checks signature and expiry; anything off comes back as
/// `InvalidCredentials` with no further detail.
pub fn decode_token(settings: &Settings, token: &str) -> Result<Identity> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.token_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ServiceError::InvalidCredentials)?;

    Ok(Identity {
        username: data.claims.sub,
        role: data.claims.role,
    })
}
