use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use regex::Regex;
use serde::Serialize;

use crate::{
    error::{Result, ServiceError},
    models::Investor,
    AppState,
};

use super::{geo_service, ledger_service, passwords, user_store};

#[derive(Debug, Clone)]
pub struct RegisterInvestor {
    pub first_name: String,
    pub last_name: String,
    pub document_id: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    // resolved against the city catalogue by exact name
    pub city: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestorProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub document_id: String,
    pub email: String,
    pub phone: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub balance: f64,
    pub commission_pct: f64,
}

fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    re.is_match(email)
}

fn validate_draft(draft: &RegisterInvestor) -> Result<()> {
    let required = [
        (&draft.first_name, "first name"),
        (&draft.last_name, "last name"),
        (&draft.document_id, "document id"),
        (&draft.email, "email"),
        (&draft.phone, "phone"),
        (&draft.username, "username"),
        (&draft.city, "city"),
    ];
    for (value, label) in required {
        if value.trim().is_empty() {
            return Err(ServiceError::Validation(format!("{label} is required")));
        }
    }

    if !is_valid_email(draft.email.trim()) {
        return Err(ServiceError::validation("invalid email address"));
    }

    if draft.password.len() < 6 {
        return Err(ServiceError::validation(
            "password must be at least 6 characters",
        ));
    }

    Ok(())
}

/// Registers a new investor: resolve the city, derive its country, reject
/// duplicates, hash the password, insert. The insert is the only write, so
/// registration is all-or-nothing; the unique indexes on username and
/// document id are the final authority when two registrations race past the
/// pre-checks.
pub async fn register(state: &AppState, draft: &RegisterInvestor) -> Result<ObjectId> {
    validate_draft(draft)?;

    let city = geo_service::find_city_by_name(state, draft.city.trim())
        .await?
        .ok_or(ServiceError::InvalidCity)?;

    let document_id = draft.document_id.trim();
    let username = draft.username.trim();

    if user_store::exists_by_document_id(state, document_id).await?
        || user_store::exists_by_username(state, username).await?
    {
        return Err(ServiceError::Duplicate);
    }

    let now = Utc::now().timestamp();
    let investor = Investor {
        id: ObjectId::new(),
        first_name: draft.first_name.trim().to_string(),
        last_name: draft.last_name.trim().to_string(),
        document_id: document_id.to_string(),
        email: draft.email.trim().to_string(),
        phone: draft.phone.trim().to_string(),
        city_id: Some(city.id),
        country_id: Some(city.country_id),
        username: username.to_string(),
        password_hash: passwords::hash_password(&draft.password)?,
        balance: 0.0,
        commission_pct: state.settings.default_commission_pct,
        created_at: now,
        updated_at: now,
    };

    user_store::insert_investor(state, &investor).await?;
    Ok(investor.id)
}

pub async fn get_profile(state: &AppState, username: &str) -> Result<InvestorProfile> {
    let investor = user_store::find_investor_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let city = match investor.city_id {
        Some(id) => geo_service::find_city(state, id).await?,
        None => None,
    };
    let country = match investor.country_id {
        Some(id) => geo_service::find_country(state, id).await?,
        None => None,
    };

    Ok(InvestorProfile {
        username: investor.username,
        first_name: investor.first_name,
        last_name: investor.last_name,
        document_id: investor.document_id,
        email: investor.email,
        phone: investor.phone,
        city: city.map(|c| c.name),
        country: country.map(|c| c.name),
        balance: investor.balance,
        commission_pct: investor.commission_pct,
    })
}

/// Username and phone are the only contact fields an investor may change;
/// the document id is immutable after registration.
pub async fn update_contact(
    state: &AppState,
    username: &str,
    new_username: &str,
    new_phone: &str,
) -> Result<()> {
    let new_username = new_username.trim();
    let new_phone = new_phone.trim();
    if new_username.is_empty() {
        return Err(ServiceError::validation("username is required"));
    }
    if new_phone.is_empty() {
        return Err(ServiceError::validation("phone is required"));
    }

    let investors = state.db.collection::<Investor>("investors");
    let res = investors
        .update_one(
            doc! { "username": username },
            doc! { "$set": {
                "username": new_username,
                "phone": new_phone,
                "updated_at": Utc::now().timestamp(),
            } },
            None,
        )
        .await?;

    if res.matched_count == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

pub async fn change_password(state: &AppState, username: &str, new_password: &str) -> Result<()> {
    if new_password.len() < 6 {
        return Err(ServiceError::validation(
            "password must be at least 6 characters",
        ));
    }

    let digest = passwords::hash_password(new_password)?;

    let investors = state.db.collection::<Investor>("investors");
    let res = investors
        .update_one(
            doc! { "username": username },
            doc! { "$set": {
                "password_hash": digest,
                "updated_at": Utc::now().timestamp(),
            } },
            None,
        )
        .await?;

    if res.matched_count == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

/// Cash top-up (or correction) entered from the investor's profile; booked
/// through the ledger so a movement records it. Returns the new balance.
pub async fn update_balance(state: &AppState, username: &str, delta: f64) -> Result<f64> {
    ledger_service::record_adjustment(state, username, "deposito", delta).await
}
