use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::{
    error::{Result, ServiceError},
    models::Agent,
    AppState,
};

use super::{passwords, user_store};

#[derive(Debug, Clone)]
pub struct RegisterAgent {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentProfile {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

fn validate_draft(draft: &RegisterAgent) -> Result<()> {
    if draft.username.trim().is_empty() {
        return Err(ServiceError::validation("username is required"));
    }
    if draft.full_name.trim().is_empty() {
        return Err(ServiceError::validation("full name is required"));
    }
    if draft.password.trim().is_empty() {
        return Err(ServiceError::validation("password is required"));
    }
    Ok(())
}

pub async fn create_agent(state: &AppState, draft: &RegisterAgent) -> Result<ObjectId> {
    validate_draft(draft)?;

    let agent = Agent {
        id: ObjectId::new(),
        username: draft.username.trim().to_string(),
        password_hash: passwords::hash_password(&draft.password)?,
        full_name: draft.full_name.trim().to_string(),
        email: draft.email.trim().to_string(),
        city: draft.city.clone(),
        country: draft.country.clone(),
        created_at: Utc::now().timestamp(),
    };

    // unique index on username turns a lost race into Duplicate
    user_store::insert_agent(state, &agent).await?;
    Ok(agent.id)
}

pub async fn get_profile(state: &AppState, username: &str) -> Result<AgentProfile> {
    let agent = user_store::find_agent_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Ok(AgentProfile {
        username: agent.username,
        full_name: agent.full_name,
        email: agent.email,
        city: agent.city,
        country: agent.country,
    })
}

/// Removes the listed agent accounts in one batch; missing usernames are
/// skipped. Returns how many accounts were deleted.
pub async fn delete_agents(state: &AppState, usernames: &[String]) -> Result<u64> {
    user_store::delete_agents_by_usernames(state, usernames).await
}
