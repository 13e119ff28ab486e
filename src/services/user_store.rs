//! Lookup and persistence for the two account kinds. Uniqueness of
//! usernames and document ids is enforced by the indexes `db_init` creates,
//! so a save that loses a race comes back as `ServiceError::Duplicate`
//! rather than silently double-registering.

use mongodb::bson::doc;

use crate::{
    error::Result,
    models::{Agent, Investor},
    AppState,
};

pub async fn find_investor_by_username(state: &AppState, username: &str) -> Result<Option<Investor>> {
    let investors = state.db.collection::<Investor>("investors");
    Ok(investors.find_one(doc! { "username": username }, None).await?)
}

pub async fn find_agent_by_username(state: &AppState, username: &str) -> Result<Option<Agent>> {
    let agents = state.db.collection::<Agent>("agents");
    Ok(agents.find_one(doc! { "username": username }, None).await?)
}

pub async fn exists_by_username(state: &AppState, username: &str) -> Result<bool> {
    Ok(find_investor_by_username(state, username).await?.is_some())
}

pub async fn exists_by_document_id(state: &AppState, document_id: &str) -> Result<bool> {
    let investors = state.db.collection::<Investor>("investors");
    Ok(investors
        .find_one(doc! { "document_id": document_id }, None)
        .await?
        .is_some())
}

pub async fn insert_investor(state: &AppState, investor: &Investor) -> Result<()> {
    let investors = state.db.collection::<Investor>("investors");
    investors.insert_one(investor, None).await?;
    Ok(())
}

pub async fn insert_agent(state: &AppState, agent: &Agent) -> Result<()> {
    let agents = state.db.collection::<Agent>("agents");
    agents.insert_one(agent, None).await?;
    Ok(())
}

/// Batch removal by username. Only agents support this; investors are never
/// hard-deleted.
pub async fn delete_agents_by_usernames(state: &AppState, usernames: &[String]) -> Result<u64> {
    if usernames.is_empty() {
        return Ok(0);
    }

    let agents = state.db.collection::<Agent>("agents");
    let res = agents
        .delete_many(doc! { "username": { "$in": usernames } }, None)
        .await?;
    Ok(res.deleted_count)
}
