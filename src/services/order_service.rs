use std::collections::HashMap;

use futures_util::StreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;
use serde::Serialize;

use crate::{
    error::{Result, ServiceError},
    models::Order,
    AppState,
};

use super::user_store;

#[derive(Debug, Clone, Serialize)]
pub struct OrderHistoryEntry {
    // calendar day of the order, time of day discarded
    pub date: String,
    pub order_value: f64,
}

/// Status strings are free text written by the order workflow, so they are
/// folded to one bucket per trimmed, lowercased value ("Pendiente" and
/// "pendiente " count together).
pub fn normalize_status(status: &str) -> String {
    status.trim().to_lowercase()
}

fn bucket_statuses<'a, I>(statuses: I) -> HashMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for s in statuses {
        *counts.entry(normalize_status(s)).or_insert(0) += 1;
    }
    counts
}

fn day_of(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

async fn load_orders(state: &AppState, filter: Document, sorted: bool) -> Result<Vec<Order>> {
    let orders = state.db.collection::<Order>("orders");
    let find_opts = if sorted {
        Some(FindOptions::builder().sort(doc! { "created_at": 1 }).build())
    } else {
        None
    };

    let mut cursor = orders.find(filter, find_opts).await?;

    let mut out: Vec<Order> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res?);
    }
    Ok(out)
}

fn to_history(orders: Vec<Order>) -> Vec<OrderHistoryEntry> {
    orders
        .into_iter()
        .map(|o| OrderHistoryEntry {
            date: day_of(o.created_at),
            order_value: o.order_value,
        })
        .collect()
}

/// Orders of one investor grouped by normalized status.
pub async fn count_by_status(state: &AppState, username: &str) -> Result<HashMap<String, u64>> {
    let investor = user_store::find_investor_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let orders = load_orders(state, doc! { "investor_id": investor.id }, false).await?;
    Ok(bucket_statuses(orders.iter().map(|o| o.status.as_str())))
}

/// Day-by-day order values for one investor, oldest first.
pub async fn order_history(state: &AppState, username: &str) -> Result<Vec<OrderHistoryEntry>> {
    let investor = user_store::find_investor_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let orders = load_orders(state, doc! { "investor_id": investor.id }, true).await?;
    Ok(to_history(orders))
}

/// Same aggregation keyed by the managing agent.
pub async fn count_by_status_for_agent(
    state: &AppState,
    username: &str,
) -> Result<HashMap<String, u64>> {
    let agent = user_store::find_agent_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let orders = load_orders(state, doc! { "agent_id": agent.id }, false).await?;
    Ok(bucket_statuses(orders.iter().map(|o| o.status.as_str())))
}

pub async fn order_history_for_agent(
    state: &AppState,
    username: &str,
) -> Result<Vec<OrderHistoryEntry>> {
    let agent = user_store::find_agent_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let orders = load_orders(state, doc! { "agent_id": agent.id }, true).await?;
    Ok(to_history(orders))
}
