use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A buy/sell instruction placed by an investor through an agent.
///
/// This crate only reads orders for reporting. Placement, approval,
/// execution and rejection (and the timestamps below) are written by the
/// order-workflow collaborator; `status` is free text on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub investor_id: ObjectId,
    pub agent_id: ObjectId,
    pub company_id: ObjectId,

    pub status: String,

    pub shares: i64,

    // BUY | SELL
    pub order_type: String,

    pub order_value: f64,
    pub commission_value: f64,

    pub created_at: i64,

    #[serde(default)]
    pub approved_at: Option<i64>,
    #[serde(default)]
    pub executed_at: Option<i64>,
    #[serde(default)]
    pub rejected_at: Option<i64>,
}
