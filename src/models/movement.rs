use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Purchase,
    Sale,
    Adjustment,
}

/// Append-only ledger entry. Purchases and sales store the positive
/// transaction amount (the sign is implied by the kind); adjustments store
/// the signed delta as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub investor_id: ObjectId,

    pub kind: MovementKind,

    // symbol or free-text reference of the event
    pub symbol: String,

    pub amount: f64,

    pub created_at: i64,
}
