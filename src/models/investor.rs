use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An investor account: personal data, credentials, cash balance and the
/// commission rate applied to their orders. The commission percent lives
/// here; the contract document only carries the agreed duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investor {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub first_name: String,
    pub last_name: String,

    // immutable after registration, unique
    pub document_id: String,

    pub email: String,
    pub phone: String,

    #[serde(default)]
    pub city_id: Option<ObjectId>,
    #[serde(default)]
    pub country_id: Option<ObjectId>,

    pub username: String,
    pub password_hash: String,

    pub balance: f64,
    pub commission_pct: f64,

    pub created_at: i64,
    pub updated_at: i64,
}
