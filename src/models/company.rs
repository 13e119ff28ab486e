use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A listed company investors can place orders on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,
    pub symbol: String,

    #[serde(default)]
    pub description: Option<String>,

    pub last_price: f64,
    pub updated_at: i64,
}
