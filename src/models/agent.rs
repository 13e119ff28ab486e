use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A commission agent who manages orders on behalf of investors.
/// Location is free text here, unlike investors who reference the
/// city/country catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub username: String,
    pub password_hash: String,

    pub full_name: String,
    pub email: String,

    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,

    pub created_at: i64,
}
