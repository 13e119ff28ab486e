use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Commission agreement, at most one per investor (unique index on
/// `investor_id`). Created lazily the first time the investor edits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub investor_id: ObjectId,

    pub duration_months: i32,

    pub updated_at: i64,
}
