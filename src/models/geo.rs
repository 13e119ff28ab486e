use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Shared reference data. A country owns its cities for lifecycle purposes
/// (deleting a country removes them); the city points back with an id, not
/// a live reference, so there is no object cycle to serialize around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    pub country_id: ObjectId,

    #[serde(default)]
    pub economic_situation: Option<String>,
}
