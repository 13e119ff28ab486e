use chrono::Utc;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Database, IndexModel,
};

use crate::error::Result;
use crate::models::{City, Company, Country};

/// Creates the indexes the correctness model depends on. The unique ones
/// are the authority for registration and contract uniqueness — a
/// check-then-insert without them races.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let unique = |keys| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };

    // investors: unique username and document id
    {
        let col = db.collection::<mongodb::bson::Document>("investors");
        col.create_index(unique(doc! { "username": 1 }), None).await?;
        col.create_index(unique(doc! { "document_id": 1 }), None).await?;
    }

    // agents: unique username
    {
        let col = db.collection::<mongodb::bson::Document>("agents");
        col.create_index(unique(doc! { "username": 1 }), None).await?;
    }

    // contracts: at most one per investor
    {
        let col = db.collection::<mongodb::bson::Document>("contracts");
        col.create_index(unique(doc! { "investor_id": 1 }), None).await?;
    }

    // movements: chronological listing per investor
    {
        let col = db.collection::<mongodb::bson::Document>("movements");
        let model = IndexModel::builder()
            .keys(doc! { "investor_id": 1, "created_at": 1 })
            .build();
        col.create_index(model, None).await?;
    }

    // orders: aggregation by investor and by agent
    {
        let col = db.collection::<mongodb::bson::Document>("orders");
        col.create_index(IndexModel::builder().keys(doc! { "investor_id": 1 }).build(), None)
            .await?;
        col.create_index(IndexModel::builder().keys(doc! { "agent_id": 1 }).build(), None)
            .await?;
    }

    // reference data
    {
        let col = db.collection::<mongodb::bson::Document>("countries");
        col.create_index(unique(doc! { "name": 1 }), None).await?;

        let col = db.collection::<mongodb::bson::Document>("cities");
        col.create_index(unique(doc! { "name": 1 }), None).await?;

        let col = db.collection::<mongodb::bson::Document>("companies");
        col.create_index(unique(doc! { "name": 1 }), None).await?;
        col.create_index(unique(doc! { "symbol": 1 }), None).await?;
    }

    Ok(())
}

/// Fills the country/city catalogue and the listed companies when the
/// collections are empty. Safe to run on every boot.
pub async fn seed_reference_data(db: &Database) -> Result<()> {
    seed_geo(db).await?;
    seed_companies(db).await?;
    Ok(())
}

async fn seed_geo(db: &Database) -> Result<()> {
    let countries = db.collection::<Country>("countries");
    if countries.count_documents(None, None).await? > 0 {
        return Ok(());
    }

    let colombia = Country { id: ObjectId::new(), name: "Colombia".into() };
    let peru = Country { id: ObjectId::new(), name: "Perú".into() };
    let ecuador = Country { id: ObjectId::new(), name: "Ecuador".into() };

    let cities = vec![
        City {
            id: ObjectId::new(),
            name: "Bogotá".into(),
            country_id: colombia.id,
            economic_situation: Some("Centro financiero principal del país".into()),
        },
        City {
            id: ObjectId::new(),
            name: "Medellín".into(),
            country_id: colombia.id,
            economic_situation: None,
        },
        City {
            id: ObjectId::new(),
            name: "Lima".into(),
            country_id: peru.id,
            economic_situation: None,
        },
        City {
            id: ObjectId::new(),
            name: "Quito".into(),
            country_id: ecuador.id,
            economic_situation: None,
        },
    ];

    countries.insert_many(vec![colombia, peru, ecuador], None).await?;
    db.collection::<City>("cities").insert_many(cities, None).await?;

    tracing::info!("seeded country/city catalogue");
    Ok(())
}

async fn seed_companies(db: &Database) -> Result<()> {
    let companies = db.collection::<Company>("companies");
    if companies.count_documents(None, None).await? > 0 {
        return Ok(());
    }

    let now = Utc::now().timestamp();
    let listed = [
        ("Ecopetrol", "EC"),
        ("Bancolombia", "CIB"),
        ("Grupo Aval", "AVAL"),
        ("Interconexión Eléctrica", "ISA"),
    ];

    let docs: Vec<Company> = listed
        .iter()
        .map(|(name, symbol)| Company {
            id: ObjectId::new(),
            name: (*name).into(),
            symbol: (*symbol).into(),
            description: None,
            last_price: 0.0,
            updated_at: now,
        })
        .collect();

    companies.insert_many(docs, None).await?;

    tracing::info!("seeded listed companies");
    Ok(())
}
