//! Shared reference data. Countries own their cities: removing a country
//! removes its cities in the same transaction. The city-to-country
//! direction is an id lookup, never a held reference.

use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::ClientSession;

use crate::{
    error::{Result, ServiceError},
    models::{City, Country},
    AppState,
};

pub async fn find_city_by_name(state: &AppState, name: &str) -> Result<Option<City>> {
    let cities = state.db.collection::<City>("cities");
    Ok(cities.find_one(doc! { "name": name }, None).await?)
}

pub async fn find_city(state: &AppState, id: ObjectId) -> Result<Option<City>> {
    let cities = state.db.collection::<City>("cities");
    Ok(cities.find_one(doc! { "_id": id }, None).await?)
}

pub async fn find_country(state: &AppState, id: ObjectId) -> Result<Option<Country>> {
    let countries = state.db.collection::<Country>("countries");
    Ok(countries.find_one(doc! { "_id": id }, None).await?)
}

pub async fn country_of_city(state: &AppState, city: &City) -> Result<Option<Country>> {
    find_country(state, city.country_id).await
}

pub async fn list_countries(state: &AppState) -> Result<Vec<Country>> {
    let countries = state.db.collection::<Country>("countries");
    let find_opts = FindOptions::builder().sort(doc! { "name": 1 }).build();

    let mut cursor = countries.find(None, find_opts).await?;

    let mut out: Vec<Country> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res?);
    }
    Ok(out)
}

pub async fn list_cities_of_country(state: &AppState, country_id: ObjectId) -> Result<Vec<City>> {
    let cities = state.db.collection::<City>("cities");
    let find_opts = FindOptions::builder().sort(doc! { "name": 1 }).build();

    let mut cursor = cities
        .find(doc! { "country_id": country_id }, find_opts)
        .await?;

    let mut out: Vec<City> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res?);
    }
    Ok(out)
}

/// Deletes a country and, because the country owns them, all of its cities.
pub async fn delete_country(state: &AppState, name: &str) -> Result<()> {
    let countries = state.db.collection::<Country>("countries");
    let country = countries
        .find_one(doc! { "name": name }, None)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let mut session = state.client.start_session(None).await?;
    session.start_transaction(None).await?;

    match cascade_delete(state, &mut session, country.id).await {
        Ok(()) => {
            session.commit_transaction().await?;
            Ok(())
        }
        Err(e) => {
            let _ = session.abort_transaction().await;
            Err(e)
        }
    }
}

async fn cascade_delete(
    state: &AppState,
    session: &mut ClientSession,
    country_id: ObjectId,
) -> Result<()> {
    let cities = state.db.collection::<City>("cities");
    cities
        .delete_many_with_session(doc! { "country_id": country_id }, None, session)
        .await?;

    let countries = state.db.collection::<Country>("countries");
    countries
        .delete_one_with_session(doc! { "_id": country_id }, None, session)
        .await?;

    Ok(())
}
