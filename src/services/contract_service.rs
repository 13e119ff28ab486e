use chrono::Utc;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;
use mongodb::ClientSession;
use serde::Serialize;

use crate::{
    error::{Result, ServiceError},
    models::{Contract, Investor},
    AppState,
};

use super::user_store;

/// Combined read model: the investor record owns the commission percent,
/// the contract document owns the duration.
#[derive(Debug, Clone, Serialize)]
pub struct ContractView {
    pub commission_pct: f64,
    pub duration_months: i32,
}

fn validate_terms(commission_pct: f64, duration_months: i32) -> Result<()> {
    if !commission_pct.is_finite() || commission_pct < 0.0 {
        return Err(ServiceError::validation(
            "commission percent must be zero or greater",
        ));
    }
    if duration_months < 1 {
        return Err(ServiceError::validation("duration must be at least one month"));
    }
    Ok(())
}

/// Creates the investor's contract on first edit, updates it in place after
/// that. The filtered upsert under the unique `investor_id` index keeps it
/// at one contract per investor even when two edits race, and both writes
/// share a transaction so a reader never sees percent and duration from
/// different edits.
pub async fn upsert_contract(
    state: &AppState,
    username: &str,
    commission_pct: f64,
    duration_months: i32,
) -> Result<ContractView> {
    validate_terms(commission_pct, duration_months)?;

    let investor = user_store::find_investor_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let mut session = state.client.start_session(None).await?;
    session.start_transaction(None).await?;

    match write_terms(state, &mut session, &investor, commission_pct, duration_months).await {
        Ok(()) => {
            session.commit_transaction().await?;
            Ok(ContractView {
                commission_pct,
                duration_months,
            })
        }
        Err(e) => {
            let _ = session.abort_transaction().await;
            Err(e)
        }
    }
}

async fn write_terms(
    state: &AppState,
    session: &mut ClientSession,
    investor: &Investor,
    commission_pct: f64,
    duration_months: i32,
) -> Result<()> {
    let now = Utc::now().timestamp();

    let investors = state.db.collection::<Investor>("investors");
    investors
        .update_one_with_session(
            doc! { "_id": investor.id },
            doc! { "$set": { "commission_pct": commission_pct, "updated_at": now } },
            None,
            session,
        )
        .await?;

    let contracts = state.db.collection::<Contract>("contracts");
    contracts
        .update_one_with_session(
            doc! { "investor_id": investor.id },
            doc! { "$set": { "duration_months": duration_months, "updated_at": now } },
            UpdateOptions::builder().upsert(true).build(),
            session,
        )
        .await?;

    Ok(())
}

/// `Ok(None)` means the investor exists but never edited a contract.
pub async fn get_contract(state: &AppState, username: &str) -> Result<Option<ContractView>> {
    let investor = user_store::find_investor_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let contracts = state.db.collection::<Contract>("contracts");
    let contract = contracts
        .find_one(doc! { "investor_id": investor.id }, None)
        .await?;

    Ok(contract.map(|c| ContractView {
        commission_pct: investor.commission_pct,
        duration_months: c.duration_months,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_validation() {
        assert!(validate_terms(0.0, 1).is_ok());
        assert!(validate_terms(5.0, 12).is_ok());
        assert!(matches!(
            validate_terms(-0.5, 12),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            validate_terms(5.0, 0),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            validate_terms(f64::NAN, 12),
            Err(ServiceError::Validation(_))
        ));
    }
}
